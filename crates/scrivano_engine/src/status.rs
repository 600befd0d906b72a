//! Job and queue status enums.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Queued, waiting for the scheduler
    Pending,
    /// Currently being driven through its stages
    Running,
    /// Hook and every chapter produced
    Done,
    /// A stage failed; artifacts retained, error message stored
    Failed,
}

/// Queue-wide control state, distinct from any individual job's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// No scheduler active; also entered automatically on queue exhaustion
    #[default]
    Idle,
    /// Scheduler draining the queue
    Running,
    /// Scheduler suspended between stages; the in-flight job stays RUNNING
    Paused,
}
