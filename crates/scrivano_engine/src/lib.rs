//! Persistent job queue and stage scheduler for the Scrivano automation
//! engine.
//!
//! A [`Job`] moves through `PENDING → RUNNING → DONE | FAILED`; a failed job
//! keeps every artifact it produced, which is what makes retry resumable
//! instead of restart-from-scratch. The [`Engine`] drives exactly one job at
//! a time through its missing stages (outline → hook → chapter batches),
//! checking the queue-wide run-state before every stage and between batches
//! so pause and stop take effect at the next suspension point.
//!
//! The run-state lives in a `tokio::sync::watch` channel: pausing suspends
//! the scheduler on a state-change notification rather than a polling loop,
//! and the drain is a plain loop that continues while pending jobs exist.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod job;
mod status;

pub use config::EngineConfig;
pub use engine::Engine;
pub use job::{HOOK_WORD_ESTIMATE, Job};
pub use status::{JobStatus, RunState};
