//! The unit of queued work.

use crate::JobStatus;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use scrivano_core::{ChapterOutline, count_words};
use scrivano_outline::ParsedOutline;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estimated hook length folded into `total_words` when the outline lands.
///
/// The hook has no target word count of its own; 150 models its fixed
/// expected length so progress percentages stay stable across stages.
pub const HOOK_WORD_ESTIMATE: usize = 150;

/// One queued script-generation request and its accumulated artifacts.
///
/// Inputs are immutable after creation. Each derived artifact is absent
/// until produced and doubles as the resumption checkpoint for its stage:
/// a retried job recomputes only what is missing. A FAILED job keeps every
/// artifact it reached, exactly as far as it progressed.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct Job {
    /// Stable unique id
    id: Uuid,
    /// Enqueue time; defines FIFO scheduling and recency ordering
    created_at: DateTime<Utc>,

    /// User-supplied working title
    title: String,
    /// User-supplied free-text concept
    concept: String,
    /// Target narration length in minutes
    duration_minutes: u32,

    /// Lifecycle status
    status: JobStatus,

    /// Raw outline response text (checkpoint for the outline stage)
    raw_outline: Option<String>,
    /// Title refined by the outline stage
    refined_title: Option<String>,
    /// Parsed chapter descriptors in response order
    outlines: Vec<ChapterOutline>,
    /// Opening hook text (checkpoint for the hook stage)
    hook: Option<String>,
    /// Chapter content indexed by chapter id; index 0 reserved/unused
    chapters_content: Vec<String>,

    /// Human-readable label of the stage in flight
    current_task: Option<String>,
    /// Words produced so far (hook + non-empty chapters)
    words_written: usize,
    /// Target word total (chapter targets + hook estimate)
    total_words: usize,
    /// Message of the failure that stopped the job, if any
    error: Option<String>,
}

impl Job {
    /// Creates a PENDING job from its immutable inputs.
    pub fn new(
        title: impl Into<String>,
        concept: impl Into<String>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: title.into(),
            concept: concept.into(),
            duration_minutes,
            status: JobStatus::Pending,
            raw_outline: None,
            refined_title: None,
            outlines: Vec::new(),
            hook: None,
            chapters_content: Vec::new(),
            current_task: None,
            words_written: 0,
            total_words: 0,
            error: None,
        }
    }

    /// Chapter ids (ascending) whose content has not been produced yet.
    pub fn missing_chapter_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .outlines
            .iter()
            .map(|c| *c.id())
            .filter(|&id| id > 0)
            .filter(|&id| {
                self.chapters_content
                    .get(id as usize)
                    .is_none_or(|content| content.is_empty())
            })
            .collect();
        ids.sort_unstable();
        ids
    }

    /// The outline entries for the given chapter ids, in the given order.
    pub fn chapters_by_ids(&self, ids: &[u32]) -> Vec<ChapterOutline> {
        ids.iter()
            .filter_map(|id| self.outlines.iter().find(|c| c.id() == id).cloned())
            .collect()
    }

    /// Install the outline-stage artifacts.
    ///
    /// Sizes the content list to `outlines.len() + 1` (index 0 reserved,
    /// ids map to indices) and sets the word target to the chapter targets
    /// plus [`HOOK_WORD_ESTIMATE`].
    pub fn apply_outline(&mut self, raw: String, parsed: ParsedOutline) {
        let max_id = parsed
            .outlines
            .iter()
            .map(|c| *c.id() as usize)
            .max()
            .unwrap_or(0);
        let content_len = (parsed.outlines.len() + 1).max(max_id + 1);

        self.total_words = parsed
            .outlines
            .iter()
            .filter(|c| *c.id() > 0)
            .map(|c| *c.word_count())
            .sum::<usize>()
            + HOOK_WORD_ESTIMATE;

        self.raw_outline = Some(raw);
        self.refined_title = Some(parsed.refined_title);
        self.outlines = parsed.outlines;
        self.chapters_content = vec![String::new(); content_len];
    }

    /// Install the hook-stage artifact and refresh progress.
    pub fn set_hook(&mut self, hook: String) {
        self.hook = Some(hook);
        self.recount_words();
    }

    /// Install one chapter's content; out-of-range ids are ignored.
    pub fn set_chapter_content(&mut self, id: u32, content: String) {
        if let Some(slot) = self.chapters_content.get_mut(id as usize) {
            *slot = content;
        }
    }

    /// Recompute `words_written` from the hook and all non-empty chapters.
    pub fn recount_words(&mut self) {
        let hook_words = self.hook.as_deref().map(count_words).unwrap_or(0);
        let chapter_words: usize = self
            .chapters_content
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| count_words(c))
            .sum();
        self.words_written = hook_words + chapter_words;
    }

    /// Set the human-readable current-task label.
    pub fn set_task(&mut self, task: impl Into<String>) {
        self.current_task = Some(task.into());
    }

    /// Mark the job RUNNING.
    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.error = None;
    }

    /// Mark the job DONE and clear the task label.
    pub fn mark_done(&mut self) {
        self.status = JobStatus::Done;
        self.current_task = None;
    }

    /// Mark the job FAILED with the given message, keeping every artifact.
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error = Some(message.into());
        self.current_task = None;
    }

    /// Force FAILED back to PENDING for an explicit retry.
    ///
    /// Artifacts stay in place; the scheduler resumes from whichever stage
    /// is missing.
    pub fn mark_pending(&mut self) {
        self.status = JobStatus::Pending;
        self.error = None;
    }
}
