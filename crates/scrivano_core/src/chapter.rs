//! Chapter outline descriptor shared by the parser and the job engine.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// One entry of a parsed story outline.
///
/// Id 0 marks the hook/intro block; ids 1..N are narrative chapters in
/// order. The concept line is the one-line generation context handed to
/// chapter-content calls (verbatim block text for the hook).
///
/// # Examples
///
/// ```
/// use scrivano_core::ChapterOutline;
///
/// let chapter = ChapterOutline::new(1, "Beginning".to_string(), 500, "hero wakes up".to_string());
/// assert_eq!(*chapter.id(), 1);
/// assert_eq!(*chapter.word_count(), 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct ChapterOutline {
    /// Chapter id (0 = hook marker, 1..N = narrative chapters)
    id: u32,
    /// Chapter title
    title: String,
    /// Target word count (0 for the hook)
    word_count: usize,
    /// One-line concept summary used as generation context
    concept: String,
}
