//! The generation seam driven by the job engine.

use async_trait::async_trait;
use scrivano_core::ChapterOutline;
use scrivano_error::ScrivanoResult;
use serde::{Deserialize, Serialize};

/// Literal delimiter between chapter segments in a batch response.
///
/// This is a wire contract with the prompt sent upstream; the split in
/// [`ScriptGenerator::generate_chapter_batch`] must match it exactly.
pub const CHAPTER_BREAK: &str = "---CHAPTER-BREAK---";

/// Structured result of a thumbnail-idea call.
///
/// The wire shape is pinned by the JSON schema sent with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailIdeas {
    /// Prompt to feed the image model
    pub image_prompt: String,
    /// Short text to overlay on the thumbnail
    pub overlay_text: String,
}

/// A reference image handed to thumbnail generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImage {
    /// MIME type, e.g. "image/png"
    pub mime: String,
    /// Base64-encoded image bytes
    pub data: String,
}

/// Typed generation operations over the upstream provider.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Generate the raw outline text for a story.
    async fn generate_outline(
        &self,
        title: &str,
        concept: &str,
        duration_minutes: u32,
    ) -> ScrivanoResult<String>;

    /// Generate the opening hook from the outline text.
    async fn generate_hook(&self, outline_text: &str) -> ScrivanoResult<String>;

    /// Generate content for several chapters in one call.
    ///
    /// Returns one segment per delimiter-separated block in the response.
    /// A segment count that differs from the requested chapter count is a
    /// data-quality warning, not an error; callers apply segments
    /// positionally.
    async fn generate_chapter_batch(
        &self,
        outline_text: &str,
        chapters: &[ChapterOutline],
    ) -> ScrivanoResult<Vec<String>>;

    /// Generate a thumbnail concept (image prompt + overlay text).
    async fn generate_thumbnail_ideas(
        &self,
        title: &str,
        hook: &str,
    ) -> ScrivanoResult<ThumbnailIdeas>;

    /// Generate a thumbnail image, returned as a data URI.
    async fn generate_thumbnail_image(
        &self,
        prompt: &str,
        overlay_text: &str,
        add_overlay: bool,
        base_image: Option<&ReferenceImage>,
    ) -> ScrivanoResult<String>;
}
