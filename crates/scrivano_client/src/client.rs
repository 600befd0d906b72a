//! Gateway-backed implementation of the generation operations.

use crate::{CHAPTER_BREAK, ReferenceImage, ScriptGenerator, ThumbnailIdeas};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use scrivano_core::{ChapterOutline, Part, ProviderRequest, ResponseFormat};
use scrivano_error::{ClientError, ClientErrorKind, ScrivanoResult};
use scrivano_gateway::{Gateway, Provider};
use std::fmt::Write as _;
use tracing::{debug, instrument, warn};

const SYSTEM_PROMPT: &str =
    "You are a professional long-form script writer for narrated story videos.";

/// Typed generation client over the access layer.
///
/// Thin by design: each operation is prompt assembly on the way out and
/// shape validation on the way back. Rate pacing and credential failover
/// live entirely in the [`Gateway`].
pub struct ScriptClient<P> {
    gateway: Gateway<P>,
}

impl<P> std::fmt::Debug for ScriptClient<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptClient")
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl<P: Provider> ScriptClient<P> {
    /// Creates a client over the given gateway.
    pub fn new(gateway: Gateway<P>) -> Self {
        Self { gateway }
    }

    /// Get a reference to the underlying gateway (key management, tests).
    pub fn gateway(&self) -> &Gateway<P> {
        &self.gateway
    }

    fn outline_prompt(title: &str, concept: &str, duration_minutes: u32) -> String {
        // The response format below is a wire contract: the outline parser
        // and the UI renderer both consume it literally.
        format!(
            "Create a story outline for a narrated video.\n\
             Working title: {title}\n\
             Concept: {concept}\n\
             Target length: about {duration_minutes} minutes of narration.\n\
             \n\
             Refine the title, then break the story into sequential chapters\n\
             sized to fill the target length. Respond in exactly this format,\n\
             with no other commentary:\n\
             \n\
             Title: <refined title>\n\
             Chapter 0: The Hook\n\
             <two or three sentences describing the opening hook>\n\
             Chapter 1: <chapter title>\n\
             (Word Count: <target word count> words)\n\
             Concept: <one-line chapter concept>\n\
             \n\
             Continue numbering chapters sequentially in the same format."
        )
    }

    fn hook_prompt(outline_text: &str) -> String {
        format!(
            "Write the opening hook for the story outlined below. Around 150\n\
             words, second person where it fits, ending on a line that pulls\n\
             the listener into chapter one. Respond with the hook text only.\n\
             \n\
             {outline_text}"
        )
    }

    fn batch_prompt(outline_text: &str, chapters: &[ChapterOutline]) -> String {
        let mut prompt = format!(
            "Write the full narration for the chapters listed below, using the\n\
             story outline for context. Write each chapter to its target word\n\
             count. Separate the chapters with a line containing exactly\n\
             {CHAPTER_BREAK} and nothing else. Do not repeat chapter titles or\n\
             add commentary.\n\nStory outline:\n{outline_text}\n\nChapters to write:\n"
        );
        for chapter in chapters {
            let _ = writeln!(
                prompt,
                "Chapter {}: {} ({} words) - {}",
                chapter.id(),
                chapter.title(),
                chapter.word_count(),
                chapter.concept()
            );
        }
        prompt
    }
}

#[async_trait]
impl<P: Provider> ScriptGenerator for ScriptClient<P> {
    #[instrument(skip(self, concept))]
    async fn generate_outline(
        &self,
        title: &str,
        concept: &str,
        duration_minutes: u32,
    ) -> ScrivanoResult<String> {
        let request = ProviderRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            ..ProviderRequest::text(Self::outline_prompt(title, concept, duration_minutes))
        };
        let response = self.gateway.invoke(&request).await?;
        Ok(response.text())
    }

    #[instrument(skip_all)]
    async fn generate_hook(&self, outline_text: &str) -> ScrivanoResult<String> {
        let request = ProviderRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            ..ProviderRequest::text(Self::hook_prompt(outline_text))
        };
        let response = self.gateway.invoke(&request).await?;
        Ok(response.text())
    }

    #[instrument(skip_all, fields(requested = chapters.len()))]
    async fn generate_chapter_batch(
        &self,
        outline_text: &str,
        chapters: &[ChapterOutline],
    ) -> ScrivanoResult<Vec<String>> {
        let request = ProviderRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            ..ProviderRequest::text(Self::batch_prompt(outline_text, chapters))
        };
        let response = self.gateway.invoke(&request).await?;

        let segments: Vec<String> = response
            .text()
            .split(CHAPTER_BREAK)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.len() != chapters.len() {
            // Applied positionally anyway; short responses leave the tail
            // chapters empty for a later retry to fill.
            warn!(
                requested = chapters.len(),
                produced = segments.len(),
                "Chapter batch segment count mismatch"
            );
        } else {
            debug!(segments = segments.len(), "Chapter batch split cleanly");
        }

        Ok(segments)
    }

    #[instrument(skip(self, hook))]
    async fn generate_thumbnail_ideas(
        &self,
        title: &str,
        hook: &str,
    ) -> ScrivanoResult<ThumbnailIdeas> {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "imagePrompt": {"type": "string"},
                "overlayText": {"type": "string"}
            },
            "required": ["imagePrompt", "overlayText"]
        });
        let prompt = format!(
            "Design a thumbnail for the video titled \"{title}\".\n\
             Opening hook:\n{hook}\n\n\
             Produce an imagePrompt describing a single dramatic scene for an\n\
             image model, and an overlayText of at most five punchy words."
        );
        let request = ProviderRequest {
            format: ResponseFormat::Json { schema },
            ..ProviderRequest::text(prompt)
        };
        let response = self.gateway.invoke(&request).await?;
        let text = response.text();

        serde_json::from_str(&text).map_err(|e| {
            ClientError::new(ClientErrorKind::MalformedResponse(format!(
                "expected {{imagePrompt, overlayText}}: {e}"
            )))
            .into()
        })
    }

    #[instrument(skip_all, fields(add_overlay, has_base = base_image.is_some()))]
    async fn generate_thumbnail_image(
        &self,
        prompt: &str,
        overlay_text: &str,
        add_overlay: bool,
        base_image: Option<&ReferenceImage>,
    ) -> ScrivanoResult<String> {
        let mut text = format!(
            "Generate a high-contrast 16:9 thumbnail image.\nScene: {prompt}"
        );
        if add_overlay {
            let _ = write!(
                text,
                "\nRender the text \"{overlay_text}\" in large bold letters across the image."
            );
        }
        if base_image.is_some() {
            text.push_str("\nMatch the style and palette of the attached reference image.");
        }

        let mut parts = vec![Part::Text(text)];
        if let Some(reference) = base_image {
            parts.push(Part::InlineImage {
                mime: reference.mime.clone(),
                data: reference.data.clone(),
            });
        }

        let request = ProviderRequest {
            parts,
            format: ResponseFormat::TextAndImage,
            ..Default::default()
        };
        let response = self.gateway.invoke(&request).await?;

        let Some((mime, data)) = response.image() else {
            return Err(ClientError::new(ClientErrorKind::NoImageReturned).into());
        };

        let mime = mime.unwrap_or("image/png");
        Ok(format!("data:{mime};base64,{}", BASE64.encode(data)))
    }
}
