//! Request types for outbound provider calls.

use serde::{Deserialize, Serialize};

/// One part of a multi-part provider request.
///
/// # Examples
///
/// ```
/// use scrivano_core::Part;
///
/// let text = Part::Text("Write an outline".to_string());
/// let image = Part::InlineImage {
///     mime: "image/png".to_string(),
///     data: "iVBORw0KGgo=".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Part {
    /// Plain text content.
    Text(String),

    /// Inline base64-encoded image content (e.g. a reference image for
    /// image generation).
    InlineImage {
        /// MIME type, e.g. "image/png"
        mime: String,
        /// Base64-encoded image bytes
        data: String,
    },
}

/// The response shape a call expects the provider to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum ResponseFormat {
    /// Free text.
    #[default]
    Text,
    /// JSON constrained to the given schema.
    Json {
        /// JSON schema the response must conform to
        schema: serde_json::Value,
    },
    /// Text plus generated image data.
    TextAndImage,
}

/// A provider-neutral generation request.
///
/// Every outbound call (free text, schema-constrained JSON, image
/// generation) is expressed as one of these and funneled through the
/// access layer's single `invoke` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderRequest {
    /// Ordered request parts (text and optional inline media)
    pub parts: Vec<Part>,
    /// Optional system instruction
    pub system: Option<String>,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Expected response shape
    pub format: ResponseFormat,
    /// Model identifier override; drivers fall back to their configured
    /// default when absent
    pub model: Option<String>,
}

impl ProviderRequest {
    /// Build a plain free-text request from a single prompt.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivano_core::{Part, ProviderRequest};
    ///
    /// let req = ProviderRequest::text("Write a hook");
    /// assert_eq!(req.parts, vec![Part::Text("Write a hook".to_string())]);
    /// ```
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text(prompt.into())],
            ..Default::default()
        }
    }
}
