//! The reqwest-backed driver.

use crate::dto::{evaluate_response, to_wire_request};
use async_trait::async_trait;
use reqwest::Client;
use scrivano_core::{ProviderRequest, ProviderResponse, ResponseFormat};
use scrivano_error::{GeminiError, GeminiErrorKind};
use scrivano_gateway::Provider;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Gemini REST API driver.
///
/// Credentials are injected per call by the access layer; the driver itself
/// holds only the HTTP client and model routing.
///
/// # Examples
///
/// ```
/// use scrivano_gemini::GeminiProvider;
///
/// let provider = GeminiProvider::new();
/// let custom = GeminiProvider::with_models("gemini-2.5-flash", "gemini-2.5-flash-image");
/// ```
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GeminiProvider {
    /// Creates a driver with the default models.
    pub fn new() -> Self {
        Self::with_models(DEFAULT_TEXT_MODEL, DEFAULT_IMAGE_MODEL)
    }

    /// Creates a driver with explicit text and image model names.
    pub fn with_models(text_model: impl Into<String>, image_model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: text_model.into(),
            image_model: image_model.into(),
        }
    }

    /// Overrides the API base URL (local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Pick the model for a request: an explicit override wins, otherwise
    /// image-bearing formats route to the image model.
    fn model_for<'a>(&'a self, request: &'a ProviderRequest) -> &'a str {
        if let Some(model) = &request.model {
            return model;
        }
        match request.format {
            ResponseFormat::TextAndImage => &self.image_model,
            _ => &self.text_model,
        }
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    #[instrument(skip_all, fields(model))]
    async fn call(
        &self,
        api_key: &str,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, GeminiError> {
        let model = self.model_for(request);
        tracing::Span::current().record("model", model);

        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = to_wire_request(request);

        debug!(url = %url, "Sending Gemini API request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                GeminiError::new(GeminiErrorKind::ApiRequest(format!("Request failed: {e}")))
            })?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::new(GeminiErrorKind::HttpStatus {
                status_code,
                message,
            }));
        }

        let decoded = response.json().await.map_err(|e| {
            GeminiError::new(GeminiErrorKind::Decode(format!(
                "Failed to parse response body: {e}"
            )))
        })?;

        evaluate_response(decoded)
    }
}
