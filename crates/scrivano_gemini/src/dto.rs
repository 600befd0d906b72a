//! Wire structures for the `generateContent` endpoint.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use scrivano_core::{Part, Payload, ProviderRequest, ProviderResponse, ResponseFormat};
use scrivano_error::{GeminiError, GeminiErrorKind};
use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

/// Response body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Finish reasons that mean the provider refused or filtered the content.
const BLOCKED_FINISH_REASONS: [&str; 6] = [
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "IMAGE_SAFETY",
];

/// Build the wire request from a provider-neutral one.
pub fn to_wire_request(request: &ProviderRequest) -> GenerateContentRequest {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => ContentPart {
                text: Some(text.clone()),
                inline_data: None,
            },
            Part::InlineImage { mime, data } => ContentPart {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: mime.clone(),
                    data: data.clone(),
                }),
            },
        })
        .collect();

    let mut config = GenerationConfig {
        temperature: request.temperature,
        ..Default::default()
    };
    match &request.format {
        ResponseFormat::Text => {}
        ResponseFormat::Json { schema } => {
            config.response_mime_type = Some("application/json".to_string());
            config.response_schema = Some(schema.clone());
        }
        ResponseFormat::TextAndImage => {
            config.response_modalities = Some(vec!["TEXT".to_string(), "IMAGE".to_string()]);
        }
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        system_instruction: request.system.as_ref().map(|text| Content {
            role: None,
            parts: vec![ContentPart {
                text: Some(text.clone()),
                inline_data: None,
            }],
        }),
        generation_config: Some(config),
    }
}

/// Force evaluation of a decoded response body.
///
/// Declares success only for a response carrying at least one usable
/// payload: block reasons, safety finish reasons and empty candidate lists
/// are failures even though the HTTP exchange succeeded.
pub fn evaluate_response(
    response: GenerateContentResponse,
) -> Result<ProviderResponse, GeminiError> {
    if let Some(feedback) = &response.prompt_feedback
        && let Some(reason) = &feedback.block_reason
    {
        return Err(GeminiError::new(GeminiErrorKind::Blocked(reason.clone())));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GeminiError::new(GeminiErrorKind::EmptyCandidates));
    };

    if let Some(reason) = &candidate.finish_reason
        && BLOCKED_FINISH_REASONS.contains(&reason.as_str())
    {
        return Err(GeminiError::new(GeminiErrorKind::Blocked(reason.clone())));
    }

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let mut payloads = Vec::new();

    for part in parts {
        if let Some(text) = part.text {
            payloads.push(Payload::Text(text));
        } else if let Some(inline) = part.inline_data {
            let data = BASE64.decode(inline.data.as_bytes()).map_err(|e| {
                GeminiError::new(GeminiErrorKind::Decode(format!(
                    "invalid base64 image data: {e}"
                )))
            })?;
            payloads.push(Payload::Image {
                mime: Some(inline.mime_type),
                data,
            });
        }
    }

    if payloads.is_empty() {
        return Err(GeminiError::new(GeminiErrorKind::EmptyCandidates));
    }

    Ok(ProviderResponse { payloads })
}
