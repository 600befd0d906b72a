//! Response types from provider calls.

use serde::{Deserialize, Serialize};

/// One payload of a provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    /// Plain text payload.
    Text(String),

    /// Generated image payload.
    Image {
        /// MIME type of the image
        mime: Option<String>,
        /// Binary image data
        data: Vec<u8>,
    },
}

/// The unified response object returned by every provider call.
///
/// # Examples
///
/// ```
/// use scrivano_core::{Payload, ProviderResponse};
///
/// let response = ProviderResponse {
///     payloads: vec![Payload::Text("Title: My Story".to_string())],
/// };
/// assert_eq!(response.text(), "Title: My Story");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated payloads, in provider order
    pub payloads: Vec<Payload>,
}

impl ProviderResponse {
    /// Concatenate all text payloads, newline-separated.
    pub fn text(&self) -> String {
        let texts: Vec<&str> = self
            .payloads
            .iter()
            .filter_map(|p| match p {
                Payload::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        texts.join("\n")
    }

    /// First image payload, if any.
    pub fn image(&self) -> Option<(Option<&str>, &[u8])> {
        self.payloads.iter().find_map(|p| match p {
            Payload::Image { mime, data } => Some((mime.as_deref(), data.as_slice())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_joins_payloads() {
        let response = ProviderResponse {
            payloads: vec![
                Payload::Text("one".to_string()),
                Payload::Image {
                    mime: Some("image/png".to_string()),
                    data: vec![1, 2, 3],
                },
                Payload::Text("two".to_string()),
            ],
        };
        assert_eq!(response.text(), "one\ntwo");
    }

    #[test]
    fn image_returns_first_image() {
        let response = ProviderResponse {
            payloads: vec![
                Payload::Text("caption".to_string()),
                Payload::Image {
                    mime: Some("image/png".to_string()),
                    data: vec![9],
                },
            ],
        };
        let (mime, data) = response.image().unwrap();
        assert_eq!(mime, Some("image/png"));
        assert_eq!(data, &[9]);
    }

    #[test]
    fn image_absent() {
        let response = ProviderResponse {
            payloads: vec![Payload::Text("only text".to_string())],
        };
        assert!(response.image().is_none());
    }
}
