//! Typed operation behavior over a canned provider.

use async_trait::async_trait;
use scrivano_client::{CHAPTER_BREAK, ReferenceImage, ScriptClient, ScriptGenerator};
use scrivano_core::{ChapterOutline, Part, Payload, ProviderRequest, ProviderResponse, ResponseFormat};
use scrivano_error::{ClientErrorKind, GeminiError, ScrivanoErrorKind};
use scrivano_gateway::{Gateway, PacingGate, Provider};
use scrivano_keys::KeyRing;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Provider that replays canned responses and records every request.
struct CannedProvider {
    responses: Mutex<VecDeque<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl CannedProvider {
    fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn text_response(text: &str) -> ProviderResponse {
        ProviderResponse {
            payloads: vec![Payload::Text(text.to_string())],
        }
    }
}

#[async_trait]
impl Provider for CannedProvider {
    async fn call(
        &self,
        _api_key: &str,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, GeminiError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("canned provider ran out of responses"))
    }
}

fn client_with(responses: Vec<ProviderResponse>) -> ScriptClient<CannedProvider> {
    let ring = KeyRing::new(vec!["key-a".to_string()]);
    let gateway = Gateway::new(
        CannedProvider::new(responses),
        ring,
        PacingGate::new(Duration::ZERO),
    );
    ScriptClient::new(gateway)
}

fn sent_requests(client: &ScriptClient<CannedProvider>) -> Vec<ProviderRequest> {
    client.gateway().provider().requests.lock().unwrap().clone()
}

fn chapters(n: u32) -> Vec<ChapterOutline> {
    (1..=n)
        .map(|id| {
            ChapterOutline::new(id, format!("Chapter {id}"), 500, format!("concept {id}"))
        })
        .collect()
}

#[tokio::test]
async fn outline_prompt_pins_the_wire_format() {
    let client = client_with(vec![CannedProvider::text_response("Title: Refined")]);

    let raw = client
        .generate_outline("Working", "a story about tides", 30)
        .await
        .unwrap();
    assert_eq!(raw, "Title: Refined");

    let requests = sent_requests(&client);
    let Part::Text(prompt) = &requests[0].parts[0] else {
        panic!("expected text part");
    };
    assert!(prompt.contains("Title: <refined title>"));
    assert!(prompt.contains("Chapter 0: The Hook"));
    assert!(prompt.contains("(Word Count: <target word count> words)"));
    assert!(prompt.contains("Concept: <one-line chapter concept>"));
}

#[tokio::test]
async fn batch_splits_on_the_literal_delimiter() {
    let body = format!("  first chapter text \n{CHAPTER_BREAK}\nsecond chapter text\n{CHAPTER_BREAK}\nthird chapter text");
    let client = client_with(vec![CannedProvider::text_response(&body)]);

    let segments = client
        .generate_chapter_batch("outline", &chapters(3))
        .await
        .unwrap();

    assert_eq!(
        segments,
        vec![
            "first chapter text".to_string(),
            "second chapter text".to_string(),
            "third chapter text".to_string(),
        ]
    );

    let requests = sent_requests(&client);
    let Part::Text(prompt) = &requests[0].parts[0] else {
        panic!("expected text part");
    };
    assert!(prompt.contains(CHAPTER_BREAK));
    assert!(prompt.contains("Chapter 2: Chapter 2 (500 words) - concept 2"));
}

#[tokio::test]
async fn batch_segment_mismatch_is_lenient() {
    let body = format!("only one{CHAPTER_BREAK}and two");
    let client = client_with(vec![CannedProvider::text_response(&body)]);

    // Three chapters requested, two segments produced: accepted positionally.
    let segments = client
        .generate_chapter_batch("outline", &chapters(3))
        .await
        .unwrap();
    assert_eq!(segments, vec!["only one".to_string(), "and two".to_string()]);
}

#[tokio::test]
async fn thumbnail_ideas_round_trip_the_schema_shape() {
    let client = client_with(vec![CannedProvider::text_response(
        r#"{"imagePrompt": "a storm over a lighthouse", "overlayText": "DON'T LOOK"}"#,
    )]);

    let ideas = client
        .generate_thumbnail_ideas("My Story", "the hook")
        .await
        .unwrap();
    assert_eq!(ideas.image_prompt, "a storm over a lighthouse");
    assert_eq!(ideas.overlay_text, "DON'T LOOK");

    let requests = sent_requests(&client);
    match &requests[0].format {
        ResponseFormat::Json { schema } => {
            assert_eq!(schema["required"][0], "imagePrompt");
        }
        other => panic!("expected JSON format, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_thumbnail_ideas_are_malformed() {
    let client = client_with(vec![CannedProvider::text_response("not json at all")]);

    let err = client
        .generate_thumbnail_ideas("My Story", "the hook")
        .await
        .unwrap_err();

    match err.kind() {
        ScrivanoErrorKind::Client(client_err) => {
            assert!(matches!(
                client_err.kind,
                ClientErrorKind::MalformedResponse(_)
            ));
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[tokio::test]
async fn thumbnail_image_returns_a_data_uri() {
    let client = client_with(vec![ProviderResponse {
        payloads: vec![
            Payload::Text("here it is".to_string()),
            Payload::Image {
                mime: Some("image/png".to_string()),
                data: b"hello".to_vec(),
            },
        ],
    }]);

    let uri = client
        .generate_thumbnail_image("a lighthouse", "DON'T LOOK", true, None)
        .await
        .unwrap();
    assert_eq!(uri, "data:image/png;base64,aGVsbG8=");

    let requests = sent_requests(&client);
    assert!(matches!(requests[0].format, ResponseFormat::TextAndImage));
}

#[tokio::test]
async fn missing_image_payload_is_an_error() {
    let client = client_with(vec![CannedProvider::text_response("no image here")]);

    let err = client
        .generate_thumbnail_image("a lighthouse", "", false, None)
        .await
        .unwrap_err();

    match err.kind() {
        ScrivanoErrorKind::Client(client_err) => {
            assert_eq!(client_err.kind, ClientErrorKind::NoImageReturned);
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[tokio::test]
async fn reference_image_travels_as_an_inline_part() {
    let client = client_with(vec![ProviderResponse {
        payloads: vec![Payload::Image {
            mime: Some("image/jpeg".to_string()),
            data: vec![1, 2, 3],
        }],
    }]);

    let reference = ReferenceImage {
        mime: "image/png".to_string(),
        data: "aGk=".to_string(),
    };
    client
        .generate_thumbnail_image("scene", "TEXT", true, Some(&reference))
        .await
        .unwrap();

    let requests = sent_requests(&client);
    assert_eq!(requests[0].parts.len(), 2);
    assert!(matches!(
        &requests[0].parts[1],
        Part::InlineImage { mime, .. } if mime == "image/png"
    ));
}
