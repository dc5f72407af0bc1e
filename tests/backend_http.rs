//! HTTP backend client tests.
//!
//! These tests use wiremock to stand in for the four chat backend endpoints.

use chat_widget::backend::{
    ChatBackend, FeedbackMetadata, FeedbackRecord, HttpBackend, SendMessageForm, SpeechRequest,
    TranslateRequest,
};
use chat_widget::error::WidgetError;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn form(message: &str) -> SendMessageForm {
    SendMessageForm {
        message: message.to_string(),
        session_id: "session_abc123xyz".to_string(),
    }
}

fn feedback(positive: bool) -> FeedbackRecord {
    FeedbackRecord {
        response_id: "resp-1".to_string(),
        is_positive: positive,
        session_id: "session_abc123xyz".to_string(),
        metadata: FeedbackMetadata {
            timestamp: "2024-05-01T12:00:00.000Z".to_string(),
            user_agent: "test-agent".to_string(),
        },
    }
}

// ============================================================================
// TEST: get_response
// ============================================================================

#[tokio::test]
async fn test_send_message_posts_form_and_parses_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_response"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("message=hello"))
        .and(body_string_contains("session_id=session_abc123xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Hi!\n- one",
            "responseId": 17,
            "responseLang": "en"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri()).unwrap();
    let reply = backend.send_message(&form("hello")).await.unwrap();

    assert_eq!(reply.answer.as_deref(), Some("Hi!\n- one"));
    assert_eq!(reply.response_id.as_deref(), Some("17"));
    assert_eq!(reply.response_lang.as_deref(), Some("en"));
}

#[tokio::test]
async fn test_send_message_non_success_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_response"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri()).unwrap();
    let err = backend.send_message(&form("hello")).await.unwrap_err();

    match err {
        WidgetError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_message_malformed_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_response"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri()).unwrap();
    let err = backend.send_message(&form("hello")).await.unwrap_err();
    assert!(matches!(err, WidgetError::Json(_)));
}

#[tokio::test]
async fn test_base_path_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/get_response"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(format!("{}/chat", server.uri())).unwrap();
    let reply = backend.send_message(&form("hello")).await.unwrap();
    assert_eq!(reply.answer.as_deref(), Some("ok"));
}

#[test]
fn test_non_http_base_url_is_rejected() {
    let err = HttpBackend::new("ftp://example.com").unwrap_err();
    assert!(matches!(err, WidgetError::Config(_)));
}

// ============================================================================
// TEST: submit_feedback / translate
// ============================================================================

#[tokio::test]
async fn test_submit_feedback_sends_camel_case_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit_feedback"))
        .and(body_json(json!({
            "responseId": "resp-1",
            "isPositive": false,
            "sessionId": "session_abc123xyz",
            "metadata": {
                "timestamp": "2024-05-01T12:00:00.000Z",
                "userAgent": "test-agent"
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri()).unwrap();
    backend.submit_feedback(&feedback(false)).await.unwrap();
}

#[tokio::test]
async fn test_submit_feedback_failure_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit_feedback"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri()).unwrap();
    assert!(backend.submit_feedback(&feedback(true)).await.is_err());
}

#[tokio::test]
async fn test_translate_targets_english() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_json(json!({ "text": "Hola", "target_lang": "en" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "translated_text": "Hello" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri()).unwrap();
    let reply = backend
        .translate(&TranslateRequest::to_english("Hola"))
        .await
        .unwrap();
    assert_eq!(reply.translated_text.as_deref(), Some("Hello"));
}

// ============================================================================
// TEST: text_to_speech
// ============================================================================

#[tokio::test]
async fn test_synthesize_returns_audio_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text_to_speech"))
        .and(body_json(json!({ "text": "Hello" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![1_u8, 2, 3], "audio/wav"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri()).unwrap();
    let clip = backend
        .synthesize(&SpeechRequest {
            text: "Hello".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(clip.content_type, "audio/wav");
    assert_eq!(clip.bytes, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_synthesize_empty_body_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text_to_speech"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri()).unwrap();
    let err = backend
        .synthesize(&SpeechRequest {
            text: "Hello".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WidgetError::EmptyAudio));
}
