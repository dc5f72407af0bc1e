//! Wire payloads exchanged with the chat backend.

use serde::{Deserialize, Deserializer, Serialize};

/// Form body of `POST /get_response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageForm {
    /// The user's message, already trimmed.
    pub message: String,
    /// Session identifier of the sending widget.
    pub session_id: String,
}

/// JSON reply of `POST /get_response`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Bot answer text; absence is treated as a failure by the widget.
    #[serde(default)]
    pub answer: Option<String>,
    /// Token correlating this reply with later feedback.
    #[serde(default, deserialize_with = "string_or_number")]
    pub response_id: Option<String>,
    /// Detected language of the answer.
    #[serde(default)]
    pub response_lang: Option<String>,
}

/// Accept `responseId` as either a JSON string or a JSON number.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// JSON body of `POST /submit_feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Reply the feedback refers to.
    pub response_id: String,
    /// Thumbs up (`true`) or thumbs down (`false`).
    pub is_positive: bool,
    /// Session identifier of the widget.
    pub session_id: String,
    /// Client metadata.
    pub metadata: FeedbackMetadata,
}

/// Client metadata attached to feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackMetadata {
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub timestamp: String,
    /// Browser user agent string.
    pub user_agent: String,
}

/// JSON body of `POST /translate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslateRequest {
    /// Text to translate.
    pub text: String,
    /// Target language code.
    pub target_lang: String,
}

impl TranslateRequest {
    /// Translation request targeting English.
    pub fn to_english(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_lang: "en".to_string(),
        }
    }
}

/// JSON reply of `POST /translate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranslateReply {
    /// Translated text, if the backend produced one.
    #[serde(default)]
    pub translated_text: Option<String>,
}

/// JSON body of `POST /text_to_speech`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechRequest {
    /// Text to synthesize.
    pub text: String,
}

/// Binary audio returned by `POST /text_to_speech`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// MIME type reported by the backend.
    pub content_type: String,
    /// Encoded audio.
    pub bytes: Vec<u8>,
}
