//! Chat backend access.
//!
//! The widget talks to four backend endpoints through the [`ChatBackend`]
//! trait. [`HttpBackend`] is the production implementation; tests and
//! embedders can supply their own.
//!
//! | Call | Endpoint |
//! |---|---|
//! | [`ChatBackend::send_message`] | `POST /get_response` (form) |
//! | [`ChatBackend::submit_feedback`] | `POST /submit_feedback` (JSON) |
//! | [`ChatBackend::translate`] | `POST /translate` (JSON) |
//! | [`ChatBackend::synthesize`] | `POST /text_to_speech` (JSON → audio) |

mod http;
mod types;

pub use http::HttpBackend;
pub use types::{
    AudioClip, ChatReply, FeedbackMetadata, FeedbackRecord, SendMessageForm, SpeechRequest,
    TranslateReply, TranslateRequest,
};

use crate::error::Result;

/// Remote chat backend used by a widget.
///
/// No call carries a timeout or retry; callers decide how failures surface.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync + std::fmt::Debug {
    /// Send a user message and return the backend's reply.
    async fn send_message(&self, form: &SendMessageForm) -> Result<ChatReply>;

    /// Record thumbs-up/down feedback for a reply.
    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<()>;

    /// Translate text.
    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateReply>;

    /// Synthesize speech audio for text.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioClip>;
}
