//! reqwest-based [`ChatBackend`].

use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::{
    AudioClip, ChatBackend, ChatReply, FeedbackRecord, SendMessageForm, SpeechRequest,
    TranslateReply, TranslateRequest,
};
use crate::error::{Result, WidgetError};

/// Content type assumed when the speech endpoint does not report one.
const DEFAULT_AUDIO_TYPE: &str = "audio/mpeg";

/// HTTP client for the chat backend.
///
/// # Example
///
/// ```rust,no_run
/// use chat_widget::backend::{ChatBackend, HttpBackend, SendMessageForm};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:5000")?;
/// let reply = backend
///     .send_message(&SendMessageForm {
///         message: "hello".into(),
///         session_id: "session_abc123xyz".into(),
///     })
///     .await?;
/// println!("{:?}", reply.answer);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend client for the given base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a backend client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(WidgetError::Config(format!(
                "backend URL must be http or https, got {base_url}"
            )));
        }
        // Endpoint paths are joined relative to the base, so it must end in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(WidgetError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpBackend {
    async fn send_message(&self, form: &SendMessageForm) -> Result<ChatReply> {
        let response = self
            .http
            .post(self.url("get_response")?)
            .form(form)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<()> {
        let response = self
            .http
            .post(self.url("submit_feedback")?)
            .json(record)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateReply> {
        let response = self
            .http
            .post(self.url("translate")?)
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioClip> {
        let response = self
            .http
            .post(self.url("text_to_speech")?)
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or_else(|| DEFAULT_AUDIO_TYPE.to_string(), str::to_string);
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(WidgetError::EmptyAudio);
        }
        Ok(AudioClip {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
