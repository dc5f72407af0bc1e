//! Error types for the widget engine and its backend client.

use thiserror::Error;

/// Widget error type.
#[derive(Error, Debug)]
pub enum WidgetError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Body returned by the backend.
        message: String,
    },

    /// A successful reply lacked a field the widget consumes.
    #[error("Response missing field: {0}")]
    MissingField(&'static str),

    /// Speech synthesis returned no audio.
    #[error("Speech synthesis returned an empty payload")]
    EmptyAudio,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, WidgetError>;
