//! Session identifiers and live widget storage.
//!
//! Every page load gets a fresh widget with its own [`SessionId`]. The id has
//! no server-verified meaning and never expires on its own; it is resent with
//! every message so the backend can group a conversation.
//!
//! # Architecture
//!
//! - [`SessionId`]: opaque client-generated identifier
//! - [`WidgetStore`]: thread-safe store of the widgets a host is serving
//!
//! # Example
//!
//! ```rust
//! use chat_widget::session::SessionId;
//!
//! let id = SessionId::generate();
//! assert!(id.as_str().starts_with("session_"));
//! assert_eq!(id.as_str().len(), "session_".len() + 9);
//! ```

mod store;

pub use store::{DEFAULT_IDLE_TIMEOUT, WidgetHandle, WidgetStore};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PREFIX: &str = "session_";
const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque per-page-load session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a random identifier of the form `session_xxxxxxxxx` (base-36).
    #[must_use]
    pub fn generate() -> Self {
        let mut entropy = Uuid::new_v4().as_u128();
        let mut id = String::with_capacity(PREFIX.len() + SUFFIX_LEN);
        id.push_str(PREFIX);
        for _ in 0..SUFFIX_LEN {
            id.push(char::from(ALPHABET[(entropy % 36) as usize]));
            entropy /= 36;
        }
        Self(id)
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
