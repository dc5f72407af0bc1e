//! Theme preference and panel toggling.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Preference key holding the dark-mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Persistent key/value storage for UI preferences (browser local storage).
pub trait PreferenceStore: Send + Sync + fmt::Debug {
    /// Read a stored value.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value.
    fn set(&self, key: &str, value: &str);
}

/// In-process preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a dark-mode value.
    #[must_use]
    pub fn with_dark_mode(dark_mode: bool) -> Self {
        let store = Self::new();
        persist_dark_mode(&store, dark_mode);
        store
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

/// Read the dark-mode preference; anything but `"true"` means light.
pub fn load_dark_mode(store: &dyn PreferenceStore) -> bool {
    store.get(DARK_MODE_KEY).as_deref() == Some("true")
}

/// Persist the dark-mode preference.
pub fn persist_dark_mode(store: &dyn PreferenceStore, dark_mode: bool) {
    store.set(DARK_MODE_KEY, if dark_mode { "true" } else { "false" });
}

/// Icon shown on the theme control: the theme a click switches to.
#[must_use]
pub fn theme_icon(dark_mode: bool) -> &'static str {
    if dark_mode { "sun" } else { "moon" }
}

/// Where a header click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTarget {
    /// On (or inside) a button in the header.
    Button,
    /// Anywhere else in the header.
    Background,
}

/// Direction of the panel toggle chevron.
#[must_use]
pub fn chevron(panel_collapsed: bool) -> &'static str {
    if panel_collapsed { "down" } else { "up" }
}
