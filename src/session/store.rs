//! Live widget storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use crate::bridge::BrowserBridge;
use crate::widget::ChatWidget;

use super::SessionId;

/// Default idle timeout (30 minutes).
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A widget served to one page, with its browser bridge.
#[derive(Debug)]
pub struct WidgetHandle {
    widget: Mutex<ChatWidget>,
    bridge: BrowserBridge,
    last_activity: RwLock<DateTime<Utc>>,
}

impl WidgetHandle {
    /// Wrap a widget and the bridge its platform was built from.
    #[must_use]
    pub fn new(widget: ChatWidget, bridge: BrowserBridge) -> Self {
        Self {
            widget: Mutex::new(widget),
            bridge,
            last_activity: RwLock::new(Utc::now()),
        }
    }

    /// Lock the widget for one interaction and mark it active.
    pub async fn lock(&self) -> MutexGuard<'_, ChatWidget> {
        self.touch();
        self.widget.lock().await
    }

    /// Browser bridge of this widget.
    #[must_use]
    pub fn bridge(&self) -> &BrowserBridge {
        &self.bridge
    }

    /// Update the last activity timestamp.
    pub fn touch(&self) {
        *self
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Utc::now();
    }

    /// Check whether the widget has been idle longer than `timeout`.
    #[must_use]
    pub fn is_idle(&self, timeout: Duration) -> bool {
        let last = *self
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // A negative span (clock skew) counts as active.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }
}

/// Thread-safe store of the widgets a host is serving, keyed by session id.
#[derive(Debug, Clone, Default)]
pub struct WidgetStore {
    inner: Arc<RwLock<HashMap<String, Arc<WidgetHandle>>>>,
}

impl WidgetStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a widget under its session id and return the shared handle.
    pub fn insert(&self, widget: ChatWidget, bridge: BrowserBridge) -> Arc<WidgetHandle> {
        let id = widget.session_id().to_string();
        let handle = Arc::new(WidgetHandle::new(widget, bridge));
        self.write().insert(id, Arc::clone(&handle));
        handle
    }

    /// Get a widget by session id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<WidgetHandle>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Remove a widget by session id.
    pub fn remove(&self, id: &SessionId) -> Option<Arc<WidgetHandle>> {
        self.write().remove(id.as_str())
    }

    /// Number of live widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no widget is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove widgets that have been idle longer than `timeout`.
    ///
    /// Returns the number of widgets removed.
    pub fn purge_idle(&self, timeout: Duration) -> usize {
        let mut guard = self.write();
        let before = guard.len();
        guard.retain(|_, handle| !handle.is_idle(timeout));
        before - guard.len()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<WidgetHandle>>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
