//! Render snapshots of a widget.
//!
//! A [`WidgetView`] is an owned copy of everything the markup needs, so the
//! widget lock can be released before rendering.

use super::log::{Author, MessageId, ScrollPosition, TypingId};

/// Snapshot of a whole widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    /// Session identifier (also the host's widget key).
    pub session_id: String,
    /// Header title.
    pub title: String,
    /// Dark theme active.
    pub dark_mode: bool,
    /// Panel body hidden.
    pub panel_collapsed: bool,
    /// Bot replies are spoken.
    pub voice_enabled: bool,
    /// A recognition session is active.
    pub recording: bool,
    /// Microphone control shown.
    pub microphone_available: bool,
    /// Current input placeholder.
    pub placeholder: String,
    /// Current input value.
    pub input: String,
    /// Log entries in display order.
    pub entries: Vec<EntryView>,
    /// Scroll position after the last insertion.
    pub scroll: ScrollPosition,
    /// Send cycles awaiting dispatch.
    pub pending: Vec<TypingId>,
}

/// Snapshot of one log entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryView {
    /// A rendered message.
    Message(MessageView),
    /// A typing indicator.
    Typing(TypingId),
}

/// Snapshot of one message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    /// Message id.
    pub id: MessageId,
    /// Author.
    pub author: Author,
    /// Formatted bubble content.
    pub body_html: String,
    /// Feedback region.
    pub feedback: Option<FeedbackView>,
    /// Translate affordance or translated text.
    pub translation: Option<TranslationView>,
}

/// Snapshot of a feedback region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackView {
    /// Bound response identifier.
    pub response_id: String,
    /// Thank-you notice replaces the buttons.
    pub submitted: bool,
}

/// Snapshot of a translate affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationView {
    /// Affordance shown.
    Offered,
    /// Translated text appended.
    Translated(String),
}

impl WidgetView {
    /// Message by id.
    #[must_use]
    pub fn message(&self, id: MessageId) -> Option<&MessageView> {
        self.entries.iter().find_map(|entry| match entry {
            EntryView::Message(m) if m.id == id => Some(m),
            _ => None,
        })
    }

    /// First feedback region bound to `response_id`.
    #[must_use]
    pub fn feedback(&self, response_id: &str) -> Option<&FeedbackView> {
        self.entries.iter().find_map(|entry| match entry {
            EntryView::Message(m) => m.feedback.as_ref().filter(|f| f.response_id == response_id),
            EntryView::Typing(_) => None,
        })
    }
}
