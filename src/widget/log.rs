//! The scrolling message log.
//!
//! The log is the widget's retained view of its message list: every appended
//! [`Message`] is formatted once into HTML, optionally decorated with
//! feedback controls or a translate affordance, and given an estimated
//! rendered height so the scroll position can be recomputed after each
//! insertion.

use serde::{Deserialize, Serialize};

use crate::format;

/// Identifier of a rendered message, unique within one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a typing indicator; doubles as the ticket of its send cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypingId(u64);

impl TypingId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TypingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// Typed or dictated by the user.
    User,
    /// Reply from the chat backend.
    Bot,
    /// Failure notice.
    Error,
    /// Informational notice from the widget itself.
    System,
}

impl Author {
    /// CSS class / wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::Error => "error",
            Self::System => "system",
        }
    }
}

/// One conversational turn. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    author: Author,
    text: String,
    response_id: Option<String>,
    language: Option<String>,
}

impl Message {
    /// Message id.
    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Message author.
    #[must_use]
    pub fn author(&self) -> Author {
        self.author
    }

    /// Raw text as received or typed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Backend response identifier, for bot replies that can take feedback.
    #[must_use]
    pub fn response_id(&self) -> Option<&str> {
        self.response_id.as_deref()
    }

    /// Detected language code.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// Feedback region lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackState {
    /// Thumbs buttons clickable.
    Active,
    /// A submission is in flight; further clicks are ignored.
    Submitting,
    /// Accepted by the backend; replaced by a thank-you notice.
    Submitted,
}

/// Thumbs-up/down controls bound to one response identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackControls {
    response_id: String,
    state: FeedbackState,
}

impl FeedbackControls {
    /// Bound response identifier.
    #[must_use]
    pub fn response_id(&self) -> &str {
        &self.response_id
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FeedbackState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: FeedbackState) {
        self.state = state;
    }
}

/// Translate affordance lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationState {
    /// "Translate to English" is clickable.
    Offered,
    /// A translation request is in flight.
    Translating,
    /// Translation appended beneath the original; affordance removed.
    Translated(String),
}

/// A message plus everything rendered alongside it.
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    message: Message,
    body_html: String,
    feedback: Option<FeedbackControls>,
    translation: Option<TranslationState>,
    height: f64,
}

impl RenderedMessage {
    /// The underlying message.
    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Formatted bubble content.
    #[must_use]
    pub fn body_html(&self) -> &str {
        &self.body_html
    }

    /// Feedback controls, if the message carries a response identifier.
    #[must_use]
    pub fn feedback(&self) -> Option<&FeedbackControls> {
        self.feedback.as_ref()
    }

    /// Translate affordance, if the message is not in English.
    #[must_use]
    pub fn translation(&self) -> Option<&TranslationState> {
        self.translation.as_ref()
    }

    pub(crate) fn translation_mut(&mut self) -> Option<&mut TranslationState> {
        self.translation.as_mut()
    }
}

/// An entry in the log.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A rendered message.
    Message(RenderedMessage),
    /// A transient typing indicator.
    Typing(TypingId),
}

/// Pixel metrics used to estimate rendered heights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Visible height of the messages container.
    pub client_height: f64,
    /// Height of one line of bubble text.
    pub line_height: f64,
    /// Characters that fit on one bubble line before wrapping.
    pub chars_per_line: usize,
    /// Vertical padding and margin around a bubble.
    pub bubble_padding: f64,
    /// Height of a control row (feedback buttons, translate link).
    pub control_row: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            client_height: 400.0,
            line_height: 20.0,
            chars_per_line: 42,
            bubble_padding: 24.0,
            control_row: 28.0,
        }
    }
}

impl Layout {
    /// Estimated height of a bubble holding `text`.
    #[allow(clippy::cast_precision_loss)]
    pub fn text_height(&self, text: &str) -> f64 {
        let per_line = self.chars_per_line.max(1);
        let lines: usize = text
            .split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum();
        self.bubble_padding + lines as f64 * self.line_height
    }

    /// Estimated height of the typing indicator.
    pub fn typing_height(&self) -> f64 {
        self.bubble_padding + self.line_height
    }
}

/// How the log scrolls after an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollMode {
    /// Bring the start of the new message into view.
    Start,
    /// Scroll to the very bottom.
    #[default]
    Bottom,
}

impl ScrollMode {
    /// Mode used after appending a message by `author`.
    #[must_use]
    pub fn for_author(author: Author) -> Self {
        match author {
            Author::Bot => Self::Start,
            Author::User | Author::Error | Author::System => Self::Bottom,
        }
    }

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Bottom => "bottom",
        }
    }
}

/// Container measurements taken right after an insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Total scrollable content height.
    pub scroll_height: f64,
    /// Visible container height.
    pub client_height: f64,
    /// Rendered height of the inserted element.
    pub message_height: f64,
}

/// New `scrollTop` after an insertion.
///
/// `Start` uses `scroll_height - client_height - message_height`; `Bottom`
/// uses `scroll_height`. The result is clamped to the scrollable range the
/// way a browser clamps `scrollTop`.
pub fn scroll_target(mode: ScrollMode, metrics: ScrollMetrics) -> f64 {
    let max = (metrics.scroll_height - metrics.client_height).max(0.0);
    let raw = match mode {
        ScrollMode::Start => metrics.scroll_height - metrics.client_height - metrics.message_height,
        ScrollMode::Bottom => metrics.scroll_height,
    };
    raw.clamp(0.0, max)
}

/// Current scroll position of the log.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    /// Computed `scrollTop`.
    pub top: f64,
    /// Mode of the last insertion.
    pub mode: ScrollMode,
    /// Message the last scroll was anchored on, if any.
    pub anchor: Option<MessageId>,
}

/// Ordered log of rendered messages and typing indicators.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: Vec<Entry>,
    next_id: u64,
    layout: Layout,
    scroll: ScrollPosition,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

impl MessageLog {
    /// Create an empty log.
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            layout,
            scroll: ScrollPosition::default(),
        }
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Format and append a message, then rescroll.
    ///
    /// Bot text goes through line formatting and linkification; everything
    /// else is escaped plain text. A response identifier adds feedback
    /// controls; a language other than `"en"` adds a translate affordance.
    pub fn append(
        &mut self,
        author: Author,
        text: &str,
        response_id: Option<String>,
        language: Option<String>,
    ) -> MessageId {
        let id = MessageId(self.allocate());
        let body_html = match author {
            Author::Bot => format::bot_html(text),
            Author::User | Author::Error | Author::System => format::escape_html(text),
        };

        let feedback = response_id.clone().map(|response_id| FeedbackControls {
            response_id,
            state: FeedbackState::Active,
        });
        let translation = language
            .as_deref()
            .filter(|lang| *lang != "en")
            .map(|_| TranslationState::Offered);

        let mut height = self.layout.text_height(text);
        if feedback.is_some() {
            height += self.layout.control_row;
        }
        if translation.is_some() {
            height += self.layout.control_row;
        }

        self.entries.push(Entry::Message(RenderedMessage {
            message: Message {
                id,
                author,
                text: text.to_string(),
                response_id,
                language,
            },
            body_html,
            feedback,
            translation,
            height,
        }));
        self.rescroll(ScrollMode::for_author(author), height, Some(id));
        id
    }

    /// Append a typing indicator.
    pub fn show_typing(&mut self) -> TypingId {
        let id = TypingId(self.allocate());
        self.entries.push(Entry::Typing(id));
        self.rescroll(ScrollMode::Bottom, self.layout.typing_height(), None);
        id
    }

    /// Remove a typing indicator. Returns `false` if it was not shown.
    pub fn remove_typing(&mut self, id: TypingId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, Entry::Typing(t) if *t == id));
        before != self.entries.len()
    }

    /// Whether a typing indicator is currently shown.
    #[must_use]
    pub fn is_typing(&self, id: TypingId) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, Entry::Typing(t) if *t == id))
    }

    /// All entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Rendered messages in display order.
    pub fn messages(&self) -> impl Iterator<Item = &RenderedMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(m) => Some(m),
            Entry::Typing(_) => None,
        })
    }

    /// Number of rendered messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages().count()
    }

    /// Whether no message has been rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a message.
    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&RenderedMessage> {
        self.messages().find(|m| m.message.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: MessageId) -> Option<&mut RenderedMessage> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Message(m) if m.message.id == id => Some(m),
            _ => None,
        })
    }

    /// First feedback region bound to `response_id`.
    #[must_use]
    pub fn feedback(&self, response_id: &str) -> Option<&FeedbackControls> {
        self.messages()
            .filter_map(RenderedMessage::feedback)
            .find(|f| f.response_id == response_id)
    }

    pub(crate) fn feedback_mut(&mut self, response_id: &str) -> Option<&mut FeedbackControls> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Message(m) => m.feedback.as_mut().filter(|f| f.response_id == response_id),
            Entry::Typing(_) => None,
        })
    }

    /// Estimated total content height.
    pub fn scroll_height(&self) -> f64 {
        let content: f64 = self
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Message(m) => m.height,
                Entry::Typing(_) => self.layout.typing_height(),
            })
            .sum();
        content.max(self.layout.client_height)
    }

    /// Current scroll position.
    #[must_use]
    pub fn scroll(&self) -> ScrollPosition {
        self.scroll
    }

    fn rescroll(&mut self, mode: ScrollMode, message_height: f64, anchor: Option<MessageId>) {
        let metrics = ScrollMetrics {
            scroll_height: self.scroll_height(),
            client_height: self.layout.client_height,
            message_height,
        };
        self.scroll = ScrollPosition {
            top: scroll_target(mode, metrics),
            mode,
            anchor,
        };
    }
}
