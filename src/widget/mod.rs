//! The headless chat widget engine.
//!
//! [`ChatWidget`] owns a session identifier, the UI flags ([`WidgetState`]),
//! the message log and the controllers for voice input, speech output and
//! sending. Browser capabilities are reached through the [`Platform`] seams
//! ([`Recognizer`], [`Speaker`], [`PreferenceStore`]) and the chat backend
//! through [`ChatBackend`], so every behavior runs without a browser.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chat_widget::backend::HttpBackend;
//! use chat_widget::widget::{ChatWidget, Platform, WidgetSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(HttpBackend::new("http://localhost:5000")?);
//! let mut widget = ChatWidget::new(WidgetSettings::default(), backend, Platform::headless());
//!
//! widget.set_input("How do I see my grades?");
//! widget.submit().await;
//! # Ok(())
//! # }
//! ```

pub mod log;
pub mod send;
pub mod speech;
pub mod state;
pub mod theme;
pub mod view;
pub mod voice;

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, info, warn};

use crate::backend::{ChatBackend, ChatReply, FeedbackMetadata, FeedbackRecord, SendMessageForm, TranslateRequest};
use crate::error::WidgetError;
use crate::session::SessionId;

pub use log::{Author, Layout, MessageId, MessageLog, TypingId};
pub use send::{PendingReply, PendingSend, SendFlow, SendOutcome, SendState};
pub use speech::{Playback, SilentSpeaker, Speaker, SpeechOutput, SpeechSettings, Spoken, Utterance};
pub use state::WidgetState;
pub use theme::{HeaderTarget, MemoryPreferences, PreferenceStore};
pub use view::{EntryView, FeedbackView, MessageView, TranslationView, WidgetView};
pub use voice::{
    RecognitionErrorKind, RecognitionEvent, RecognitionSettings, Recognizer, VoiceInput,
    VoiceOutcome, VoiceState, VoiceTrigger,
};

use log::{FeedbackState, TranslationState};

/// Default greeting posted when a widget starts.
pub const DEFAULT_GREETING: &str = "Hi! I'm your Canvas assistant. How can I help you today?";

/// Presentation settings of a widget.
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    /// Header title.
    pub title: String,
    /// Bot message posted at startup.
    pub greeting: Option<String>,
    /// Input placeholder while idle.
    pub placeholder: String,
    /// Input placeholder while recording.
    pub listening_placeholder: String,
    /// Recognition engine settings.
    pub recognition: RecognitionSettings,
    /// Fallback synthesizer settings.
    pub speech: SpeechSettings,
    /// Height estimation for scroll arithmetic.
    pub layout: Layout,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            title: "Canvas Assistant".to_string(),
            greeting: Some(DEFAULT_GREETING.to_string()),
            placeholder: voice::IDLE_PLACEHOLDER.to_string(),
            listening_placeholder: voice::LISTENING_PLACEHOLDER.to_string(),
            recognition: RecognitionSettings::default(),
            speech: SpeechSettings::default(),
            layout: Layout::default(),
        }
    }
}

/// Browser capabilities handed to a widget at initialization.
#[derive(Debug)]
pub struct Platform {
    /// Preference storage (local storage).
    pub prefs: Arc<dyn PreferenceStore>,
    /// Audio/speech output.
    pub speaker: Box<dyn Speaker>,
    /// Speech recognition; `None` when unsupported.
    pub recognizer: Option<Box<dyn Recognizer>>,
    /// User agent reported with feedback.
    pub user_agent: String,
}

impl Platform {
    /// A platform with in-memory preferences, no audio and no recognition.
    #[must_use]
    pub fn headless() -> Self {
        Self {
            prefs: Arc::new(MemoryPreferences::new()),
            speaker: Box::new(SilentSpeaker),
            recognizer: None,
            user_agent: concat!("chat-widget/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Replace the preference store.
    #[must_use]
    pub fn with_prefs(mut self, prefs: Arc<dyn PreferenceStore>) -> Self {
        self.prefs = prefs;
        self
    }

    /// Replace the speaker.
    #[must_use]
    pub fn with_speaker(mut self, speaker: Box<dyn Speaker>) -> Self {
        self.speaker = speaker;
        self
    }

    /// Provide a recognition engine.
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: Box<dyn Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// One embedded chat widget.
#[derive(Debug)]
pub struct ChatWidget {
    session_id: SessionId,
    settings: WidgetSettings,
    state: WidgetState,
    input: String,
    log: MessageLog,
    voice: VoiceInput,
    speech: SpeechOutput,
    sends: SendFlow,
    backend: Arc<dyn ChatBackend>,
    prefs: Arc<dyn PreferenceStore>,
    user_agent: String,
}

impl ChatWidget {
    /// Initialize a widget with a fresh session identifier.
    pub fn new(settings: WidgetSettings, backend: Arc<dyn ChatBackend>, platform: Platform) -> Self {
        Self::with_session(SessionId::generate(), settings, backend, platform)
    }

    /// Initialize a widget with a given session identifier.
    ///
    /// Applies the stored dark-mode preference, announces missing voice
    /// input once, and posts the greeting.
    pub fn with_session(
        session_id: SessionId,
        settings: WidgetSettings,
        backend: Arc<dyn ChatBackend>,
        platform: Platform,
    ) -> Self {
        let Platform {
            prefs,
            speaker,
            recognizer,
            user_agent,
        } = platform;

        let state = WidgetState {
            dark_mode: theme::load_dark_mode(&*prefs),
            ..WidgetState::default()
        };
        let voice = VoiceInput::new(recognizer, settings.recognition.clone());
        let speech = SpeechOutput::new(speaker, settings.speech.clone());
        let mut log = MessageLog::new(settings.layout);

        if !voice.available() {
            log.append(Author::System, voice::UNSUPPORTED_MESSAGE, None, None);
        }
        if let Some(greeting) = &settings.greeting {
            log.append(Author::Bot, greeting, None, None);
        }

        info!(
            name: "widget.initialized",
            session_id = %session_id,
            dark_mode = state.dark_mode,
            voice_input = voice.available(),
            "Chat widget initialized"
        );

        Self {
            session_id,
            settings,
            state,
            input: String::new(),
            log,
            voice,
            speech,
            sends: SendFlow::default(),
            backend,
            prefs,
            user_agent,
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// UI flags.
    #[must_use]
    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// Message log.
    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Current input value.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input value.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send flow state.
    #[must_use]
    pub fn send_state(&self) -> SendState {
        self.sends.state()
    }

    /// Current input placeholder.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        if self.state.recording() {
            &self.settings.listening_placeholder
        } else {
            &self.settings.placeholder
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Send flow
    // ─────────────────────────────────────────────────────────────────────

    /// Start a send cycle from the current input.
    ///
    /// Empty or whitespace-only input is a no-op. Otherwise the trimmed
    /// message is rendered, the input cleared, a typing indicator shown and
    /// the cycle parked under the returned ticket.
    pub fn begin_send(&mut self) -> Option<TypingId> {
        let message = self.input.trim().to_string();
        if message.is_empty() {
            return None;
        }

        self.log.append(Author::User, &message, None, None);
        self.input.clear();
        let ticket = self.log.show_typing();

        let form = SendMessageForm {
            message,
            session_id: self.session_id.to_string(),
        };
        self.sends
            .park(PendingSend::new(ticket, form, Arc::clone(&self.backend)));

        debug!(
            name: "send.begin",
            session_id = %self.session_id,
            ticket = %ticket,
            "Send cycle started"
        );
        Some(ticket)
    }

    /// Remove a parked cycle so it can be dispatched.
    pub fn take_pending(&mut self, ticket: TypingId) -> Option<PendingSend> {
        self.sends.take(ticket)
    }

    /// Settle a cycle: drop its typing indicator, then render the answer or
    /// the error bubble, and speak the answer when speech output is on.
    ///
    /// Returns `None` for a ticket whose indicator is no longer shown.
    pub async fn finish_send(&mut self, reply: PendingReply) -> Option<SendOutcome> {
        let PendingReply { ticket, result } = reply;
        if !self.log.remove_typing(ticket) {
            warn!(
                name: "send.unknown_ticket",
                session_id = %self.session_id,
                ticket = %ticket,
                "Reply for a typing indicator that is not shown"
            );
            return None;
        }

        let reply = result.and_then(|reply| match reply {
            ChatReply {
                answer: Some(answer),
                response_id,
                response_lang,
            } if !answer.is_empty() => Ok((answer, response_id, response_lang)),
            _ => Err(WidgetError::MissingField("answer")),
        });

        match reply {
            Ok((answer, response_id, response_lang)) => {
                self.sends.settle(false);
                let id = self
                    .log
                    .append(Author::Bot, &answer, response_id.clone(), response_lang);
                info!(
                    name: "send.answered",
                    session_id = %self.session_id,
                    response_id = ?response_id,
                    "Bot answer rendered"
                );
                if self.state.voice_enabled {
                    self.speak(&answer).await;
                }
                Some(SendOutcome::Answered(id))
            }
            Err(e) => {
                self.sends.settle(true);
                error!(
                    name: "send.failed",
                    session_id = %self.session_id,
                    error = %e,
                    "Send cycle failed"
                );
                let id = self
                    .log
                    .append(Author::Error, send::SEND_ERROR_MESSAGE, None, None);
                Some(SendOutcome::Failed(id))
            }
        }
    }

    /// Dispatch a parked cycle and settle it.
    pub async fn complete(&mut self, ticket: TypingId) -> Option<SendOutcome> {
        let pending = self.take_pending(ticket)?;
        let reply = pending.dispatch().await;
        self.finish_send(reply).await
    }

    /// Submit the current input and wait for the reply.
    pub async fn submit(&mut self) -> Option<SendOutcome> {
        let ticket = self.begin_send()?;
        self.complete(ticket).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Feedback & translation
    // ─────────────────────────────────────────────────────────────────────

    /// Thumbs-up/down click on the region bound to `response_id`.
    ///
    /// At most one submission is accepted per region: clicks while a
    /// submission is in flight or after it succeeded are ignored. A failed
    /// submission leaves the controls active. Returns `true` when this click
    /// was accepted by the backend.
    pub async fn click_feedback(&mut self, response_id: &str, is_positive: bool) -> bool {
        match self.log.feedback_mut(response_id) {
            Some(controls) if controls.state() == FeedbackState::Active => {
                controls.set_state(FeedbackState::Submitting);
            }
            _ => {
                debug!(
                    name: "feedback.ignored",
                    session_id = %self.session_id,
                    response_id = %response_id,
                    "Feedback click ignored"
                );
                return false;
            }
        }

        let record = FeedbackRecord {
            response_id: response_id.to_string(),
            is_positive,
            session_id: self.session_id.to_string(),
            metadata: FeedbackMetadata {
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                user_agent: self.user_agent.clone(),
            },
        };
        let result = self.backend.submit_feedback(&record).await;

        let accepted = result.is_ok();
        if let Some(controls) = self.log.feedback_mut(response_id) {
            controls.set_state(if accepted {
                FeedbackState::Submitted
            } else {
                FeedbackState::Active
            });
        }
        match result {
            Ok(()) => info!(
                name: "feedback.submitted",
                session_id = %self.session_id,
                response_id = %response_id,
                is_positive,
                "Feedback submitted"
            ),
            Err(e) => warn!(
                name: "feedback.failed",
                session_id = %self.session_id,
                response_id = %response_id,
                error = %e,
                "Failed to submit feedback"
            ),
        }
        accepted
    }

    /// "Translate to English" click on a message.
    ///
    /// On success the translation is appended beneath the original and the
    /// affordance removed; otherwise the affordance stays clickable.
    pub async fn click_translate(&mut self, id: MessageId) -> bool {
        let (text, source_lang) = match self.log.get_mut(id) {
            Some(rendered) => {
                let text = rendered.message().text().to_string();
                let source_lang = rendered.message().language().unwrap_or_default().to_string();
                match rendered.translation_mut() {
                    Some(state @ TranslationState::Offered) => {
                        *state = TranslationState::Translating;
                        (text, source_lang)
                    }
                    _ => return false,
                }
            }
            None => return false,
        };

        let result = self
            .backend
            .translate(&TranslateRequest::to_english(text))
            .await;
        let translated = match result {
            Ok(reply) => reply.translated_text.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(
                    name: "translate.failed",
                    session_id = %self.session_id,
                    message_id = %id,
                    error = %e,
                    "Translation request failed"
                );
                None
            }
        };

        let Some(state) = self.log.get_mut(id).and_then(|m| m.translation_mut()) else {
            return false;
        };
        if let Some(text) = translated {
            *state = TranslationState::Translated(text);
            debug!(
                name: "translate.done",
                session_id = %self.session_id,
                message_id = %id,
                source_lang = %source_lang,
                "Message translated"
            );
            true
        } else {
            *state = TranslationState::Offered;
            warn!(
                name: "translate.empty",
                session_id = %self.session_id,
                message_id = %id,
                "No translated text; affordance kept"
            );
            false
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Voice input & speech output
    // ─────────────────────────────────────────────────────────────────────

    /// Microphone click. Without recognition support nothing changes.
    ///
    /// Returns the ticket of a send cycle if one was started.
    pub fn click_microphone(&mut self) -> Option<TypingId> {
        self.drive_voice(VoiceTrigger::Click)
    }

    /// Speech engine callback.
    ///
    /// A transcript replaces the input and starts a send cycle as if the
    /// user had submitted; its ticket is returned so the caller can complete
    /// it. Errors become an error bubble.
    pub fn on_recognition(&mut self, event: RecognitionEvent) -> Option<TypingId> {
        self.drive_voice(VoiceTrigger::Engine(event))
    }

    fn drive_voice(&mut self, trigger: VoiceTrigger) -> Option<TypingId> {
        let outcomes = self.voice.handle(&mut self.state.voice, trigger);
        let mut ticket = None;
        for outcome in outcomes {
            match outcome {
                VoiceOutcome::Submit(transcript) => {
                    debug!(name: "voice.transcript", session_id = %self.session_id, "Transcript received");
                    self.input = transcript;
                    ticket = self.begin_send().or(ticket);
                }
                VoiceOutcome::Error(message) => {
                    self.log.append(Author::Error, message, None, None);
                }
            }
        }
        ticket
    }

    /// Speaker click: toggle spoken replies.
    pub fn click_speaker(&mut self) {
        self.speech.toggle(&mut self.state.voice_enabled);
    }

    /// Speak text through the speech output controller.
    pub async fn speak(&mut self, text: &str) -> Spoken {
        self.speech.speak(&*self.backend, text).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Theme & panel
    // ─────────────────────────────────────────────────────────────────────

    /// Header click: toggles the panel body unless a button was hit.
    pub fn click_header(&mut self, target: HeaderTarget) {
        if target == HeaderTarget::Background {
            self.state.panel_collapsed = !self.state.panel_collapsed;
        }
    }

    /// Theme click: toggle dark mode and persist it.
    pub fn click_theme(&mut self) {
        self.state.dark_mode = !self.state.dark_mode;
        theme::persist_dark_mode(&*self.prefs, self.state.dark_mode);
        debug!(
            name: "theme.toggled",
            session_id = %self.session_id,
            dark_mode = self.state.dark_mode,
            "Theme toggled"
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    /// Owned snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> WidgetView {
        let entries = self
            .log
            .entries()
            .iter()
            .map(|entry| match entry {
                log::Entry::Message(rendered) => EntryView::Message(MessageView {
                    id: rendered.message().id(),
                    author: rendered.message().author(),
                    body_html: rendered.body_html().to_string(),
                    feedback: rendered.feedback().map(|f| FeedbackView {
                        response_id: f.response_id().to_string(),
                        submitted: f.state() == FeedbackState::Submitted,
                    }),
                    translation: rendered.translation().map(|t| match t {
                        TranslationState::Translated(text) => TranslationView::Translated(text.clone()),
                        TranslationState::Offered | TranslationState::Translating => {
                            TranslationView::Offered
                        }
                    }),
                }),
                log::Entry::Typing(id) => EntryView::Typing(*id),
            })
            .collect();

        WidgetView {
            session_id: self.session_id.to_string(),
            title: self.settings.title.clone(),
            dark_mode: self.state.dark_mode,
            panel_collapsed: self.state.panel_collapsed,
            voice_enabled: self.state.voice_enabled,
            recording: self.state.recording(),
            microphone_available: self.voice.available(),
            placeholder: self.placeholder().to_string(),
            input: self.input.clone(),
            entries,
            scroll: self.log.scroll(),
            pending: self.sends.parked(),
        }
    }
}
