//! End-to-end widget behavior against a scripted backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chat_widget::backend::{
    AudioClip, ChatBackend, ChatReply, FeedbackRecord, SendMessageForm, SpeechRequest,
    TranslateReply, TranslateRequest,
};
use chat_widget::error::{Result, WidgetError};
use chat_widget::widget::log::Entry;
use chat_widget::widget::send::SEND_ERROR_MESSAGE;
use chat_widget::widget::voice::UNSUPPORTED_MESSAGE;
use chat_widget::widget::{
    Author, ChatWidget, MemoryPreferences, Platform, Playback, PreferenceStore, RecognitionErrorKind,
    RecognitionEvent, RecognitionSettings, Recognizer, SendOutcome, SendState, Speaker, Spoken,
    WidgetSettings,
};

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Debug, Default)]
struct Calls {
    sends: Vec<SendMessageForm>,
    feedback: Vec<FeedbackRecord>,
    translations: Vec<TranslateRequest>,
    speech: Vec<SpeechRequest>,
}

#[derive(Debug, Default)]
struct ScriptedBackend {
    calls: Mutex<Calls>,
    reply: Option<ChatReply>,
    translation: Option<String>,
    audio: bool,
    reject_feedback: bool,
}

impl ScriptedBackend {
    fn answering(answer: &str, response_id: Option<&str>, lang: Option<&str>) -> Self {
        Self {
            reply: Some(ChatReply {
                answer: Some(answer.to_string()),
                response_id: response_id.map(str::to_string),
                response_lang: lang.map(str::to_string),
            }),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }

    fn with_translation(mut self, text: &str) -> Self {
        self.translation = Some(text.to_string());
        self
    }

    fn rejecting_feedback(mut self) -> Self {
        self.reject_feedback = true;
        self
    }

    fn with_audio(mut self) -> Self {
        self.audio = true;
        self
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
        self.calls.lock().unwrap()
    }
}

fn unavailable() -> WidgetError {
    WidgetError::Api {
        status: 503,
        message: "unavailable".to_string(),
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send_message(&self, form: &SendMessageForm) -> Result<ChatReply> {
        self.calls().sends.push(form.clone());
        self.reply.clone().ok_or_else(unavailable)
    }

    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<()> {
        self.calls().feedback.push(record.clone());
        if self.reject_feedback {
            Err(unavailable())
        } else {
            Ok(())
        }
    }

    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateReply> {
        self.calls().translations.push(request.clone());
        match &self.translation {
            Some(text) => Ok(TranslateReply {
                translated_text: Some(text.clone()),
            }),
            None => Err(unavailable()),
        }
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioClip> {
        self.calls().speech.push(request.clone());
        if self.audio {
            Ok(AudioClip {
                content_type: "audio/mpeg".to_string(),
                bytes: vec![0xff, 0xfb],
            })
        } else {
            Err(WidgetError::EmptyAudio)
        }
    }
}

#[derive(Debug, Clone, Default)]
struct RecordingSpeaker {
    played: Arc<Mutex<Vec<Playback>>>,
    cancels: Arc<Mutex<usize>>,
}

impl Speaker for RecordingSpeaker {
    fn synthesis_available(&self) -> bool {
        true
    }

    fn play(&mut self, playback: Playback) {
        self.played.lock().unwrap().push(playback);
    }

    fn cancel(&mut self) {
        *self.cancels.lock().unwrap() += 1;
    }
}

#[derive(Debug, Default)]
struct StubRecognizer;

impl Recognizer for StubRecognizer {
    fn start(&mut self, _settings: &RecognitionSettings) -> std::result::Result<(), RecognitionErrorKind> {
        Ok(())
    }

    fn stop(&mut self) {}
}

fn quiet_settings() -> WidgetSettings {
    WidgetSettings {
        greeting: None,
        ..WidgetSettings::default()
    }
}

fn widget(backend: &Arc<ScriptedBackend>, platform: Platform) -> ChatWidget {
    let backend: Arc<dyn ChatBackend> = Arc::clone(backend) as Arc<dyn ChatBackend>;
    ChatWidget::new(quiet_settings(), backend, platform)
}

fn with_voice() -> Platform {
    Platform::headless().with_recognizer(Box::new(StubRecognizer))
}

fn authors(widget: &ChatWidget) -> Vec<Author> {
    widget.log().messages().map(|m| m.message().author()).collect()
}

fn typing_count(widget: &ChatWidget) -> usize {
    widget
        .log()
        .entries()
        .iter()
        .filter(|entry| matches!(entry, Entry::Typing(_)))
        .count()
}

// ============================================================================
// Initialization
// ============================================================================

#[tokio::test]
async fn test_greeting_and_unsupported_voice_notice() {
    let backend = Arc::new(ScriptedBackend::failing());
    let widget = ChatWidget::new(
        WidgetSettings::default(),
        Arc::clone(&backend) as Arc<dyn ChatBackend>,
        Platform::headless(),
    );

    assert_eq!(authors(&widget), vec![Author::System, Author::Bot]);
    let notice = widget.log().messages().next().unwrap();
    assert_eq!(notice.message().text(), UNSUPPORTED_MESSAGE);
    assert!(widget.session_id().as_str().starts_with("session_"));
}

#[tokio::test]
async fn test_dark_mode_survives_reinitialization() {
    let backend = Arc::new(ScriptedBackend::failing());
    let prefs: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferences::new());

    let mut first = widget(&backend, Platform::headless().with_prefs(Arc::clone(&prefs)));
    assert!(!first.state().dark_mode);
    first.click_theme();
    assert!(first.state().dark_mode);

    let second = widget(&backend, Platform::headless().with_prefs(prefs));
    assert!(second.state().dark_mode);
}

#[tokio::test]
async fn test_stored_dark_theme_applies_and_toggles_off() {
    let backend = Arc::new(ScriptedBackend::failing());
    let prefs: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferences::with_dark_mode(true));

    let mut widget = widget(&backend, Platform::headless().with_prefs(Arc::clone(&prefs)));
    assert!(widget.state().dark_mode);
    widget.click_theme();
    assert!(!widget.state().dark_mode);
    assert_eq!(prefs.get("darkMode").as_deref(), Some("false"));
}

// ============================================================================
// Send flow
// ============================================================================

#[tokio::test]
async fn test_whitespace_input_makes_no_request() {
    let backend = Arc::new(ScriptedBackend::answering("hi", None, None));
    let mut widget = widget(&backend, with_voice());
    widget.set_input("   \t ");

    assert!(widget.submit().await.is_none());
    assert!(backend.calls().sends.is_empty());
    assert!(widget.log().is_empty());
}

#[tokio::test]
async fn test_answer_replaces_typing_indicator() {
    let backend = Arc::new(ScriptedBackend::answering(
        "Sure:\n- step one\n- step two",
        Some("r-9"),
        Some("en"),
    ));
    let mut widget = widget(&backend, with_voice());
    widget.set_input("  how do I submit?  ");

    let ticket = widget.begin_send().unwrap();
    assert_eq!(widget.input(), "");
    assert_eq!(typing_count(&widget), 1);
    assert_eq!(widget.send_state(), SendState::Sending);

    let outcome = widget.complete(ticket).await;
    assert!(matches!(outcome, Some(SendOutcome::Answered(_))));
    assert_eq!(typing_count(&widget), 0);
    assert_eq!(widget.send_state(), SendState::Idle);

    let sends = &backend.calls().sends;
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].message, "how do I submit?");
    assert_eq!(sends[0].session_id, widget.session_id().as_str());

    let bot = widget.log().messages().last().unwrap();
    assert_eq!(bot.message().author(), Author::Bot);
    assert!(bot.body_html().contains("<ul>"));
    assert_eq!(bot.feedback().unwrap().response_id(), "r-9");
    assert!(bot.translation().is_none());
}

#[tokio::test]
async fn test_failed_send_shows_exactly_one_error() {
    let backend = Arc::new(ScriptedBackend::failing());
    let mut widget = widget(&backend, with_voice());
    widget.set_input("hello");

    let outcome = widget.submit().await;
    assert!(matches!(outcome, Some(SendOutcome::Failed(_))));
    assert_eq!(typing_count(&widget), 0);
    assert_eq!(widget.send_state(), SendState::ErrorDisplayed);
    assert_eq!(authors(&widget), vec![Author::User, Author::Error]);
    assert_eq!(
        widget.log().messages().last().unwrap().message().text(),
        SEND_ERROR_MESSAGE
    );
}

#[tokio::test]
async fn test_empty_answer_counts_as_failure() {
    let backend = Arc::new(ScriptedBackend::answering("", Some("r1"), None));
    let mut widget = widget(&backend, with_voice());
    widget.set_input("hello");

    assert!(matches!(widget.submit().await, Some(SendOutcome::Failed(_))));
}

#[tokio::test]
async fn test_stale_ticket_is_ignored() {
    let backend = Arc::new(ScriptedBackend::answering("hi", None, None));
    let mut widget = widget(&backend, with_voice());
    widget.set_input("hello");

    let ticket = widget.begin_send().unwrap();
    assert!(widget.complete(ticket).await.is_some());
    assert!(widget.complete(ticket).await.is_none());
    assert_eq!(backend.calls().sends.len(), 1);
}

// ============================================================================
// Feedback and translation
// ============================================================================

#[tokio::test]
async fn test_second_feedback_click_is_ignored() {
    let backend = Arc::new(ScriptedBackend::answering("answer", Some("resp-1"), None));
    let mut widget = widget(&backend, with_voice().with_user_agent("agent/1.0"));
    widget.set_input("question");
    widget.submit().await;

    assert!(widget.click_feedback("resp-1", true).await);
    assert!(!widget.click_feedback("resp-1", false).await);

    let feedback = &backend.calls().feedback;
    assert_eq!(feedback.len(), 1);
    assert!(feedback[0].is_positive);
    assert_eq!(feedback[0].metadata.user_agent, "agent/1.0");
    assert!(feedback[0].metadata.timestamp.ends_with('Z'));
    assert!(widget.view().feedback("resp-1").unwrap().submitted);
}

#[tokio::test]
async fn test_rejected_feedback_keeps_controls_active() {
    let backend = Arc::new(
        ScriptedBackend::answering("answer", Some("resp-1"), None).rejecting_feedback(),
    );
    let mut widget = widget(&backend, with_voice());
    widget.set_input("question");
    widget.submit().await;

    assert!(!widget.click_feedback("resp-1", true).await);
    let view = widget.view();
    assert!(!view.feedback("resp-1").unwrap().submitted);

    // The region is still clickable, so the next vote goes out again.
    assert!(!widget.click_feedback("resp-1", false).await);
    let feedback = &backend.calls().feedback;
    assert_eq!(feedback.len(), 2);
    assert!(!feedback[1].is_positive);
    assert!(!widget.view().feedback("resp-1").unwrap().submitted);
}

#[tokio::test]
async fn test_feedback_for_unknown_response_is_ignored() {
    let backend = Arc::new(ScriptedBackend::failing());
    let mut widget = widget(&backend, with_voice());

    assert!(!widget.click_feedback("missing", true).await);
    assert!(backend.calls().feedback.is_empty());
}

#[tokio::test]
async fn test_translation_appends_text_once() {
    let backend = Arc::new(
        ScriptedBackend::answering("Hola, ¿cómo estás?", None, Some("es"))
            .with_translation("Hello, how are you?"),
    );
    let mut widget = widget(&backend, with_voice());
    widget.set_input("hi");
    let Some(SendOutcome::Answered(id)) = widget.submit().await else {
        panic!("expected an answer");
    };

    assert!(widget.click_translate(id).await);
    assert!(!widget.click_translate(id).await);

    let translations = &backend.calls().translations;
    assert_eq!(translations.len(), 1);
    assert_eq!(translations[0].target_lang, "en");
    assert_eq!(translations[0].text, "Hola, ¿cómo estás?");
}

#[tokio::test]
async fn test_failed_translation_keeps_affordance() {
    let backend = Arc::new(ScriptedBackend::answering("Bonjour", None, Some("fr")));
    let mut widget = widget(&backend, with_voice());
    widget.set_input("hi");
    let Some(SendOutcome::Answered(id)) = widget.submit().await else {
        panic!("expected an answer");
    };

    assert!(!widget.click_translate(id).await);
    assert!(!widget.click_translate(id).await);
    assert_eq!(backend.calls().translations.len(), 2);
}

// ============================================================================
// Voice input
// ============================================================================

#[tokio::test]
async fn test_microphone_without_engine_is_noop() {
    let backend = Arc::new(ScriptedBackend::failing());
    let mut widget = widget(&backend, Platform::headless());
    let before = widget.log().len();

    assert!(widget.click_microphone().is_none());
    assert!(!widget.state().recording());
    assert_eq!(widget.log().len(), before);
}

#[tokio::test]
async fn test_transcript_submits_like_typed_input() {
    let backend = Arc::new(ScriptedBackend::answering("On it", None, None));
    let mut widget = widget(&backend, with_voice());

    assert!(widget.click_microphone().is_none());
    assert!(widget.state().recording());
    assert_eq!(widget.placeholder(), "Listening...");

    let ticket = widget
        .on_recognition(RecognitionEvent::Result("open my grades".to_string()))
        .unwrap();
    assert!(!widget.state().recording());
    assert_eq!(widget.placeholder(), "Type your message...");

    widget.complete(ticket).await;
    assert_eq!(backend.calls().sends[0].message, "open my grades");
}

#[tokio::test]
async fn test_recognition_error_shows_bubble() {
    let backend = Arc::new(ScriptedBackend::failing());
    let mut widget = widget(&backend, with_voice());
    widget.click_microphone();

    widget.on_recognition(RecognitionEvent::Error(RecognitionErrorKind::from_code(
        "not-allowed",
    )));
    assert!(!widget.state().recording());
    let last = widget.log().messages().last().unwrap();
    assert_eq!(last.message().author(), Author::Error);
    assert!(last.message().text().starts_with("Microphone access was denied"));
}

// ============================================================================
// Speech output
// ============================================================================

#[tokio::test]
async fn test_spoken_reply_prefers_backend_audio() {
    let backend = Arc::new(ScriptedBackend::answering("Done", None, None).with_audio());
    let speaker = RecordingSpeaker::default();
    let mut widget = widget(&backend, with_voice().with_speaker(Box::new(speaker.clone())));
    widget.click_speaker();
    widget.set_input("hi");

    widget.submit().await;

    assert_eq!(backend.calls().speech.len(), 1);
    let played = speaker.played.lock().unwrap();
    assert!(matches!(played.as_slice(), [Playback::Audio(_)]));
}

#[tokio::test]
async fn test_speech_falls_back_to_synthesizer() {
    let backend = Arc::new(ScriptedBackend::failing());
    let speaker = RecordingSpeaker::default();
    let mut widget = widget(&backend, with_voice().with_speaker(Box::new(speaker.clone())));

    let spoken = widget.speak("Steps:\n- one\n- two").await;
    assert_eq!(spoken, Spoken::Synthesizer);

    let played = speaker.played.lock().unwrap();
    let [Playback::Utterance(utterance)] = played.as_slice() else {
        panic!("expected one utterance");
    };
    assert!(!utterance.text.contains('-'));
    assert!(!utterance.text.contains('\n'));
    assert_eq!(utterance.lang, "en-US");
}

#[tokio::test]
async fn test_disabling_speech_cancels_playback() {
    let backend = Arc::new(ScriptedBackend::failing());
    let speaker = RecordingSpeaker::default();
    let mut widget = widget(&backend, with_voice().with_speaker(Box::new(speaker.clone())));

    widget.click_speaker();
    assert!(widget.state().voice_enabled);
    let before = *speaker.cancels.lock().unwrap();
    widget.click_speaker();
    assert!(!widget.state().voice_enabled);
    assert_eq!(*speaker.cancels.lock().unwrap(), before + 1);
}
