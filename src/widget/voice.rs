//! Voice input state machine.
//!
//! ```text
//!            click / started
//!   Idle ─────────────────────▶ Recording
//!    ▲                              │
//!    └──────────────────────────────┘
//!      click · transcript · error · end
//! ```
//!
//! [`transition`] is the pure transition table; [`VoiceInput`] executes its
//! effects against a [`Recognizer`].

use std::fmt;

/// Input placeholder while idle.
pub const IDLE_PLACEHOLDER: &str = "Type your message...";
/// Input placeholder while recording.
pub const LISTENING_PLACEHOLDER: &str = "Listening...";
/// Posted once at startup when recognition is unavailable.
pub const UNSUPPORTED_MESSAGE: &str = "Voice input is not supported in this browser.";

/// Voice input state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VoiceState {
    /// Not capturing.
    #[default]
    Idle,
    /// A recognition session is active.
    Recording,
}

/// Recognition failure categories reported by the speech engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// No speech was detected.
    NoSpeech,
    /// Microphone access was denied.
    NotAllowed,
    /// The recognition service was unreachable.
    Network,
    /// Anything else, with the engine's code.
    Other(String),
}

impl RecognitionErrorKind {
    /// Map an engine error code (`no-speech`, `not-allowed`, ...).
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "not-allowed" | "service-not-allowed" => Self::NotAllowed,
            "network" => Self::Network,
            other => Self::Other(other.to_string()),
        }
    }

    /// Message shown to the user in an error bubble.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoSpeech => "No speech was detected. Please try again.",
            Self::NotAllowed => {
                "Microphone access was denied. Please allow microphone access and try again."
            }
            Self::Network => {
                "A network error occurred during speech recognition. Please check your connection."
            }
            Self::Other(_) => "Failed to recognize speech. Please try again.",
        }
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpeech => f.write_str("no-speech"),
            Self::NotAllowed => f.write_str("not-allowed"),
            Self::Network => f.write_str("network"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// Callbacks from the speech engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Capture began.
    Started,
    /// A final transcript is available.
    Result(String),
    /// Capture failed.
    Error(RecognitionErrorKind),
    /// Capture ended.
    Ended,
}

/// Inputs to the voice state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceTrigger {
    /// The microphone control was clicked.
    Click,
    /// The speech engine reported an event.
    Engine(RecognitionEvent),
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEffect {
    /// Start the speech engine.
    StartCapture,
    /// Stop the speech engine.
    StopCapture,
    /// Put the transcript in the input and submit it.
    Submit(String),
    /// Show an error bubble.
    ShowError(&'static str),
}

/// Transition table of the voice input state machine.
pub fn transition(state: VoiceState, trigger: VoiceTrigger) -> (VoiceState, Vec<VoiceEffect>) {
    use RecognitionEvent as E;
    use VoiceState::{Idle, Recording};

    match (state, trigger) {
        (Idle, VoiceTrigger::Click) => (Recording, vec![VoiceEffect::StartCapture]),
        (Recording, VoiceTrigger::Click) => (Idle, vec![VoiceEffect::StopCapture]),
        (_, VoiceTrigger::Engine(E::Started)) => (Recording, Vec::new()),
        (_, VoiceTrigger::Engine(E::Result(transcript))) => {
            (Idle, vec![VoiceEffect::Submit(transcript)])
        }
        (_, VoiceTrigger::Engine(E::Error(kind))) => (
            Idle,
            vec![
                VoiceEffect::ShowError(kind.user_message()),
                VoiceEffect::StopCapture,
            ],
        ),
        (_, VoiceTrigger::Engine(E::Ended)) => (Idle, Vec::new()),
    }
}

/// Recognition engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSettings {
    /// Recognition locale.
    pub lang: String,
    /// Keep listening after the first result.
    pub continuous: bool,
    /// Report partial transcripts.
    pub interim_results: bool,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            continuous: false,
            interim_results: false,
        }
    }
}

/// Platform speech-recognition engine.
///
/// Results come back asynchronously through
/// [`ChatWidget::on_recognition`](super::ChatWidget::on_recognition).
pub trait Recognizer: Send + fmt::Debug {
    /// Begin capturing.
    fn start(&mut self, settings: &RecognitionSettings) -> Result<(), RecognitionErrorKind>;

    /// Stop capturing.
    fn stop(&mut self);
}

/// What the widget must do after the voice machine moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    /// Submit this transcript.
    Submit(String),
    /// Show this error.
    Error(&'static str),
}

/// Voice input controller: the state machine bound to an optional engine.
#[derive(Debug)]
pub struct VoiceInput {
    recognizer: Option<Box<dyn Recognizer>>,
    settings: RecognitionSettings,
}

impl VoiceInput {
    /// Create a controller; `None` means recognition is unavailable.
    #[must_use]
    pub fn new(recognizer: Option<Box<dyn Recognizer>>, settings: RecognitionSettings) -> Self {
        Self {
            recognizer,
            settings,
        }
    }

    /// Whether a recognition engine is present.
    #[must_use]
    pub fn available(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Feed a trigger through the machine and run its effects.
    ///
    /// Without an engine every trigger is ignored and the state is untouched.
    pub fn handle(&mut self, state: &mut VoiceState, trigger: VoiceTrigger) -> Vec<VoiceOutcome> {
        let Some(recognizer) = self.recognizer.as_mut() else {
            return Vec::new();
        };

        let (next, effects) = transition(*state, trigger);
        *state = next;

        let mut outcomes = Vec::new();
        for effect in effects {
            match effect {
                VoiceEffect::StartCapture => {
                    if let Err(kind) = recognizer.start(&self.settings) {
                        tracing::warn!(
                            name: "voice.start.failed",
                            error = %kind,
                            "Speech recognition failed to start"
                        );
                        *state = VoiceState::Idle;
                        outcomes.push(VoiceOutcome::Error(kind.user_message()));
                    }
                }
                VoiceEffect::StopCapture => recognizer.stop(),
                VoiceEffect::Submit(transcript) => outcomes.push(VoiceOutcome::Submit(transcript)),
                VoiceEffect::ShowError(message) => outcomes.push(VoiceOutcome::Error(message)),
            }
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeRecognizer {
        starts: usize,
        stops: usize,
        fail_with: Option<RecognitionErrorKind>,
    }

    impl Recognizer for FakeRecognizer {
        fn start(&mut self, _settings: &RecognitionSettings) -> Result<(), RecognitionErrorKind> {
            self.starts += 1;
            self.fail_with.clone().map_or(Ok(()), Err)
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn test_click_toggles_recording() {
        assert_eq!(
            transition(VoiceState::Idle, VoiceTrigger::Click),
            (VoiceState::Recording, vec![VoiceEffect::StartCapture])
        );
        assert_eq!(
            transition(VoiceState::Recording, VoiceTrigger::Click),
            (VoiceState::Idle, vec![VoiceEffect::StopCapture])
        );
    }

    #[test]
    fn test_transcript_submits_and_idles() {
        let (state, effects) = transition(
            VoiceState::Recording,
            VoiceTrigger::Engine(RecognitionEvent::Result("grades".into())),
        );
        assert_eq!(state, VoiceState::Idle);
        assert_eq!(effects, vec![VoiceEffect::Submit("grades".into())]);
    }

    #[test]
    fn test_error_categories_map_to_messages() {
        assert_eq!(
            RecognitionErrorKind::from_code("no-speech").user_message(),
            "No speech was detected. Please try again."
        );
        assert_eq!(RecognitionErrorKind::from_code("not-allowed"), RecognitionErrorKind::NotAllowed);
        assert_eq!(RecognitionErrorKind::from_code("network"), RecognitionErrorKind::Network);
        assert_eq!(
            RecognitionErrorKind::from_code("aborted").user_message(),
            "Failed to recognize speech. Please try again."
        );
    }

    #[test]
    fn test_error_always_returns_to_idle() {
        for state in [VoiceState::Idle, VoiceState::Recording] {
            let (next, effects) = transition(
                state,
                VoiceTrigger::Engine(RecognitionEvent::Error(RecognitionErrorKind::Network)),
            );
            assert_eq!(next, VoiceState::Idle);
            assert!(effects.contains(&VoiceEffect::StopCapture));
        }
    }

    #[test]
    fn test_unavailable_engine_ignores_clicks() {
        let mut voice = VoiceInput::new(None, RecognitionSettings::default());
        let mut state = VoiceState::Idle;
        assert!(voice.handle(&mut state, VoiceTrigger::Click).is_empty());
        assert_eq!(state, VoiceState::Idle);
    }

    #[test]
    fn test_failed_start_reverts_to_idle() {
        let mut voice = VoiceInput::new(
            Some(Box::new(FakeRecognizer {
                fail_with: Some(RecognitionErrorKind::NotAllowed),
                ..FakeRecognizer::default()
            })),
            RecognitionSettings::default(),
        );
        let mut state = VoiceState::Idle;
        let outcomes = voice.handle(&mut state, VoiceTrigger::Click);
        assert_eq!(state, VoiceState::Idle);
        assert_eq!(
            outcomes,
            vec![VoiceOutcome::Error(RecognitionErrorKind::NotAllowed.user_message())]
        );
    }
}
