//! Speech output: server-synthesized audio with a browser-synthesizer fallback.

use std::fmt;

use crate::backend::{AudioClip, ChatBackend, SpeechRequest};
use crate::format;

/// Fixed voice parameters for the fallback synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSettings {
    /// Utterance locale.
    pub lang: String,
    /// Speaking rate.
    pub rate: f32,
    /// Voice pitch.
    pub pitch: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// Text for the platform synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Cleaned text to speak.
    pub text: String,
    /// Locale.
    pub lang: String,
    /// Speaking rate.
    pub rate: f32,
    /// Voice pitch.
    pub pitch: f32,
}

/// Something for the platform to play.
#[derive(Debug, Clone, PartialEq)]
pub enum Playback {
    /// Audio synthesized by the backend.
    Audio(AudioClip),
    /// Text for the built-in synthesizer.
    Utterance(Utterance),
}

/// Platform audio/speech output.
pub trait Speaker: Send + fmt::Debug {
    /// Whether a built-in speech synthesizer exists.
    fn synthesis_available(&self) -> bool;

    /// Start playing; the caller has already cancelled anything prior.
    fn play(&mut self, playback: Playback);

    /// Stop any in-progress playback.
    fn cancel(&mut self);
}

/// Speaker for hosts without audio output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn synthesis_available(&self) -> bool {
        false
    }

    fn play(&mut self, _playback: Playback) {}

    fn cancel(&mut self) {}
}

/// How a reply ended up being spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spoken {
    /// Backend audio was played.
    Audio,
    /// The built-in synthesizer was used.
    Synthesizer,
    /// Nothing could be played.
    Silent,
}

/// Speech output controller.
#[derive(Debug)]
pub struct SpeechOutput {
    speaker: Box<dyn Speaker>,
    settings: SpeechSettings,
}

impl SpeechOutput {
    /// Create a controller.
    #[must_use]
    pub fn new(speaker: Box<dyn Speaker>, settings: SpeechSettings) -> Self {
        Self { speaker, settings }
    }

    /// Flip the voice-enabled flag; disabling cancels playback immediately.
    pub fn toggle(&mut self, voice_enabled: &mut bool) {
        *voice_enabled = !*voice_enabled;
        if !*voice_enabled {
            self.speaker.cancel();
        }
        tracing::debug!(name: "speech.toggled", enabled = *voice_enabled, "Speech output toggled");
    }

    /// Speak `text`, replacing any utterance already playing.
    ///
    /// Backend synthesis is tried first; any failure falls back to the
    /// platform synthesizer with dashes stripped and newlines flattened.
    pub async fn speak(&mut self, backend: &dyn ChatBackend, text: &str) -> Spoken {
        self.speaker.cancel();

        let request = SpeechRequest {
            text: text.to_string(),
        };
        match backend.synthesize(&request).await {
            Ok(clip) => {
                tracing::debug!(
                    name: "speech.audio",
                    content_type = %clip.content_type,
                    bytes = clip.bytes.len(),
                    "Playing synthesized audio"
                );
                self.speaker.play(Playback::Audio(clip));
                Spoken::Audio
            }
            Err(e) => {
                tracing::warn!(
                    name: "speech.synthesis.failed",
                    error = %e,
                    "Server speech synthesis failed, falling back"
                );
                if !self.speaker.synthesis_available() {
                    return Spoken::Silent;
                }
                self.speaker.play(Playback::Utterance(Utterance {
                    text: format::speech_text(text),
                    lang: self.settings.lang.clone(),
                    rate: self.settings.rate,
                    pitch: self.settings.pitch,
                }));
                Spoken::Synthesizer
            }
        }
    }
}
