//! Browser bridge for hosted widgets.
//!
//! A hosted widget cannot touch the browser directly: speech recognition,
//! speech synthesis, audio playback and local storage live on the client.
//! [`BrowserBridge`] implements the engine's [`Speaker`], [`Recognizer`] and
//! [`PreferenceStore`] seams by queueing [`Directive`]s, which the host
//! renders into its next response for the glue script to execute once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::widget::speech::{Playback, Speaker, Utterance};
use crate::widget::theme::{self, PreferenceStore};
use crate::widget::voice::{RecognitionErrorKind, RecognitionSettings, Recognizer};
use crate::widget::Platform;

/// Capabilities the browser reported when the widget was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BrowserCapabilities {
    /// `SpeechRecognition` (or a vendor-prefixed variant) exists.
    #[serde(default)]
    pub recognition: bool,
    /// `speechSynthesis` exists.
    #[serde(default)]
    pub synthesis: bool,
}

/// One browser-side effect, executed once by the glue script.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Play synthesized audio from a data URI.
    PlayAudio {
        /// `data:<mime>;base64,<payload>`.
        src: String,
    },
    /// Speak text with the built-in synthesizer.
    Speak(Utterance),
    /// Stop any playback or utterance.
    CancelSpeech,
    /// Start speech recognition.
    StartRecognition(RecognitionSettings),
    /// Stop speech recognition.
    StopRecognition,
    /// Write a local-storage entry.
    StorePreference {
        /// Storage key.
        key: String,
        /// Stored value.
        value: String,
    },
}

impl Directive {
    /// Directive kind as rendered in `data-directive`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayAudio { .. } => "play-audio",
            Self::Speak(_) => "speak",
            Self::CancelSpeech => "cancel-speech",
            Self::StartRecognition(_) => "start-recognition",
            Self::StopRecognition => "stop-recognition",
            Self::StorePreference { .. } => "store-preference",
        }
    }
}

#[derive(Debug, Default)]
struct BridgeInner {
    queue: Vec<Directive>,
    prefs: HashMap<String, String>,
}

/// Shared directive queue standing in for the browser.
#[derive(Debug, Clone, Default)]
pub struct BrowserBridge {
    capabilities: BrowserCapabilities,
    inner: Arc<Mutex<BridgeInner>>,
}

impl BrowserBridge {
    /// Create a bridge seeded with the browser's stored dark-mode value.
    #[must_use]
    pub fn new(capabilities: BrowserCapabilities, dark_mode: Option<bool>) -> Self {
        let bridge = Self {
            capabilities,
            inner: Arc::default(),
        };
        if let Some(dark_mode) = dark_mode {
            // Seeding reflects what the browser already stores; nothing to write back.
            bridge.lock().prefs.insert(
                theme::DARK_MODE_KEY.to_string(),
                if dark_mode { "true" } else { "false" }.to_string(),
            );
        }
        bridge
    }

    /// Platform for a widget driven through this bridge.
    #[must_use]
    pub fn platform(&self, user_agent: impl Into<String>) -> Platform {
        let platform = Platform::headless()
            .with_prefs(Arc::new(self.clone()))
            .with_speaker(Box::new(self.clone()))
            .with_user_agent(user_agent);
        if self.capabilities.recognition {
            platform.with_recognizer(Box::new(self.clone()))
        } else {
            platform
        }
    }

    /// Take every queued directive.
    pub fn drain(&self) -> Vec<Directive> {
        std::mem::take(&mut self.lock().queue)
    }

    fn push(&self, directive: Directive) {
        self.lock().queue.push(directive);
    }

    fn lock(&self) -> MutexGuard<'_, BridgeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Speaker for BrowserBridge {
    fn synthesis_available(&self) -> bool {
        self.capabilities.synthesis
    }

    fn play(&mut self, playback: Playback) {
        let directive = match playback {
            Playback::Audio(clip) => Directive::PlayAudio {
                src: format!(
                    "data:{};base64,{}",
                    clip.content_type,
                    STANDARD.encode(&clip.bytes)
                ),
            },
            Playback::Utterance(utterance) => Directive::Speak(utterance),
        };
        self.push(directive);
    }

    fn cancel(&mut self) {
        self.push(Directive::CancelSpeech);
    }
}

impl Recognizer for BrowserBridge {
    fn start(&mut self, settings: &RecognitionSettings) -> Result<(), RecognitionErrorKind> {
        self.push(Directive::StartRecognition(settings.clone()));
        Ok(())
    }

    fn stop(&mut self) {
        self.push(Directive::StopRecognition);
    }
}

impl PreferenceStore for BrowserBridge {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().prefs.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut inner = self.lock();
        inner.prefs.insert(key.to_string(), value.to_string());
        inner.queue.push(Directive::StorePreference {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AudioClip;

    #[test]
    fn test_audio_becomes_data_uri() {
        let mut bridge = BrowserBridge::default();
        bridge.play(Playback::Audio(AudioClip {
            content_type: "audio/mpeg".to_string(),
            bytes: b"abc".to_vec(),
        }));
        assert_eq!(
            bridge.drain(),
            vec![Directive::PlayAudio {
                src: "data:audio/mpeg;base64,YWJj".to_string()
            }]
        );
        assert!(bridge.drain().is_empty());
    }

    #[test]
    fn test_seeded_preference_is_not_written_back() {
        let bridge = BrowserBridge::new(BrowserCapabilities::default(), Some(true));
        assert!(theme::load_dark_mode(&bridge));
        assert!(bridge.drain().is_empty());

        theme::persist_dark_mode(&bridge, false);
        assert_eq!(
            bridge.drain(),
            vec![Directive::StorePreference {
                key: "darkMode".to_string(),
                value: "false".to_string()
            }]
        );
    }

    #[test]
    fn test_recognizer_only_without_support_is_absent() {
        let bridge = BrowserBridge::new(BrowserCapabilities::default(), None);
        assert!(bridge.platform("ua").recognizer.is_none());

        let bridge = BrowserBridge::new(
            BrowserCapabilities {
                recognition: true,
                synthesis: true,
            },
            None,
        );
        assert!(bridge.platform("ua").recognizer.is_some());
    }
}
