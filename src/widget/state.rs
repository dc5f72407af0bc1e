//! The widget's UI flags, held in one explicit state object.

use super::voice::VoiceState;

/// Page-lifetime UI flags of one widget.
///
/// Only `dark_mode` outlives the page, through the preference store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetState {
    /// Bot replies are spoken aloud.
    pub voice_enabled: bool,
    /// Voice input state machine position.
    pub voice: VoiceState,
    /// Dark theme applied to the document root.
    pub dark_mode: bool,
    /// Panel body hidden by a header click.
    pub panel_collapsed: bool,
}

impl WidgetState {
    /// Whether a recognition session is active.
    #[must_use]
    pub fn recording(&self) -> bool {
        self.voice == VoiceState::Recording
    }
}
