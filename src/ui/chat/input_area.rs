//! Chat input area component.

use leptos::prelude::*;

use crate::ui::components::{Button, ButtonSize, ButtonVariant, MicrophoneIcon, SendIcon, VolumeIcon};

/// Message input with microphone, speaker and send controls.
#[component]
pub fn ChatInputArea(
    /// Session the form posts to.
    session_id: String,
    /// Current placeholder.
    placeholder: String,
    /// Current input value.
    #[prop(default = String::new())]
    input: String,
    /// Show the microphone control.
    microphone_available: bool,
    /// A recognition session is active.
    recording: bool,
    /// Bot replies are spoken.
    voice_enabled: bool,
) -> impl IntoView {
    let microphone = microphone_available.then(|| {
        view! { <MicrophoneButton session_id=session_id.clone() recording=recording /> }
    });

    view! {
        <div class="input-area">
            <form
                id="chat-form"
                hx-post=format!("/widget/{session_id}/send")
                hx-target="#chatbot-widget"
                hx-swap="outerHTML"
            >
                <div class="input-group">
                    <input
                        id="chatbot-input"
                        type="text"
                        name="message"
                        autocomplete="off"
                        placeholder=placeholder
                        value=input
                    />
                    {microphone}
                    <SpeakerButton session_id=session_id.clone() voice_enabled=voice_enabled />
                    <Button
                        variant=ButtonVariant::Primary
                        size=ButtonSize::Icon
                        button_type="submit"
                        class="send-btn"
                        aria_label="Send message"
                    >
                        <SendIcon />
                    </Button>
                </div>
            </form>
        </div>
    }
}

/// Microphone control; shows a stop glyph while recording.
#[component]
pub fn MicrophoneButton(
    /// Session the control posts to.
    session_id: String,
    /// A recognition session is active.
    recording: bool,
) -> impl IntoView {
    let class = if recording { "voice-btn recording" } else { "voice-btn" };

    view! {
        <Button
            variant=ButtonVariant::Ghost
            size=ButtonSize::Icon
            class=class
            aria_label="Voice input"
            hx_post=format!("/widget/{session_id}/microphone")
            hx_target="#chatbot-widget"
            hx_include="#chatbot-input"
        >
            <MicrophoneIcon recording=recording />
        </Button>
    }
}

/// Speech output toggle; rendered alone after a toggle.
#[component]
pub fn SpeakerButton(
    /// Session the control posts to.
    session_id: String,
    /// Bot replies are spoken.
    voice_enabled: bool,
) -> impl IntoView {
    let class = if voice_enabled { "tts-btn active" } else { "tts-btn" };

    view! {
        <Button
            variant=ButtonVariant::Ghost
            size=ButtonSize::Icon
            class=class
            aria_label="Text to speech"
            hx_post=format!("/widget/{session_id}/speaker")
            hx_target="this"
        >
            <VolumeIcon />
        </Button>
    }
}
