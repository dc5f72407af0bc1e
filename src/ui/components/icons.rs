//! Inline SVG glyphs used by the widget chrome.

use leptos::prelude::*;

const ICON_SIZE: &str = "h-4 w-4";

/// Stroke-style 24x24 frame shared by every glyph.
#[component]
fn Glyph(
    #[prop(into, default = String::new())] extra_class: String,
    #[prop(optional)] icon: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let class = if extra_class.is_empty() {
        ICON_SIZE.to_string()
    } else {
        format!("{ICON_SIZE} {extra_class}")
    };

    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            class=class
            data-icon=icon
            aria-hidden="true"
        >
            {children()}
        </svg>
    }
}

/// Paper plane on the send button.
#[component]
pub fn SendIcon() -> impl IntoView {
    view! {
        <Glyph icon="send">
            <path d="m22 2-7 20-4-9-9-4Z" />
            <path d="M22 2 11 13" />
        </Glyph>
    }
}

/// Bouncing dots shown by the typing indicator.
#[component]
pub fn TypingDots() -> impl IntoView {
    view! {
        <span class="typing-dots" aria-label="Assistant is typing">
            <span class="dot"></span>
            <span class="dot"></span>
            <span class="dot"></span>
        </span>
    }
}

#[component]
pub fn BotIcon() -> impl IntoView {
    view! {
        <Glyph extra_class="title-icon">
            <path d="M12 8V4H8" />
            <rect width="16" height="12" x="4" y="8" rx="2" />
            <path d="M2 14h2M20 14h2M15 13v2M9 13v2" />
        </Glyph>
    }
}

/// Moon (switch to dark) or sun (switch to light).
#[component]
pub fn ThemeIcon(name: &'static str) -> impl IntoView {
    let path = if name == "sun" {
        "M12 3v1m0 16v1m9-9h-1M4 12H3m15.36 6.36-.7-.7M6.34 6.34l-.7-.7m12.72 0-.7.7M6.34 17.66l-.7.7M16 12a4 4 0 1 1-8 0 4 4 0 0 1 8 0z"
    } else {
        "M12 3a6 6 0 0 0 9 9 9 9 0 1 1-9-9Z"
    };

    view! {
        <Glyph icon=name>
            <path d=path />
        </Glyph>
    }
}

/// Chevron pointing `"up"` or `"down"`.
#[component]
pub fn ChevronIcon(direction: &'static str) -> impl IntoView {
    let points = if direction == "down" { "6 9 12 15 18 9" } else { "18 15 12 9 6 15" };
    let extra = format!("toggle-icon chevron-{direction}");

    view! {
        <Glyph extra_class=extra>
            <polyline points=points />
        </Glyph>
    }
}

/// Microphone, or a stop square while recording.
#[component]
pub fn MicrophoneIcon(#[prop(default = false)] recording: bool) -> impl IntoView {
    if recording {
        view! {
            <Glyph icon="stop">
                <rect x="6" y="6" width="12" height="12" rx="1" />
            </Glyph>
        }
        .into_any()
    } else {
        view! {
            <Glyph icon="microphone">
                <path d="M12 2a3 3 0 0 0-3 3v7a3 3 0 0 0 6 0V5a3 3 0 0 0-3-3Z" />
                <path d="M19 10v2a7 7 0 0 1-14 0v-2" />
                <path d="M12 19v3" />
            </Glyph>
        }
        .into_any()
    }
}

#[component]
pub fn VolumeIcon() -> impl IntoView {
    view! {
        <Glyph icon="volume">
            <path d="M11 5 6 9H2v6h4l5 4Z" />
            <path d="M15.54 8.46a5 5 0 0 1 0 7.07" />
            <path d="M19.07 4.93a10 10 0 0 1 0 14.14" />
        </Glyph>
    }
}

/// Thumbs-up when `positive`, thumbs-down otherwise.
#[component]
pub fn ThumbIcon(positive: bool) -> impl IntoView {
    let path = if positive {
        "M7 10v12M15 5.88 14 10h5.83a2 2 0 0 1 1.92 2.56l-2.33 8A2 2 0 0 1 17.5 22H4a2 2 0 0 1-2-2v-8a2 2 0 0 1 2-2h2.76a2 2 0 0 0 1.79-1.11L12 2a3.13 3.13 0 0 1 3 3.88Z"
    } else {
        "M17 14V2M9 18.12 10 14H4.17a2 2 0 0 1-1.92-2.56l2.33-8A2 2 0 0 1 6.5 2H20a2 2 0 0 1 2 2v8a2 2 0 0 1-2 2h-2.76a2 2 0 0 0-1.79 1.11L12 22a3.13 3.13 0 0 1-3 3.88Z"
    };
    let icon = if positive { "thumb-up" } else { "thumb-down" };

    view! {
        <Glyph icon=icon>
            <path d=path />
        </Glyph>
    }
}
