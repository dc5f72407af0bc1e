//! Chat header component.

use leptos::prelude::*;

use crate::ui::components::{BotIcon, Button, ButtonSize, ButtonVariant, ChevronIcon, ThemeIcon};
use crate::widget::theme;

/// Header with title, theme toggle and collapse chevron.
///
/// Clicking anywhere on the header except a button toggles the panel body.
#[component]
pub fn ChatHeader(
    /// Session the controls post to.
    session_id: String,
    /// Title displayed in the header.
    title: String,
    /// Dark theme active.
    dark_mode: bool,
    /// Panel body hidden.
    panel_collapsed: bool,
) -> impl IntoView {
    view! {
        <header
            class="chatbot-header"
            hx-post=format!("/widget/{session_id}/panel")
            hx-trigger="click[!event.target.closest('button')]"
            hx-target="#chatbot-widget"
            hx-swap="outerHTML"
            hx-include="#chatbot-input"
        >
            <div class="chatbot-title">
                <BotIcon />
                <span>{title}</span>
            </div>

            <div class="chatbot-header-actions">
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    class="theme-btn"
                    aria_label="Toggle dark mode"
                    hx_post=format!("/widget/{session_id}/theme")
                    hx_target="#chatbot-widget"
                    hx_include="#chatbot-input"
                >
                    <ThemeIcon name=theme::theme_icon(dark_mode) />
                </Button>
                <ChevronIcon direction=theme::chevron(panel_collapsed) />
            </div>
        </header>
    }
}
