//! Chat shell layout component.

use leptos::prelude::*;

use super::{ChatHeader, ChatInputArea, ChatMessageList, DirectiveQueue};
use crate::bridge::Directive;
use crate::widget::WidgetView;

/// The complete widget: header, collapsible body and directive queue.
///
/// Reply triggers for parked send cycles are rendered separately, see
/// [`ReplyTriggers`](super::ReplyTriggers).
///
/// # Example
///
/// ```rust,ignore
/// view! { <ChatShell view=widget.view() directives=bridge.drain() /> }
/// ```
#[component]
pub fn ChatShell(
    /// Widget snapshot.
    view: WidgetView,
    /// Directives queued by the last interaction.
    #[prop(default = Vec::new())]
    directives: Vec<Directive>,
) -> impl IntoView {
    let WidgetView {
        session_id,
        title,
        dark_mode,
        panel_collapsed,
        voice_enabled,
        recording,
        microphone_available,
        placeholder,
        input,
        entries,
        scroll,
        ..
    } = view;

    let class = if dark_mode { "chatbot-wrapper dark-mode" } else { "chatbot-wrapper" };
    let body_class = if panel_collapsed { "body hidden" } else { "body" };

    view! {
        <div
            id="chatbot-widget"
            class=class
            data-session-id=session_id.clone()
            data-dark-mode=dark_mode.to_string()
        >
            <ChatHeader
                session_id=session_id.clone()
                title=title
                dark_mode=dark_mode
                panel_collapsed=panel_collapsed
            />

            <div class=body_class>
                <ChatMessageList
                    session_id=session_id.clone()
                    entries=entries
                    scroll=scroll
                />
                <ChatInputArea
                    session_id=session_id.clone()
                    placeholder=placeholder
                    input=input
                    microphone_available=microphone_available
                    recording=recording
                    voice_enabled=voice_enabled
                />
            </div>

            <DirectiveQueue directives=directives />
        </div>
    }
}
