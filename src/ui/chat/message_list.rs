//! Chat message list component.

use leptos::prelude::*;

use super::message::{ChatMessage, TypingIndicator};
use crate::widget::log::ScrollPosition;
use crate::widget::{EntryView, TypingId};

/// Scrolling container of messages and typing indicators.
///
/// The container carries the scroll position computed after the last
/// insertion; the glue script applies it with measured heights.
#[component]
pub fn ChatMessageList(
    /// Session the controls post to.
    session_id: String,
    /// Entries in display order.
    entries: Vec<EntryView>,
    /// Scroll position after the last insertion.
    scroll: ScrollPosition,
    /// Replace the live `#chatbot-messages` by id instead of swapping into
    /// the request target.
    #[prop(default = false)]
    out_of_band: bool,
) -> impl IntoView {
    let anchor = scroll.anchor.map(|id| format!("msg-{id}"));

    let entries = entries
        .into_iter()
        .map(|entry| match entry {
            EntryView::Message(message) => {
                view! { <ChatMessage session_id=session_id.clone() message=message /> }.into_any()
            }
            EntryView::Typing(id) => view! { <TypingIndicator id=id /> }.into_any(),
        })
        .collect_view();

    view! {
        <div
            id="chatbot-messages"
            class="messages"
            aria-live="polite"
            aria-label="Chat messages"
            data-scroll-mode=scroll.mode.as_str()
            data-scroll-top=scroll.top
            data-scroll-anchor=anchor
            hx-swap-oob=out_of_band.then_some("true")
        >
            {entries}
        </div>
    }
}

/// Self-firing requests that complete parked send cycles.
///
/// The container sits next to `#chatbot-widget`, not inside it, so a
/// whole-widget swap while a reply is outstanding cannot detach the element
/// that issued it. Each trigger swaps nothing itself; the reply delivers the
/// message list out of band, resolved by id when it lands.
#[component]
pub fn ReplyTriggers(
    session_id: String,
    pending: Vec<TypingId>,
    /// Append to the existing container rather than create it.
    #[prop(default = false)]
    out_of_band: bool,
) -> impl IntoView {
    let triggers = pending
        .into_iter()
        .map(|ticket| {
            view! {
                <div
                    id=format!("reply-{ticket}")
                    class="pending-reply"
                    data-ticket=ticket.get()
                    hx-post=format!("/widget/{session_id}/reply/{ticket}")
                    hx-trigger="load"
                    hx-swap="none"
                ></div>
            }
        })
        .collect_view();

    view! {
        <div id="chatbot-replies" hidden=true hx-swap-oob=out_of_band.then_some("beforeend")>
            {triggers}
        </div>
    }
}
