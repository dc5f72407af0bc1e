//! UI components and fragment rendering.
//!
//! This module renders [`WidgetView`] snapshots to HTML with Leptos SSR.
//! The host answers every HTMX request with one of the fragments below;
//! directives queued by the browser bridge ride along, out of band when the
//! fragment is smaller than the whole widget.
//!
//! # Structure
//!
//! - [`page`]: host page embedding the widget container
//! - [`components`]: reusable buttons and icons
//! - [`chat`]: widget layout components

pub mod chat;
pub mod components;
pub mod page;

use leptos::prelude::*;

use crate::bridge::Directive;
use crate::widget::{FeedbackView, MessageView, WidgetView};

use chat::{
    ChatMessage, ChatMessageList, ChatShell, DirectiveQueue, FeedbackRegion, ReplyTriggers, SpeakerButton,
};

/// Render a view under a fresh reactive owner.
fn render<V, F>(build: F) -> String
where
    V: IntoView + 'static,
    F: FnOnce() -> V,
{
    Owner::new().with(|| build().to_html())
}

/// First render of a widget into `#chatbot-container`, followed by the
/// reply-trigger container.
#[must_use]
pub fn render_mount(view: WidgetView, directives: Vec<Directive>) -> String {
    let session_id = view.session_id.clone();
    let pending = view.pending.clone();
    render(move || {
        view! {
            <ChatShell view=view directives=directives />
            <ReplyTriggers session_id=session_id pending=pending />
        }
    })
}

/// The whole widget (`#chatbot-widget`); triggers for parked sends are
/// appended to `#chatbot-replies` out of band.
#[must_use]
pub fn render_widget(view: WidgetView, directives: Vec<Directive>) -> String {
    let session_id = view.session_id.clone();
    let pending = view.pending.clone();
    render(move || {
        view! {
            <ChatShell view=view directives=directives />
            <ReplyTriggers session_id=session_id pending=pending out_of_band=true />
        }
    })
}

/// The message list (`#chatbot-messages`), swapped out of band so it lands
/// on whichever list is live when the reply arrives.
#[must_use]
pub fn render_messages(view: WidgetView, directives: Vec<Directive>) -> String {
    let WidgetView {
        session_id,
        entries,
        scroll,
        ..
    } = view;
    render(move || {
        view! {
            <ChatMessageList session_id=session_id entries=entries scroll=scroll out_of_band=true />
            <DirectiveQueue directives=directives out_of_band=true />
        }
    })
}

/// One message element (`#msg-{id}`).
#[must_use]
pub fn render_message(session_id: String, message: MessageView, directives: Vec<Directive>) -> String {
    render(move || {
        view! {
            <ChatMessage session_id=session_id message=message />
            <DirectiveQueue directives=directives out_of_band=true />
        }
    })
}

/// One feedback region.
#[must_use]
pub fn render_feedback(session_id: String, feedback: FeedbackView, directives: Vec<Directive>) -> String {
    render(move || {
        view! {
            <FeedbackRegion session_id=session_id feedback=feedback />
            <DirectiveQueue directives=directives out_of_band=true />
        }
    })
}

/// The speaker control.
#[must_use]
pub fn render_speaker(session_id: String, voice_enabled: bool, directives: Vec<Directive>) -> String {
    render(move || {
        view! {
            <SpeakerButton session_id=session_id voice_enabled=voice_enabled />
            <DirectiveQueue directives=directives out_of_band=true />
        }
    })
}
