//! Message bubble, feedback region and translate affordance.

use leptos::prelude::*;

use crate::ui::components::{Button, ButtonSize, ButtonVariant, ThumbIcon, TypingDots};
use crate::widget::{FeedbackView, MessageView, TranslationView, TypingId};

/// Notice that replaces the feedback buttons after a submission.
pub const FEEDBACK_THANKS: &str = "Thank you for your feedback!";

/// Label of the translate affordance.
pub const TRANSLATE_LABEL: &str = "Translate to English";

/// One rendered message.
#[component]
pub fn ChatMessage(
    /// Session the controls post to.
    session_id: String,
    /// Message snapshot.
    message: MessageView,
) -> impl IntoView {
    let MessageView {
        id,
        author,
        body_html,
        feedback,
        translation,
    } = message;

    let feedback = feedback.map(|feedback| {
        view! { <FeedbackRegion session_id=session_id.clone() feedback=feedback /> }
    });
    let translation = translation.map(|translation| match translation {
        TranslationView::Offered => view! {
            <Button
                variant=ButtonVariant::Link
                size=ButtonSize::Sm
                class="translate-btn"
                hx_post=format!("/widget/{session_id}/translate/{id}")
                hx_target="closest .message"
                hx_sync="this:drop"
            >
                {TRANSLATE_LABEL}
            </Button>
        }
        .into_any(),
        TranslationView::Translated(text) => view! {
            <div class="translated-text">{text}</div>
        }
        .into_any(),
    });

    view! {
        <div id=format!("msg-{id}") class=format!("message {}", author.as_str()) data-message-id=id.get()>
            <div class="message-content">
                <div class="message-body" inner_html=body_html></div>
                {feedback}
            </div>
            {translation}
        </div>
    }
}

/// Thumbs-up/down controls bound to one response identifier.
#[component]
pub fn FeedbackRegion(
    /// Session the controls post to.
    session_id: String,
    /// Region snapshot.
    feedback: FeedbackView,
) -> impl IntoView {
    let FeedbackView {
        response_id,
        submitted,
    } = feedback;

    if submitted {
        return view! {
            <div class="feedback-buttons feedback-submitted" data-response-id=response_id>
                <p class="feedback-thank-you">{FEEDBACK_THANKS}</p>
            </div>
        }
        .into_any();
    }

    let endpoint = format!("/widget/{session_id}/feedback");
    let vals = |positive: bool| {
        serde_json::json!({ "response_id": response_id, "positive": positive }).to_string()
    };

    view! {
        <div class="feedback-buttons" data-response-id=response_id.clone()>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                class="feedback-btn positive"
                aria_label="Helpful"
                hx_post=endpoint.clone()
                hx_target="closest .feedback-buttons"
                hx_vals=vals(true)
                hx_sync="closest .feedback-buttons:drop"
            >
                <ThumbIcon positive=true />
            </Button>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                class="feedback-btn negative"
                aria_label="Not helpful"
                hx_post=endpoint
                hx_target="closest .feedback-buttons"
                hx_vals=vals(false)
                hx_sync="closest .feedback-buttons:drop"
            >
                <ThumbIcon positive=false />
            </Button>
        </div>
    }
    .into_any()
}

/// Typing indicator bubble.
#[component]
pub fn TypingIndicator(
    /// Indicator id.
    id: TypingId,
) -> impl IntoView {
    view! {
        <div id=format!("typing-{id}") class="message bot typing-indicator">
            <div class="message-content">
                <TypingDots />
            </div>
        </div>
    }
}
