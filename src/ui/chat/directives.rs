//! Browser directive rendering.

use leptos::prelude::*;
use serde_json::{Value, json};

use crate::bridge::Directive;

/// JSON payload handed to the glue script for one directive.
#[must_use]
pub fn payload(directive: &Directive) -> Value {
    match directive {
        Directive::PlayAudio { src } => json!({ "src": src }),
        Directive::Speak(utterance) => json!({
            "text": utterance.text,
            "lang": utterance.lang,
            "rate": utterance.rate,
            "pitch": utterance.pitch,
        }),
        Directive::StartRecognition(settings) => json!({
            "lang": settings.lang,
            "continuous": settings.continuous,
            "interimResults": settings.interim_results,
        }),
        Directive::StorePreference { key, value } => json!({ "key": key, "value": value }),
        Directive::CancelSpeech | Directive::StopRecognition => json!({}),
    }
}

/// Container of pending directives.
///
/// `out_of_band` marks the container for an HTMX out-of-band swap so a
/// partial fragment can still deliver directives.
#[component]
pub fn DirectiveQueue(
    /// Directives to execute once.
    directives: Vec<Directive>,
    /// Swap the container out of band.
    #[prop(default = false)]
    out_of_band: bool,
) -> impl IntoView {
    let items = directives
        .iter()
        .map(|directive| {
            view! {
                <template
                    class="widget-directive"
                    data-directive=directive.kind()
                    data-payload=payload(directive).to_string()
                ></template>
            }
        })
        .collect_view();

    view! {
        <div id="chatbot-directives" hidden=true hx-swap-oob=out_of_band.then_some("true")>
            {items}
        </div>
    }
}
