//! Button component with variants and sizes.

use leptos::prelude::*;

/// Visual weight of a widget control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Filled accent, used for send.
    Primary,
    /// Transparent chrome such as header and voice controls.
    #[default]
    Ghost,
    /// Inline text action under a message.
    Link,
}

/// Button size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonSize {
    /// Compact text button.
    Sm,
    /// Square, icon-only.
    #[default]
    Icon,
}

impl ButtonVariant {
    /// CSS class for this variant.
    fn class(self) -> &'static str {
        match self {
            Self::Primary => "btn-primary",
            Self::Ghost => "btn-ghost",
            Self::Link => "btn-link",
        }
    }
}

impl ButtonSize {
    /// CSS class for this size.
    fn class(self) -> &'static str {
        match self {
            Self::Sm => "btn-sm",
            Self::Icon => "btn-icon",
        }
    }
}

/// Button that can post to the widget host through HTMX.
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <Button
///         variant=ButtonVariant::Ghost
///         size=ButtonSize::Icon
///         hx_post=format!("/widget/{session_id}/speaker")
///         hx_target="this"
///         aria_label="Text to speech"
///     >
///         <VolumeIcon />
///     </Button>
/// }
/// ```
#[component]
pub fn Button(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    /// `submit` inside the composer form, `button` elsewhere.
    #[prop(default = "button")]
    button_type: &'static str,
    #[prop(default = String::new(), into)]
    class: String,
    /// Required for icon-only controls.
    #[prop(optional)]
    aria_label: Option<&'static str>,
    /// `hx-post` endpoint.
    #[prop(optional, into)]
    hx_post: Option<String>,
    #[prop(optional)]
    hx_target: Option<&'static str>,
    /// Only emitted alongside `hx_post`.
    #[prop(default = "outerHTML")]
    hx_swap: &'static str,
    #[prop(optional)]
    hx_include: Option<&'static str>,
    /// Extra form values as a JSON object.
    #[prop(optional, into)]
    hx_vals: Option<String>,
    #[prop(optional)]
    hx_sync: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let classes = format!("btn {} {} {class}", variant.class(), size.class());
    let hx_swap = hx_post.as_ref().map(|_| hx_swap);

    view! {
        <button
            type=button_type
            class=classes
            aria-label=aria_label
            hx-post=hx_post
            hx-target=hx_target
            hx-swap=hx_swap
            hx-include=hx_include
            hx-vals=hx_vals
            hx-sync=hx_sync
        >
            {children()}
        </button>
    }
}
