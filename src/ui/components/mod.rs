//! Reusable UI components.
//!
//! # Components
//!
//! - [`Button`]: clickable button with variants and HTMX wiring
//! - icons: inline SVG icon components

mod button;
mod icons;

pub use button::{Button, ButtonSize, ButtonVariant};
pub use icons::*;
