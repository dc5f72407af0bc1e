//! Embeddable chat widget: headless engine plus an Axum + Leptos + HTMX host.
//!
//! A floating chat panel that renders conversational turns, captures voice
//! input, speaks replies aloud and posts user messages to a chat backend.
//!
//! # Architecture
//!
//! - **Engine**: [`widget::ChatWidget`] holds all widget state and behavior;
//!   browser capabilities sit behind small traits so it runs headless
//! - **Backend**: [`backend::ChatBackend`] with a reqwest implementation
//! - **Host**: Axum server rendering Leptos SSR fragments that HTMX swaps in;
//!   browser effects travel as directives through [`bridge::BrowserBridge`]
//!
//! # Modules
//!
//! - [`backend`]: backend trait, wire types and HTTP client
//! - [`bridge`]: browser bridge and directives
//! - [`config`]: layered configuration
//! - [`format`]: message formatting
//! - [`server`]: HTTP routes
//! - [`session`]: session identifiers and live widget storage
//! - [`ui`]: SSR components
//! - [`widget`]: the widget engine

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod backend;
pub mod bridge;
pub mod config;
pub mod error;
pub mod format;
pub mod server;
pub mod session;
pub mod ui;
pub mod widget;

use std::sync::Arc;

use crate::backend::ChatBackend;
use crate::config::WidgetConfig;
use crate::session::WidgetStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live widgets keyed by session id.
    pub widgets: WidgetStore,
    /// Chat backend shared by every widget.
    pub backend: Arc<dyn ChatBackend>,
    /// Global configuration.
    pub config: Arc<WidgetConfig>,
}
