//! HTTP host for chat widgets.
//!
//! Every page load posts the browser's capabilities to `/widget`, which
//! creates a [`ChatWidget`] bound to a [`BrowserBridge`] and returns it as
//! HTML. Each control then posts to a per-session endpoint; the handler
//! drives the engine and answers with the fragment HTMX swaps in, plus any
//! directives the bridge queued on the way.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::AppState;
use crate::backend::{ChatBackend, HttpBackend};
use crate::bridge::{BrowserBridge, BrowserCapabilities};
use crate::config::WidgetConfig;
use crate::session::{WidgetHandle, WidgetStore};
use crate::ui;
use crate::widget::{
    ChatWidget, HeaderTarget, MessageId, RecognitionErrorKind, RecognitionEvent, TypingId,
};

/// Longest pause between idle sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<WidgetConfig>) -> anyhow::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(&config.backend.base_url)?);
    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        "Chat backend configured"
    );

    let state = AppState {
        widgets: WidgetStore::new(),
        backend,
        config: Arc::clone(&config),
    };
    spawn_idle_sweep(state.widgets.clone(), config.session_timeout());

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/widget", post(create_widget))
        .route("/widget/{session}/send", post(send_message))
        .route("/widget/{session}/reply/{ticket}", post(complete_reply))
        .route("/widget/{session}/feedback", post(submit_feedback))
        .route("/widget/{session}/translate/{message_id}", post(translate_message))
        .route("/widget/{session}/speaker", post(toggle_speaker))
        .route("/widget/{session}/theme", post(toggle_theme))
        .route("/widget/{session}/panel", post(toggle_panel))
        .route("/widget/{session}/microphone", post(click_microphone))
        .route("/widget/{session}/recognition", post(recognition_event))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically drop widgets whose page has gone away.
fn spawn_idle_sweep(widgets: WidgetStore, timeout: Duration) {
    let period = timeout.min(MAX_SWEEP_INTERVAL).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let purged = widgets.purge_idle(timeout);
            if purged > 0 {
                info!(
                    name: "widget.purged",
                    purged,
                    remaining = widgets.len(),
                    "Idle widgets removed"
                );
            }
        }
    });
}

fn lookup(state: &AppState, session: &str) -> Result<Arc<WidgetHandle>, StatusCode> {
    state.widgets.get(session).ok_or_else(|| {
        warn!(name: "widget.unknown_session", session_id = %session, "Unknown widget session");
        StatusCode::NOT_FOUND
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Page & health
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Host page.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(ui::page::html_shell(&state.config.widget.title))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    widgets: usize,
}

/// GET /health - Liveness.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        widgets: state.widgets.len(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Widget lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Capabilities and stored theme reported by the page.
#[derive(Debug, Default, Deserialize)]
struct InitForm {
    #[serde(default)]
    recognition: bool,
    #[serde(default)]
    synthesis: bool,
    /// Raw `darkMode` local-storage value; empty when unset.
    #[serde(default)]
    dark_mode: Option<String>,
}

impl InitForm {
    fn stored_dark_mode(&self) -> Option<bool> {
        match self.dark_mode.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }
}

/// POST /widget - Create a widget for this page.
async fn create_widget(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<InitForm>,
) -> Html<String> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let capabilities = BrowserCapabilities {
        recognition: form.recognition,
        synthesis: form.synthesis,
    };

    let bridge = BrowserBridge::new(capabilities, form.stored_dark_mode());
    let widget = ChatWidget::new(
        state.config.widget_settings(),
        Arc::clone(&state.backend),
        bridge.platform(user_agent),
    );
    let handle = state.widgets.insert(widget, bridge);

    let view = handle.lock().await.view();
    info!(
        name: "widget.created",
        session_id = %view.session_id,
        recognition = capabilities.recognition,
        synthesis = capabilities.synthesis,
        live = state.widgets.len(),
        "Widget created"
    );
    Html(ui::render_mount(view, handle.bridge().drain()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Send flow
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct MessageForm {
    #[serde(default)]
    message: String,
}

/// POST /widget/{session}/send - Begin a send cycle.
async fn send_message(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Form(form): Form<MessageForm>,
) -> Result<Html<String>, StatusCode> {
    let handle = lookup(&state, &session)?;
    let view = {
        let mut widget = handle.lock().await;
        widget.set_input(form.message);
        widget.begin_send();
        widget.view()
    };
    Ok(Html(ui::render_widget(view, handle.bridge().drain())))
}

/// POST /widget/{session}/reply/{ticket} - Complete a send cycle.
///
/// The widget is unlocked while the backend call is outstanding so other
/// controls stay responsive.
async fn complete_reply(
    State(state): State<AppState>,
    Path((session, ticket)): Path<(String, u64)>,
) -> Result<Html<String>, StatusCode> {
    let handle = lookup(&state, &session)?;
    let ticket = TypingId::new(ticket);

    let pending = handle.lock().await.take_pending(ticket);
    if let Some(pending) = pending {
        let reply = pending.dispatch().await;
        handle.lock().await.finish_send(reply).await;
    } else {
        debug!(
            name: "send.reply.stale",
            session_id = %session,
            ticket = %ticket,
            "Reply requested for a cycle that is not parked"
        );
    }

    let view = handle.lock().await.view();
    Ok(Html(ui::render_messages(view, handle.bridge().drain())))
}

// ─────────────────────────────────────────────────────────────────────────────
// Feedback & translation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FeedbackForm {
    response_id: String,
    positive: bool,
}

/// POST /widget/{session}/feedback - Thumbs-up/down.
async fn submit_feedback(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Form(form): Form<FeedbackForm>,
) -> Result<Html<String>, StatusCode> {
    let handle = lookup(&state, &session)?;
    let view = {
        let mut widget = handle.lock().await;
        widget.click_feedback(&form.response_id, form.positive).await;
        widget.view()
    };
    let feedback = view
        .feedback(&form.response_id)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Html(ui::render_feedback(
        view.session_id,
        feedback,
        handle.bridge().drain(),
    )))
}

/// POST /widget/{session}/translate/{message_id} - Translate to English.
async fn translate_message(
    State(state): State<AppState>,
    Path((session, message_id)): Path<(String, u64)>,
) -> Result<Html<String>, StatusCode> {
    let handle = lookup(&state, &session)?;
    let id = MessageId::new(message_id);
    let view = {
        let mut widget = handle.lock().await;
        widget.click_translate(id).await;
        widget.view()
    };
    let message = view.message(id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Html(ui::render_message(
        view.session_id,
        message,
        handle.bridge().drain(),
    )))
}

// ─────────────────────────────────────────────────────────────────────────────
// Controls
// ─────────────────────────────────────────────────────────────────────────────

/// Current input value sent along by controls that re-render the widget.
#[derive(Debug, Default, Deserialize)]
struct ControlForm {
    #[serde(default)]
    message: Option<String>,
}

/// POST /widget/{session}/speaker - Toggle spoken replies.
async fn toggle_speaker(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let handle = lookup(&state, &session)?;
    let voice_enabled = {
        let mut widget = handle.lock().await;
        widget.click_speaker();
        widget.state().voice_enabled
    };
    Ok(Html(ui::render_speaker(
        session,
        voice_enabled,
        handle.bridge().drain(),
    )))
}

/// POST /widget/{session}/theme - Toggle dark mode.
async fn toggle_theme(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Form(form): Form<ControlForm>,
) -> Result<Html<String>, StatusCode> {
    control(&state, &session, form, ChatWidget::click_theme).await
}

/// POST /widget/{session}/panel - Collapse or expand the body.
async fn toggle_panel(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Form(form): Form<ControlForm>,
) -> Result<Html<String>, StatusCode> {
    control(&state, &session, form, |widget| {
        widget.click_header(HeaderTarget::Background);
    })
    .await
}

/// POST /widget/{session}/microphone - Start or stop voice input.
async fn click_microphone(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Form(form): Form<ControlForm>,
) -> Result<Html<String>, StatusCode> {
    control(&state, &session, form, |widget| {
        widget.click_microphone();
    })
    .await
}

async fn control(
    state: &AppState,
    session: &str,
    form: ControlForm,
    action: impl FnOnce(&mut ChatWidget),
) -> Result<Html<String>, StatusCode> {
    let handle = lookup(state, session)?;
    let view = {
        let mut widget = handle.lock().await;
        if let Some(message) = form.message {
            widget.set_input(message);
        }
        action(&mut *widget);
        widget.view()
    };
    Ok(Html(ui::render_widget(view, handle.bridge().drain())))
}

// ─────────────────────────────────────────────────────────────────────────────
// Speech recognition callbacks
// ─────────────────────────────────────────────────────────────────────────────

/// Speech engine callback reported by the glue script.
#[derive(Debug, Deserialize)]
struct RecognitionForm {
    /// `start`, `result`, `error` or `end`.
    event: String,
    #[serde(default)]
    transcript: Option<String>,
    /// Engine error code, e.g. `no-speech`.
    #[serde(default)]
    error: Option<String>,
}

impl RecognitionForm {
    fn into_event(self) -> Option<RecognitionEvent> {
        match self.event.as_str() {
            "start" => Some(RecognitionEvent::Started),
            "result" => Some(RecognitionEvent::Result(
                self.transcript.unwrap_or_default(),
            )),
            "error" => Some(RecognitionEvent::Error(RecognitionErrorKind::from_code(
                self.error.as_deref().unwrap_or_default(),
            ))),
            "end" => Some(RecognitionEvent::Ended),
            _ => None,
        }
    }
}

/// POST /widget/{session}/recognition - Speech engine event.
async fn recognition_event(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Form(form): Form<RecognitionForm>,
) -> Result<Html<String>, StatusCode> {
    let handle = lookup(&state, &session)?;
    let Some(event) = form.into_event() else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let view = {
        let mut widget = handle.lock().await;
        widget.on_recognition(event);
        widget.view()
    };
    Ok(Html(ui::render_widget(view, handle.bridge().drain())))
}
