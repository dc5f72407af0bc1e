//! Chat widget host.
//!
//! Entry point serving the embeddable chat widget.

use std::sync::Arc;

use chat_widget::config::WidgetConfig;
use chat_widget::server;
use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before configuration reads the environment
    let _ = dotenv();

    let config = match WidgetConfig::load() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing (M-LOG-STRUCTURED)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if config.server.json_logs {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }

    info!(
        name: "config.loaded",
        host = %config.server.host,
        port = config.server.port,
        backend = %config.backend.base_url,
        "Configuration loaded"
    );

    server::start_server(config).await
}
