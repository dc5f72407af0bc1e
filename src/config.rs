//! Layered configuration.
//!
//! Priority, lowest first: built-in defaults, a YAML file (`--config` /
//! `CONFIG_FILE`, else `./config.yaml` when present), `WIDGET_`-prefixed
//! environment variables with `__` between sections (e.g.
//! `WIDGET_SERVER__PORT=8000`), then CLI flags and their env fallbacks.

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::widget::{RecognitionSettings, SpeechSettings, WidgetSettings};

/// Config file picked up from the working directory when none is named.
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Base URL of the chat backend
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub widget: PanelConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Emit logs as JSON lines.
    pub json_logs: bool,
    /// Directory served under `/static`.
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Origin of `/get_response`, `/submit_feedback`, `/translate` and `/text_to_speech`.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    pub title: String,
    /// Empty disables the greeting.
    pub greeting: String,
    pub placeholder: String,
    pub listening_placeholder: String,
    /// Idle widgets are dropped after this many seconds.
    pub session_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpeechConfig {
    /// Locale for recognition and the fallback synthesizer.
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

impl WidgetConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let defaults = WidgetSettings::default();
        let speech = SpeechSettings::default();

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.json_logs", false)?
            .set_default("server.static_dir", "static")?
            .set_default("backend.base_url", "http://127.0.0.1:5000")?
            .set_default("widget.title", defaults.title)?
            .set_default("widget.greeting", defaults.greeting.unwrap_or_default())?
            .set_default("widget.placeholder", defaults.placeholder)?
            .set_default("widget.listening_placeholder", defaults.listening_placeholder)?
            .set_default("widget.session_timeout_secs", 30 * 60)?
            .set_default("speech.lang", speech.lang)?
            .set_default("speech.rate", f64::from(speech.rate))?
            .set_default("speech.pitch", f64::from(speech.pitch))?;

        // 2. Config file
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(Path::new(path)));
        } else if Path::new(DEFAULT_CONFIG_FILE).is_file() {
            builder = builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)));
        }

        // 3. Environment variables, e.g. WIDGET_BACKEND__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix("WIDGET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their env fallbacks) win
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        if config.widget.session_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "widget.session_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Presentation settings for new widgets.
    #[must_use]
    pub fn widget_settings(&self) -> WidgetSettings {
        let greeting = Some(self.widget.greeting.clone()).filter(|g| !g.trim().is_empty());
        WidgetSettings {
            title: self.widget.title.clone(),
            greeting,
            placeholder: self.widget.placeholder.clone(),
            listening_placeholder: self.widget.listening_placeholder.clone(),
            recognition: RecognitionSettings {
                lang: self.speech.lang.clone(),
                ..RecognitionSettings::default()
            },
            speech: SpeechSettings {
                lang: self.speech.lang.clone(),
                rate: self.speech.rate,
                pitch: self.speech.pitch,
            },
            ..WidgetSettings::default()
        }
    }

    /// Idle timeout for hosted widgets.
    #[must_use]
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.widget.session_timeout_secs)
    }
}
