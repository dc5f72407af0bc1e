use chat_widget::config::WidgetConfig;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;

const BIN: &str = "chat-widget";

// Clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("WIDGET_SERVER__PORT");
        env::remove_var("WIDGET_BACKEND__BASE_URL");
        env::remove_var("WIDGET_WIDGET__GREETING");
        env::remove_var("WIDGET_WIDGET__SESSION_TIMEOUT_SECS");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("HOST");
        env::remove_var("BACKEND_URL");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = WidgetConfig::load_from_args([BIN]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.widget.session_timeout_secs, 1800);
    assert_eq!(config.speech.lang, "en-US");

    let settings = config.widget_settings();
    assert!(settings.greeting.is_some());
    assert_eq!(settings.placeholder, "Type your message...");
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("WIDGET_SERVER__PORT", "9090");
        env::set_var("WIDGET_BACKEND__BASE_URL", "https://chat.example.edu");
    }

    let config = WidgetConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.backend.base_url, "https://chat.example.edu");

    clear_env_vars();
}

#[test]
#[serial]
fn test_empty_greeting_disables_it() {
    clear_env_vars();
    unsafe {
        env::set_var("WIDGET_WIDGET__GREETING", "");
    }

    let config = WidgetConfig::load_from_args([BIN]).expect("Failed to load config");
    assert!(config.widget_settings().greeting.is_none());

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flags_win_over_env() {
    clear_env_vars();
    unsafe {
        env::set_var("WIDGET_SERVER__PORT", "9090");
    }

    let config = WidgetConfig::load_from_args([
        BIN,
        "--port",
        "4242",
        "--backend-url",
        "http://backend:8000",
    ])
    .expect("Failed to load config");
    assert_eq!(config.server.port, 4242);
    assert_eq!(config.backend.base_url, "http://backend:8000");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    writeln!(
        file,
        "server:\n  port: 7070\nwidget:\n  title: Help Desk\n  session_timeout_secs: 60\nspeech:\n  rate: 1.25"
    )
    .expect("Failed to write temp config");

    unsafe {
        env::set_var("CONFIG_FILE", file.path());
    }

    let config = WidgetConfig::load_from_args([BIN]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.widget.title, "Help Desk");
    assert_eq!(config.session_timeout().as_secs(), 60);
    assert!((config.widget_settings().speech.rate - 1.25).abs() < f32::EPSILON);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let cwd_path = "config.yaml";
    fs::write(cwd_path, "server:\n  port: 6060\n").expect("Failed to write ./config.yaml");

    let result = WidgetConfig::load_from_args([BIN]);
    fs::remove_file(cwd_path).unwrap();

    assert_eq!(result.expect("Failed to load config").server.port, 6060);
}

#[test]
#[serial]
fn test_missing_config_file_is_error() {
    clear_env_vars();

    let result = WidgetConfig::load_from_args([BIN, "--config", "does-not-exist.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_zero_session_timeout_is_rejected() {
    clear_env_vars();
    unsafe {
        env::set_var("WIDGET_WIDGET__SESSION_TIMEOUT_SECS", "0");
    }

    let err = WidgetConfig::load_from_args([BIN]).unwrap_err();
    assert!(err.to_string().contains("session_timeout_secs"));

    clear_env_vars();
}
