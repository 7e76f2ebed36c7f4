use super::data::{Config, ConfigKey};
use super::defaults::SettingsOverrides;
use super::io::ConfigError;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .set(ConfigKey::BaseUrl, "http://localhost:11434/v1")
        .expect("set base url");
    config.set(ConfigKey::Model, "llama3").expect("set model");
    config
        .set(ConfigKey::PollIntervalMs, "500")
        .expect("set poll interval");
    config.save_to_path(&config_path).expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    let mut loaded = loaded;
    loaded.unset(ConfigKey::Model);
    loaded.save_to_path(&config_path).expect("Failed to save config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.model, None);
    assert_eq!(reloaded.poll_interval_ms, Some(500));
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "poll_interval_ms = \"soon\"").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    let config_err = err
        .downcast_ref::<ConfigError>()
        .expect("expected ConfigError");
    assert!(matches!(config_err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn config_keys_parse_with_either_separator() {
    assert_eq!("base-url".parse::<ConfigKey>(), Ok(ConfigKey::BaseUrl));
    assert_eq!("poll_interval_ms".parse::<ConfigKey>(), Ok(ConfigKey::PollIntervalMs));
    assert_eq!(" MODEL ".parse::<ConfigKey>(), Ok(ConfigKey::Model));

    let err = "theme".parse::<ConfigKey>().unwrap_err();
    assert!(err.contains("base-url, model, poll-interval-ms"));
}

#[test]
fn poll_interval_must_be_positive_integer() {
    let mut config = Config::default();
    assert!(config.set(ConfigKey::PollIntervalMs, "0").is_err());
    assert!(config.set(ConfigKey::PollIntervalMs, "fast").is_err());
    assert!(config.set(ConfigKey::Model, "   ").is_err());
    assert_eq!(config, Config::default());
}

#[test]
fn resolve_uses_defaults_when_nothing_is_set() {
    let settings = Config::default().resolve_with_env(&SettingsOverrides::default(), env_from(&[]));

    assert_eq!(settings.base_url, "https://api.openai.com/v1");
    assert_eq!(settings.model, "gpt-4o-mini");
    assert_eq!(settings.api_key, None);
    assert_eq!(settings.poll_interval, Duration::from_millis(300));
}

#[test]
fn resolve_layers_cli_over_file_over_env() {
    let config = Config {
        base_url: Some("http://from-file/v1".to_string()),
        model: Some("file-model".to_string()),
        poll_interval_ms: Some(750),
    };
    let env = env_from(&[
        ("OPENAI_BASE_URL", "http://from-env/v1"),
        ("OPENAI_API_KEY", "sk-test"),
    ]);

    let from_file = config.resolve_with_env(&SettingsOverrides::default(), &env);
    assert_eq!(from_file.base_url, "http://from-file/v1");
    assert_eq!(from_file.model, "file-model");
    assert_eq!(from_file.poll_interval, Duration::from_millis(750));
    assert_eq!(from_file.api_key.as_deref(), Some("sk-test"));

    let overrides = SettingsOverrides {
        base_url: Some("http://from-cli/v1".to_string()),
        model: Some("cli-model".to_string()),
        poll_interval_ms: Some(100),
    };
    let from_cli = config.resolve_with_env(&overrides, &env);
    assert_eq!(from_cli.base_url, "http://from-cli/v1");
    assert_eq!(from_cli.model, "cli-model");
    assert_eq!(from_cli.poll_interval, Duration::from_millis(100));

    let env_only = Config::default().resolve_with_env(&SettingsOverrides::default(), &env);
    assert_eq!(env_only.base_url, "http://from-env/v1");
}

#[test]
fn describe_lists_every_key() {
    let config = Config {
        model: Some("llama3".to_string()),
        ..Default::default()
    };
    assert_eq!(
        config.describe(),
        vec![
            "  base-url: (unset)".to_string(),
            "  model: llama3".to_string(),
            "  poll-interval-ms: (unset)".to_string(),
        ]
    );
}

#[test]
fn test_set_rejects_base_url_without_scheme() {
    let mut config = Config::default();
    let err = config
        .set(ConfigKey::BaseUrl, "localhost:11434/v1")
        .unwrap_err();
    assert!(err.contains("http://"));
    assert!(config.base_url.is_none());
}
