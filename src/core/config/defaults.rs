use std::time::Duration;

use crate::core::config::data::Config;
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_POLL_INTERVAL_MS};

/// Values given on the command line. They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

/// Effective settings after layering CLI flags, the config file, the
/// environment and built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub poll_interval: Duration,
}

impl Config {
    pub fn resolve(&self, overrides: &SettingsOverrides) -> ResolvedSettings {
        self.resolve_with_env(overrides, |name| std::env::var(name).ok())
    }

    pub fn resolve_with_env<F>(&self, overrides: &SettingsOverrides, env: F) -> ResolvedSettings
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let base_url = non_empty(overrides.base_url.clone())
            .or_else(|| non_empty(self.base_url.clone()))
            .or_else(|| non_empty(env("OPENAI_BASE_URL")))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = non_empty(overrides.model.clone())
            .or_else(|| non_empty(self.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let poll_ms = overrides
            .poll_interval_ms
            .or(self.poll_interval_ms)
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        ResolvedSettings {
            base_url,
            model,
            api_key: non_empty(env("OPENAI_API_KEY")),
            poll_interval: Duration::from_millis(poll_ms),
        }
    }
}
