use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::utils::url::validate_base_url;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the OpenAI-compatible chat service
    pub base_url: Option<String>,
    /// Model name sent with every chat request
    pub model: Option<String>,
    /// Milliseconds between readiness probes
    pub poll_interval_ms: Option<u64>,
}

/// Keys accepted by `nexus set` and `nexus unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    Model,
    PollIntervalMs,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [
        ConfigKey::BaseUrl,
        ConfigKey::Model,
        ConfigKey::PollIntervalMs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::Model => "model",
            ConfigKey::PollIntervalMs => "poll-interval-ms",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<_> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
                format!(
                    "Unknown config key '{value}'. Available keys: {}",
                    known.join(", ")
                )
            })
    }
}

impl Config {
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {key}"));
        }

        match key {
            ConfigKey::BaseUrl => {
                validate_base_url(value)?;
                self.base_url = Some(value.to_string());
            }
            ConfigKey::Model => self.model = Some(value.to_string()),
            ConfigKey::PollIntervalMs => {
                let millis = value
                    .parse::<u64>()
                    .map_err(|_| format!("{key} must be a whole number of milliseconds"))?;
                if millis == 0 {
                    return Err(format!("{key} must be greater than zero"));
                }
                self.poll_interval_ms = Some(millis);
            }
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::Model => self.model = None,
            ConfigKey::PollIntervalMs => self.poll_interval_ms = None,
        }
    }

    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::BaseUrl => self.base_url.clone(),
            ConfigKey::Model => self.model.clone(),
            ConfigKey::PollIntervalMs => self.poll_interval_ms.map(|ms| ms.to_string()),
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
