use std::{collections::HashMap, fs, path::Path, time::Duration};

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "contextsync.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub refresh_after_sync: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            request_timeout: Duration::from_secs(30),
            refresh_after_sync: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid context engine address '{address}': {source}")]
    InvalidAddress {
        address: String,
        source: url::ParseError,
    },
}

impl EngineSettings {
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let address = format!("http://{}:{}/", self.host.trim(), self.port);
        Url::parse(&address).map_err(|source| SettingsError::InvalidAddress { address, source })
    }
}

/// Loads settings from `path` (or `contextsync.toml` in the working directory) and the
/// process environment.
pub fn load_settings(path: Option<&Path>) -> EngineSettings {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) => {
            debug!(path = %path.display(), "no settings file loaded: {err}");
            None
        }
    };
    load_settings_from(raw.as_deref(), |name| std::env::var(name).ok())
}

/// Layers defaults, an optional flat TOML table, and environment lookups, in that order.
pub fn load_settings_from(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> EngineSettings {
    let mut settings = EngineSettings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                for (key, value) in file_cfg {
                    let value = match value {
                        toml::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    apply(&mut settings, &key, &value, "settings file");
                }
            }
            Err(err) => warn!("ignoring unparseable settings file: {err}"),
        }
    }

    for (key, names) in [
        ("host", ["CONTEXTSYNC_HOST", "APP__HOST"]),
        ("port", ["CONTEXTSYNC_PORT", "APP__PORT"]),
        (
            "request_timeout_secs",
            ["CONTEXTSYNC_TIMEOUT_SECS", "APP__REQUEST_TIMEOUT_SECS"],
        ),
        (
            "refresh_after_sync",
            ["CONTEXTSYNC_REFRESH_AFTER_SYNC", "APP__REFRESH_AFTER_SYNC"],
        ),
    ] {
        for name in names {
            if let Some(value) = env(name) {
                apply(&mut settings, key, &value, name);
            }
        }
    }

    settings
}

fn apply(settings: &mut EngineSettings, key: &str, value: &str, origin: &str) {
    let value = value.trim();
    match key {
        "host" if !value.is_empty() => settings.host = value.to_string(),
        "host" => warn!(origin, "ignoring empty host"),
        "port" => match value.parse::<u16>() {
            Ok(port) if port > 0 => settings.port = port,
            _ => warn!(origin, value, "ignoring invalid port"),
        },
        "request_timeout_secs" => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => settings.request_timeout = Duration::from_secs(secs),
            _ => warn!(origin, value, "ignoring invalid request timeout"),
        },
        "refresh_after_sync" => match value.parse::<bool>() {
            Ok(flag) => settings.refresh_after_sync = flag,
            Err(_) => warn!(origin, value, "ignoring invalid refresh_after_sync flag"),
        },
        _ => debug!(origin, key, "ignoring unknown setting"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
