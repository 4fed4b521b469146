//! Configuration management
//!
//! Defaults cover a stock Android build. A TOML file and `CALL_LIFECYCLE__*`
//! environment variables can override any field, e.g.
//! `CALL_LIFECYCLE__NOTIFICATION__DEBOUNCE_MS=300`.

use crate::domain::notification::{Importance, NotificationChannel};
use crate::domain::shared::value_objects::Platform;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "CALL_LIFECYCLE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub platform: Platform,
    pub notification: NotificationConfig,
    pub wake_lock: WakeLockConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub channel_id: String,
    pub channel_name: String,
    pub channel_description: String,
    pub notification_id: String,
    /// Coalescing window for toggle-driven refreshes
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeLockConfig {
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Config {
    /// Layer an optional TOML file and the environment over the defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Message(e.to_string()))
    }

    pub fn android() -> Self {
        Self {
            platform: Platform::Android,
            ..Self::default()
        }
    }
}

impl NotificationConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn channel(&self) -> NotificationChannel {
        NotificationChannel {
            id: self.channel_id.clone(),
            name: self.channel_name.clone(),
            description: self.channel_description.clone(),
            importance: Importance::High,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            notification: NotificationConfig::default(),
            wake_lock: WakeLockConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel_id: "active-calls".to_string(),
            channel_name: "Active Calls".to_string(),
            channel_description: "Ongoing voice and video calls".to_string(),
            notification_id: "active-call".to_string(),
            debounce_ms: 200,
        }
    }
}

impl Default for WakeLockConfig {
    fn default() -> Self {
        Self {
            tag: "active-call".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
