use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application configuration with strongly-typed global sections and a
/// flexible per-section bag for host-defined settings.
///
/// Layered loading: defaults → YAML file → environment variables. Example:
/// `DASHMUX__SERVER__PORT=9000` maps to `server.port`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Section name → arbitrary YAML/JSON value; extract into typed structs
    /// with [`AppConfig::section`].
    #[serde(default)]
    pub sections: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// "trace" | "debug" | "info" | "warn" | "error" | "off"
    pub console_level: String,
    /// Log file path, relative to the home dir passed to `init_logging`.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_file_level")]
    pub file_level: String,
    /// How many rotated files to keep.
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
}

fn default_file_level() -> String {
    "debug".to_string()
}

fn default_max_backups() -> usize {
    3
}

fn default_max_size_mb() -> u64 {
    20
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: "info".to_string(),
            file: None,
            file_level: default_file_level(),
            max_backups: default_max_backups(),
            max_size_mb: default_max_size_mb(),
        }
    }
}

/// Errors from typed section extraction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing config section '{0}'")]
    MissingSection(String),
    #[error("invalid config section '{name}'")]
    InvalidSection {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AppConfig {
    /// Load with layered precedence: defaults → YAML file → `DASHMUX__` env.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::providers::{Env, Format, Serialized, Yaml};
        use figment::Figment;

        Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Yaml::file(config_path.as_ref()))
            .merge(Env::prefixed("DASHMUX__").split("__"))
            .extract()
            .with_context(|| {
                format!(
                    "failed to load configuration from '{}'",
                    config_path.as_ref().display()
                )
            })
    }

    /// Load from a file when one is given, otherwise defaults plus env.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        use figment::providers::{Env, Serialized};
        use figment::Figment;

        match config_path {
            Some(path) => Self::load_layered(path),
            None => Figment::new()
                .merge(Serialized::defaults(AppConfig::default()))
                .merge(Env::prefixed("DASHMUX__").split("__"))
                .extract()
                .context("failed to load configuration from environment"),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config to YAML")
    }

    /// Extract a named section into a typed struct. Typed sections should
    /// carry `deny_unknown_fields` so stray keys fail loudly.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let value = self
            .sections
            .get(name)
            .ok_or_else(|| ConfigError::MissingSection(name.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|source| ConfigError::InvalidSection {
            name: name.to_string(),
            source,
        })
    }

    /// Like [`AppConfig::section`], but absent sections fall back to the
    /// type's defaults.
    pub fn section_or_default<T: DeserializeOwned + Default>(
        &self,
        name: &str,
    ) -> Result<T, ConfigError> {
        match self.sections.get(name) {
            None => Ok(T::default()),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|source| ConfigError::InvalidSection {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }
}
