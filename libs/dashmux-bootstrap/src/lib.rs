//! Host-application bootstrap: layered configuration loading and tracing
//! initialization for servers built on dashmux.

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigError, LoggingConfig, ServerConfig};
