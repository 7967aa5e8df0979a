use thiserror::Error;

/// Structured errors surfaced by the registry and the development server.
#[derive(Debug, Error)]
pub enum DashmuxError {
    #[error("invalid port '{value}': expected an integer between 1 and 65535")]
    InvalidPort { value: String },

    #[error("invalid host '{host}': expected an IP address or 'localhost'")]
    InvalidHost { host: String },

    #[error("invalid proxy '{value}': expected format '<bound-url>::<public-url>'")]
    MalformedProxy { value: String },

    #[error("proxy bound URL '{bound}' does not match the server address '{expected}'")]
    ProxyMismatch { bound: String, expected: String },

    #[error("server I/O error")]
    Io(#[from] std::io::Error),
}
