//! Development server entry point.
//!
//! `run` is a convenience for local development only; production deployments
//! should serve [`ViewRegistry::router`] behind whatever infrastructure the
//! operator already runs.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::error::DashmuxError;
use crate::registry::ViewRegistry;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Bind options for [`ViewRegistry::run`]. Explicit fields win over the
/// `HOST`, `PORT` and `DASHMUX_PROXY` environment variables, which in turn
/// win over the built-in defaults.
///
/// The port is carried as a string because it usually arrives from the
/// environment; it is validated when the server starts.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub host: Option<String>,
    pub port: Option<String>,
    /// `<bound-url>::<public-url>` pair: the address the server binds versus
    /// the address users reach it under (e.g. behind a reverse proxy).
    pub proxy: Option<String>,
    pub debug: bool,
}

impl RunOptions {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").ok(),
            port: std::env::var("PORT").ok(),
            proxy: std::env::var("DASHMUX_PROXY").ok(),
            debug: false,
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub(crate) fn bind_addr(&self) -> Result<SocketAddr, DashmuxError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip = parse_host(host)?;
        let port = match self.port.as_deref() {
            Some(raw) => validate_port(raw)?,
            None => DEFAULT_PORT,
        };
        Ok(SocketAddr::new(ip, port))
    }
}

/// Parse and range-check a port string.
pub fn validate_port(raw: &str) -> Result<u16, DashmuxError> {
    let value = raw.trim();
    let port: i64 = value.parse().map_err(|_| DashmuxError::InvalidPort {
        value: value.to_string(),
    })?;
    if !(1..=65535).contains(&port) {
        return Err(DashmuxError::InvalidPort {
            value: value.to_string(),
        });
    }
    Ok(port as u16)
}

fn parse_host(host: &str) -> Result<IpAddr, DashmuxError> {
    if host.eq_ignore_ascii_case("localhost") {
        return Ok(IpAddr::from([127, 0, 0, 1]));
    }
    host.parse().map_err(|_| DashmuxError::InvalidHost {
        host: host.to_string(),
    })
}

/// Split a `<bound-url>::<public-url>` pair and check the bound half against
/// the actual bind address. Returns the public URL to display.
fn resolve_proxy(raw: &str, addr: &SocketAddr) -> Result<String, DashmuxError> {
    let (bound, public) = raw
        .split_once("::")
        .ok_or_else(|| DashmuxError::MalformedProxy {
            value: raw.to_string(),
        })?;
    let expected = format!("http://{addr}");
    if bound.trim_end_matches('/') != expected {
        return Err(DashmuxError::ProxyMismatch {
            bound: bound.to_string(),
            expected,
        });
    }
    Ok(public.to_string())
}

impl ViewRegistry {
    /// Blocking development serve loop: validate the bind options, bind, and
    /// serve the shared router until Ctrl-C.
    pub async fn run(self: &Arc<Self>, opts: RunOptions) -> Result<(), DashmuxError> {
        let addr = opts.bind_addr()?;
        let public_url = opts
            .proxy
            .as_deref()
            .map(|proxy| resolve_proxy(proxy, &addr))
            .transpose()?;

        tracing::warn!("dashmux development server: do not use in a production deployment");
        if opts.debug {
            tracing::debug!(?opts, "debug mode enabled");
        }

        let listener = TcpListener::bind(addr).await?;
        match &public_url {
            Some(url) => tracing::info!(%addr, "serving on {url}"),
            None => tracing::info!("serving on http://{addr}"),
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
