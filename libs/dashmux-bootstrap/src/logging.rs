use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;

fn parse_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.0.clone())
    }
}

#[derive(Clone)]
struct RotWriterHandle(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().unwrap().flush()
    }
}

fn rotating_writer(cfg: &LoggingConfig, base_dir: &Path, file: &str) -> std::io::Result<RotWriter> {
    let log_path = base_dir.join(file);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = (cfg.max_size_mb as usize) * 1024 * 1024;
    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(cfg.max_backups)),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

/// Initialize tracing for a server process: console sink plus an optional
/// rotating log file resolved relative to `base_dir`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(cfg: &LoggingConfig, base_dir: &Path) {
    let console = parse_level(&cfg.console_level).map(|level| {
        fmt::layer()
            .with_ansi(std::io::stdout().is_terminal())
            .with_filter(LevelFilter::from_level(level))
    });

    let file = cfg.file.as_deref().and_then(|file| {
        let level = parse_level(&cfg.file_level)?;
        match rotating_writer(cfg, base_dir, file) {
            Ok(writer) => Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(LevelFilter::from_level(level)),
            ),
            Err(e) => {
                eprintln!("failed to open log file '{file}': {e}");
                None
            }
        }
    });

    let _ = tracing_subscriber::registry().with(console).with(file).try_init();
}

/// Initialize tracing for CLI use: level from the verbose/quiet flags, ANSI
/// forced by `color` or auto-detected from the terminal and `NO_COLOR`/`TERM`.
pub fn init_cli_logging(verbose: u8, quiet: bool, color: Option<bool>) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    let ansi = color.unwrap_or_else(|| {
        std::io::stdout().is_terminal()
            && std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true)
    });

    let layer = fmt::layer()
        .with_ansi(ansi)
        .without_time()
        .with_target(false)
        .with_filter(LevelFilter::from_level(level));
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn level_strings_parse_like_the_config_docs_say() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level("WARN"), Some(Level::WARN));
        assert_eq!(parse_level("off"), None);
        // Unknown values fall back to info rather than failing startup.
        assert_eq!(parse_level("loud"), Some(Level::INFO));
    }

    #[test]
    fn rotating_writer_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LoggingConfig {
            file: Some("logs/app.log".to_string()),
            ..LoggingConfig::default()
        };
        let writer = rotating_writer(&cfg, dir.path(), "logs/app.log").unwrap();
        let mut handle = writer.make_writer();
        handle.write_all(b"hello\n").unwrap();
        handle.flush().unwrap();
        assert!(dir.path().join("logs").is_dir());
    }

    #[test]
    fn init_twice_does_not_panic() {
        let cfg = LoggingConfig::default();
        let dir = tempfile::tempdir().unwrap();
        init_logging(&cfg, dir.path());
        init_logging(&cfg, dir.path());
    }
}
