//! Logging setup shared by the gateway and the voting service.
//!
//! Both binaries read the same `[logging]` section. The gateway writes the
//! configured file as-is; every other service gets its own sibling file so
//! the two processes never interleave lines in one log.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Process that is emitting logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// HTTP gateway (`anonce`).
    Gateway,
    /// Voting microservice (`voting`).
    Voting,
}

impl Service {
    /// Short name used in log file names and startup lines.
    pub fn name(self) -> &'static str {
        match self {
            Service::Gateway => "gateway",
            Service::Voting => "voting",
        }
    }

    /// Log file for this service, derived from the configured file.
    ///
    /// `logs/anonce.log` stays as-is for the gateway and becomes
    /// `logs/anonce-voting.log` for the voting service.
    pub fn log_path(self, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if self == Service::Gateway {
            return path.to_path_buf();
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "anonce".to_string());
        let name = match path.extension() {
            Some(ext) => format!("{stem}-{}.{}", self.name(), ext.to_string_lossy()),
            None => format!("{stem}-{}", self.name()),
        };
        path.with_file_name(name)
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(parse_level(level).into())
}

/// Install the global subscriber for `service`: stdout plus its log file.
///
/// The file is opened in append mode so restarts keep earlier lines.
pub fn init(config: &LoggingConfig, service: Service) -> Result<()> {
    let path = service.log_path(&config.file);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let log_file = Arc::new(OpenOptions::new().create(true).append(true).open(&path)?);
    let writer = std::io::stdout.and(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter(&config.level))
        .init();

    tracing::debug!(service = service.name(), file = %path.display(), "Logging to file");
    Ok(())
}

/// Console-only fallback when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true),
        )
        .with(filter(level))
        .init();
}

/// Install logging for `service`, falling back to the console on failure.
pub fn init_or_console(config: &LoggingConfig, service: Service) {
    if let Err(e) = init(config, service) {
        eprintln!("Failed to open {} log file: {e}", service.name());
        init_console_only(&config.level);
    }
}
