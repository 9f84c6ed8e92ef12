//! Tracing subscriber setup.
//!
//! The interactive dashboard owns the terminal, so it logs to a file that is
//! truncated on every run. The one-shot CLI commands log to stderr.
//!
//! Filter priority: `INCIDENTS_DASH_LOG`, then `RUST_LOG`, then the level
//! picked from `--verbose`.

use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "INCIDENTS_DASH_LOG";

/// Where log records go
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
}

fn default_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = default_level(verbose);
    EnvFilter::new(format!("warn,incidents_dash={level}"))
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(target: LogTarget<'_>, verbose: bool) -> Result<()> {
    let filter = build_env_filter(verbose);

    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Start fresh each run
                .open(path)?;

            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true);

            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init();
        }
        LogTarget::Stderr => {
            let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi)
                .without_time()
                .compact();

            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init();
        }
    }

    Ok(())
}
