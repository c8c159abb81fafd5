//! Logging setup.
//!
//! The library only emits `tracing` events. Hosts that want them on disk or
//! stderr call [`init_logging`] once at startup. `RUST_LOG` takes precedence
//! over the level passed in.
//!
//! Terminal hosts should log to a file: anything written to stderr lands in
//! the middle of the rendered bar.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{Result, TabBarError};

/// Install a global fmt subscriber writing to `file`, or stderr.
pub fn init_logging(level: &str, file: Option<&Path>) -> Result<()> {
    let filter = build_filter(level)?;
    let installed = match file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    installed.map_err(|err| TabBarError::Logging(err.to_string()))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    level_filter(level)
}

fn level_filter(level: &str) -> Result<EnvFilter> {
    let level = level.trim();
    let level = if level.is_empty() { "info" } else { level };
    EnvFilter::builder()
        .parse(level)
        .map_err(|err| TabBarError::Logging(format!("invalid logging level \"{level}\": {err}")))
}
