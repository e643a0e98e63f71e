//! Diagnostic logging via `tracing`.
//!
//! # Environment Variables
//!
//! - `CHAT_EXPORT_LOG`: filter directive (like `RUST_LOG`), e.g. `chat_export_explorer=debug`.
//!   Falls back to `RUST_LOG`, then to `warn`.
//!
//! The line-oriented commands log to stderr. The terminal viewer owns the screen, so it logs
//! to a file when one is given and not at all otherwise.

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, ViewerError};

pub const LOG_ENV_VAR: &str = "CHAT_EXPORT_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Where log events go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appended to, created if missing
    File(PathBuf),
    Off,
}

fn build_env_filter() -> EnvFilter {
    let directive = env::var(LOG_ENV_VAR)
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_DIRECTIVE.to_string());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging(target: LogTarget) -> Result<()> {
    let registry = Registry::default().with(build_env_filter());

    // try_init fails only if a global subscriber already exists
    match target {
        LogTarget::Off => {}
        LogTarget::Stderr => {
            let _ = registry.with(fmt::layer().compact().with_writer(io::stderr)).try_init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path).map_err(|e| {
                ViewerError::io(format!("Failed to open log file {}", path.display()), e)
            })?;
            let _ = registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init();
        }
    }

    Ok(())
}
