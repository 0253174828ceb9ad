//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::{Result, RuntimeError};

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "HERALD_LOG";

/// Builds the log filter: `HERALD_LOG` if set and valid, else `fallback`.
///
/// # Errors
///
/// Returns an error if `fallback` isn't a valid filter directive.
pub fn filter(fallback: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback).map_err(|e| RuntimeError::Logging(e.to_string()))
}

/// Installs the global subscriber, writing to stderr.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already
/// installed.
pub fn init(fallback: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(fallback)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| RuntimeError::Logging(e.to_string()))
}
