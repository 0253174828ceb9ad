//! Errors raised by the runtime surface.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from configuration loading, logging setup and the line editor.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A configuration file couldn't be read.
    #[error("can't read config file {path}: {source}")]
    ReadConfig {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file isn't valid TOML for [`RuntimeConfig`](crate::RuntimeConfig).
    #[error("invalid config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    /// The log filter couldn't be parsed or a subscriber was already set.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// The terminal line editor failed.
    #[error("line editor error: {0}")]
    Editor(String),
}

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
