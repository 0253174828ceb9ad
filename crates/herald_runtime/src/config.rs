//! Runtime configuration, optionally loaded from a TOML file.
//!
//! ```toml
//! log_filter = "herald=debug"
//! prompt = "> "
//! history_size = 500
//!
//! [dispatch]
//! unknown_command = "report"
//! alias_collision = "reject"
//! ```

use std::fs;
use std::path::Path;

use herald_command::{DispatchConfig, UnknownCommandPolicy};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

/// Configuration for the interactive runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Dispatch policies.
    pub dispatch: DispatchConfig,

    /// Log filter used when `HERALD_LOG` is not set.
    pub log_filter: String,

    /// REPL prompt.
    pub prompt: String,

    /// Number of history entries the line editor keeps.
    pub history_size: usize,

    /// Whether the REPL prints its banner.
    pub banner: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchConfig::default().with_unknown_command(UnknownCommandPolicy::Report),
            log_filter: "warn".to_string(),
            prompt: "herald> ".to_string(),
            history_size: 1000,
            banner: true,
        }
    }
}

impl RuntimeConfig {
    /// Parses a configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text isn't valid TOML or has wrongly typed keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| RuntimeError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Builder method to set the dispatch policies.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Builder method to set the fallback log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Builder method to set the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Builder method to set the history size.
    #[must_use]
    pub fn with_history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }

    /// Builder method to enable/disable the banner.
    #[must_use]
    pub fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }
}
