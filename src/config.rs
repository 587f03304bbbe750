//! # Runtime Configuration Module
//!
//! Dispatch-time tuning for the router, loaded from environment variables or a TOML
//! document.
//!
//! ## Environment Variables
//!
//! ### `BRRTMUX_SLOW_MATCH_US`
//!
//! Route lookups slower than this many microseconds are logged at `WARN` as
//! "Slow route matching detected". Default: `1000` (1 ms).
//!
//! ### `BRRTMUX_LOG_MATCHES`
//!
//! `true` logs every successful match at `INFO`, `false` demotes it to `DEBUG`.
//! Default: `true`.
//!
//! ## TOML
//!
//! ```toml
//! slow_match_threshold_us = 250
//! log_matches = false
//! ```
//!
//! Missing keys fall back to their defaults.

use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_SLOW_MATCH_US: u64 = 1_000;

/// Router runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Lookups slower than this are logged as slow (microseconds)
    pub slow_match_threshold_us: u64,
    /// Log successful matches at INFO (otherwise DEBUG)
    pub log_matches: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            slow_match_threshold_us: DEFAULT_SLOW_MATCH_US,
            log_matches: true,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            slow_match_threshold_us: env::var("BRRTMUX_SLOW_MATCH_US")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.slow_match_threshold_us),
            log_matches: env::var("BRRTMUX_LOG_MATCHES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.log_matches),
        }
    }

    /// Parse configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or has unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("Failed to parse router configuration")
    }

    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read router configuration {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    #[must_use]
    pub fn slow_match_threshold(&self) -> Duration {
        Duration::from_micros(self.slow_match_threshold_us)
    }
}
