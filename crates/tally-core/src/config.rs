//! Analysis configuration
//!
//! Parameters the engine accepts per run (never global state):
//! - `top_n`: rows kept in the top-products table
//! - `iqr_multiplier`: width of the outlier fences
//! - `unknown_label`: sentinel for a missing customer age group
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or the user override (~/.config/tally/analysis.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_UNKNOWN_LABEL: &str = "Unknown";

/// Per-run analysis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Number of products kept after ranking by revenue
    pub top_n: usize,
    /// Multiplier k in `[Q1 - k*IQR, Q3 + k*IQR]`
    pub iqr_multiplier: f64,
    /// Label substituted for a missing age group
    pub unknown_label: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            unknown_label: DEFAULT_UNKNOWN_LABEL.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Override the top-N product count
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Override the IQR multiplier
    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    /// Override the missing age-group label
    pub fn with_unknown_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_label = label.into();
        self
    }

    /// Reject parameters that would make the run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::Configuration(
                "top_n must be greater than zero".into(),
            ));
        }
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(Error::Configuration(format!(
                "iqr_multiplier must be a non-negative number, got {}",
                self.iqr_multiplier
            )));
        }
        if self.unknown_label.trim().is_empty() {
            return Err(Error::Configuration(
                "unknown_label must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("analysis.toml"))
}

/// Load configuration (explicit path or user override first, then embedded default)
///
/// An explicit path that does not exist is an error; a missing user override
/// silently falls back to the defaults.
pub fn load_config(override_path: Option<&Path>) -> Result<AnalysisConfig> {
    let content = match override_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            read_config_file(path)?
        }
        None => match default_config_path() {
            Some(default_path) if default_path.exists() => read_config_file(&default_path)?,
            _ => DEFAULT_CONFIG.to_string(),
        },
    };

    AnalysisConfig::from_toml_str(&content)
}

fn read_config_file(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Reading analysis config");
    fs::read_to_string(path)
        .map_err(|e| Error::Configuration(format!("Failed to read config: {}", e)))
}
