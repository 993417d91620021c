// crates/symcalc-server/src/config/file.rs
// File-based configuration from ~/.symcalc/config.toml

use crate::error::{Result, SymcalcError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level config structure
#[derive(Debug, Deserialize, Default)]
pub struct SymcalcConfig {
    #[serde(default)]
    pub compute: ComputeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Computation section
#[derive(Debug, Deserialize, Default)]
pub struct ComputeConfig {
    /// Deadline for a single tool call, in seconds
    pub timeout_secs: Option<u64>,
}

/// Output section
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Append a `LaTeX:` line to results
    pub latex: Option<bool>,
}

impl SymcalcConfig {
    /// Load config from ~/.symcalc/config.toml
    pub fn load() -> Self {
        Self::load_or_default(&Self::config_path())
    }

    /// Load from `path`, falling back to defaults when missing or malformed
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config from file");
                config
            }
            Err(SymcalcError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load config file");
                Self::default()
            }
        }
    }

    /// Load from `path`, reporting read and parse failures
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| SymcalcError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".symcalc")
            .join("config.toml")
    }
}
