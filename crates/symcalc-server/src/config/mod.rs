// crates/symcalc-server/src/config/mod.rs
// Configuration and shared constants

pub mod env;
pub mod file;

pub use env::{ConfigValidation, EnvConfig};
pub use file::SymcalcConfig;

use std::time::Duration;
use tracing::debug;

/// Computation deadline applied when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Effective server settings after layering defaults, file and environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Deadline for a single tool computation
    pub timeout: Duration,
    /// Append a `LaTeX:` line to results
    pub latex: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            latex: true,
        }
    }
}

impl ServerConfig {
    /// Environment overrides file, file overrides defaults
    pub fn resolve(file: &SymcalcConfig, env: &EnvConfig) -> Self {
        let defaults = Self::default();

        let timeout_secs = env
            .timeout_secs
            .or(file.compute.timeout_secs)
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let latex = env.latex.or(file.output.latex).unwrap_or(defaults.latex);

        debug!(timeout_secs, latex, "Resolved server configuration");

        Self {
            timeout: Duration::from_secs(timeout_secs),
            latex,
        }
    }

    /// Load file and environment configuration and layer them
    pub fn load() -> (Self, EnvConfig) {
        let file = SymcalcConfig::load();
        let env = EnvConfig::load();
        (Self::resolve(&file, &env), env)
    }
}
