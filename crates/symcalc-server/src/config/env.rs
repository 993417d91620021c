// crates/symcalc-server/src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::str::FromStr;
use tracing::{Level, info, warn};

/// Computation deadline in seconds
pub const TIMEOUT_VAR: &str = "SYMCALC_TIMEOUT_SECS";
/// Whether results carry a `LaTeX:` line
pub const LATEX_VAR: &str = "SYMCALC_LATEX";
/// Log level override (trace, debug, info, warn, error)
pub const LOG_LEVEL_VAR: &str = "SYMCALC_LOG_LEVEL";

/// Deadlines above this are allowed but probably a mistake
const LONG_TIMEOUT_SECS: u64 = 3600;

/// Configuration validation result
#[derive(Debug)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ConfigValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Computation deadline override (SYMCALC_TIMEOUT_SECS)
    pub timeout_secs: Option<u64>,
    /// LaTeX output override (SYMCALC_LATEX)
    pub latex: Option<bool>,
    /// Log level override (SYMCALC_LOG_LEVEL)
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout_secs = read(TIMEOUT_VAR).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(_) => {
                warn!(value = %raw, "Invalid {}, ignoring", TIMEOUT_VAR);
                None
            }
        });

        let latex = read(LATEX_VAR).and_then(|raw| {
            let parsed = parse_bool(&raw);
            if parsed.is_none() {
                warn!(value = %raw, "Invalid {}, ignoring", LATEX_VAR);
            }
            parsed
        });

        Self {
            timeout_secs,
            latex,
            log_level: read(LOG_LEVEL_VAR).map(|v| v.trim().to_string()),
        }
    }

    /// Parsed log level, if set and recognized
    pub fn log_level(&self) -> Option<Level> {
        self.log_level
            .as_deref()
            .and_then(|v| Level::from_str(v).ok())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        match self.timeout_secs {
            Some(0) => validation.add_error(format!(
                "{} must be greater than 0; the default deadline is used instead",
                TIMEOUT_VAR
            )),
            Some(secs) if secs > LONG_TIMEOUT_SECS => validation.add_warning(format!(
                "{} is {}s; a pathological input can hold a worker that long",
                TIMEOUT_VAR, secs
            )),
            _ => {}
        }

        if let Some(ref level) = self.log_level {
            if self.log_level().is_none() {
                validation.add_warning(format!(
                    "Unknown {} '{}'. Valid options: trace, debug, info, warn, error",
                    LOG_LEVEL_VAR, level
                ));
            }
        }

        validation
    }
}

/// Log level from the process environment, for use before logging is set up
pub fn log_level_from_env() -> Option<Level> {
    std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|v| Level::from_str(v.trim()).ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
