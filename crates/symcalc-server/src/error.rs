// crates/symcalc-server/src/error.rs
// Error types for the server and its ambient layer

use thiserror::Error;

/// Main error type for the symcalc library
#[derive(Error, Debug)]
pub enum SymcalcError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("task cancelled")]
    Cancelled,

    #[error("computation panicked: {0}")]
    Panicked(String),

    #[error("unknown error: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using SymcalcError
pub type Result<T> = std::result::Result<T, SymcalcError>;

impl SymcalcError {
    /// Convert to user-facing string for MCP tool boundaries
    pub fn to_user_string(&self) -> String {
        self.to_string()
    }
}

impl From<String> for SymcalcError {
    fn from(s: String) -> Self {
        SymcalcError::Other(s)
    }
}

impl From<tokio::task::JoinError> for SymcalcError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            SymcalcError::Cancelled
        } else if err.is_panic() {
            SymcalcError::Panicked(err.to_string())
        } else {
            SymcalcError::Other(err.to_string())
        }
    }
}

impl From<SymcalcError> for String {
    fn from(err: SymcalcError) -> Self {
        err.to_string()
    }
}
