// crates/symcalc-engine/src/error.rs
// Error types for engine operations

use thiserror::Error;

/// Errors raised while parsing or computing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid syntax at position {position}: {message}")]
    Parse { message: String, position: usize },

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("invalid symbol name '{0}'")]
    InvalidSymbol(String),

    #[error("{0}")]
    Unsupported(String),

    #[error("undefined result: {0}")]
    Undefined(String),

    #[error("numeric overflow: {0}")]
    Overflow(String),

    #[error("domain error: {0}")]
    Domain(String),

    #[error("cannot typeset: {0}")]
    Typeset(String),
}

impl EngineError {
    pub(crate) fn parse(message: impl Into<String>, position: usize) -> Self {
        EngineError::Parse {
            message: message.into(),
            position,
        }
    }
}

/// Convenience type alias for Result using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = EngineError::parse("unexpected ')'", 4);
        assert_eq!(err.to_string(), "invalid syntax at position 4: unexpected ')'");
    }

    #[test]
    fn test_unknown_function_message() {
        let err = EngineError::UnknownFunction("frob".to_string());
        assert!(err.to_string().contains("frob"));
    }

    #[test]
    fn test_overflow_message() {
        let err = EngineError::Overflow("2**(3**1024) is too large to evaluate".to_string());
        assert_eq!(
            err.to_string(),
            "numeric overflow: 2**(3**1024) is too large to evaluate"
        );
    }
}
