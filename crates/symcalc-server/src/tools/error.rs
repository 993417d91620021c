// crates/symcalc-server/src/tools/error.rs
// Tool-level error types, flattened to strings only at the MCP/CLI boundary

use crate::error::SymcalcError;
use symcalc_engine::EngineError;
use thiserror::Error;

/// Which tool an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Evaluate,
    Differentiate,
    Integrate,
    Solve,
    Statistics,
}

impl Stage {
    /// Fixed lead-in for engine failures
    pub fn failure(&self) -> &'static str {
        match self {
            Stage::Evaluate => "could not evaluate expression",
            Stage::Differentiate => "differentiation failed",
            Stage::Integrate => "integration failed",
            Stage::Solve => "solving failed",
            Stage::Statistics => "statistics computation failed",
        }
    }

    /// Noun used in timeout messages
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Evaluate => "evaluation",
            Stage::Differentiate => "differentiation",
            Stage::Integrate => "integration",
            Stage::Solve => "solving",
            Stage::Statistics => "statistics computation",
        }
    }
}

/// Errors returned by tool handlers
#[derive(Error, Debug)]
pub enum ToolError {
    /// Rejected arguments; the engine was never called
    #[error("Error: {0}")]
    Validation(String),

    #[error("Error: {}. Details: {source}", .stage.failure())]
    Engine {
        stage: Stage,
        #[source]
        source: EngineError,
    },

    #[error("Error: {} timed out after {secs}s", .stage.name())]
    Timeout { stage: Stage, secs: u64 },

    #[error("Error: {}. Details: {source}", .stage.failure())]
    Internal {
        stage: Stage,
        #[source]
        source: SymcalcError,
    },
}

impl ToolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ToolError::Validation(msg.into())
    }

    /// Adapter for `map_err` on engine results
    pub fn engine(stage: Stage) -> impl Fn(EngineError) -> ToolError {
        move |source| ToolError::Engine { stage, source }
    }

    /// Convert to user-facing string for MCP tool boundaries
    pub fn to_user_string(&self) -> String {
        self.to_string()
    }
}

impl From<ToolError> for String {
    fn from(err: ToolError) -> Self {
        err.to_string()
    }
}

/// Result of a tool handler
pub type ToolResult = Result<String, ToolError>;
