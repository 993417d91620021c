// crates/symcalc-server/src/tools/mod.rs
// Tool handlers shared by the MCP router and the CLI

//! Every handler is a synchronous, stateless function returning
//! [`ToolResult`]. [`run_blocking`] moves one onto tokio's blocking pool and
//! bounds it with a deadline.

pub mod calculus;
pub mod error;
pub mod evaluate;
pub mod format;
pub mod intake;
pub mod solve;
pub mod stats;

pub use calculus::{differentiate, integrate_expr};
pub use error::{Stage, ToolError, ToolResult};
pub use evaluate::evaluate;
pub use format::ResultFormatter;
pub use solve::solve_equation;
pub use stats::{DistributionParams, stats_expectation_variance};

use std::time::Duration;
use tracing::warn;

/// Run `op` on the blocking pool, giving up after `deadline`.
///
/// On timeout the computation is abandoned, not killed; its result is dropped.
pub async fn run_blocking<F>(stage: Stage, deadline: Duration, op: F) -> ToolResult
where
    F: FnOnce() -> ToolResult + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(op);
    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(ToolError::Internal {
            stage,
            source: join_err.into(),
        }),
        Err(_) => {
            warn!(
                stage = stage.name(),
                deadline_secs = deadline.as_secs(),
                "Computation exceeded deadline"
            );
            Err(ToolError::Timeout {
                stage,
                secs: deadline.as_secs(),
            })
        }
    }
}
