// crates/symcalc-server/src/cli/tool.rs
// Direct tool execution from CLI

use super::serve::setup_server_context;
use anyhow::Result;
use symcalc::SymcalcError;
use symcalc::mcp::requests::{
    DifferentiateRequest, EvaluateRequest, IntegrateRequest, SolveEquationRequest, StatsRequest,
};

/// Execute a tool directly from the command line.
///
/// Tool-level failures are printed to stderr and still return `Ok`. An
/// unknown tool name or malformed JSON arguments return `Err`, so the process
/// exits non-zero.
pub async fn run_tool(name: String, args: String) -> Result<()> {
    let server = setup_server_context();

    let res: std::result::Result<String, String> = match name.as_str() {
        "evaluate" => {
            let req: EvaluateRequest = serde_json::from_str(&args)?;
            server.run_evaluate(req).await.map_err(String::from)
        }
        "differentiate" => {
            let req: DifferentiateRequest = serde_json::from_str(&args)?;
            server.run_differentiate(req).await.map_err(String::from)
        }
        "integrate_expr" => {
            let req: IntegrateRequest = serde_json::from_str(&args)?;
            server.run_integrate(req).await.map_err(String::from)
        }
        "solve_equation" => {
            let req: SolveEquationRequest = serde_json::from_str(&args)?;
            server.run_solve(req).await.map_err(String::from)
        }
        "stats_expectation_variance" => {
            let req: StatsRequest = serde_json::from_str(&args)?;
            server.run_stats(req).await.map_err(String::from)
        }
        _ => return Err(SymcalcError::InvalidInput(format!("Unknown tool: {}", name)).into()),
    };

    // Tool errors already carry their "Error: " prefix
    match res {
        Ok(output) => println!("{}", output),
        Err(e) => eprintln!("{}", e),
    }
    Ok(())
}

/// Returns the list of tool names supported by the CLI dispatcher.
/// Used for verification against MCP router.
#[cfg(test)]
fn list_cli_tool_names() -> Vec<&'static str> {
    vec![
        "evaluate",
        "differentiate",
        "integrate_expr",
        "solve_equation",
        "stats_expectation_variance",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use symcalc::config::ServerConfig;
    use symcalc::mcp::SymcalcServer;

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let err = run_tool("bogus".to_string(), "{}".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: Unknown tool: bogus");
    }

    #[tokio::test]
    async fn malformed_arguments_are_an_error() {
        let res = run_tool("evaluate".to_string(), "{not json".to_string()).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn tool_failure_still_returns_ok() {
        let res = run_tool(
            "evaluate".to_string(),
            r#"{"expression": "(2+3"}"#.to_string(),
        )
        .await;
        assert!(res.is_ok());
    }

    /// Verifies CLI dispatcher supports all MCP tools.
    /// This test catches drift between the two implementations.
    #[test]
    fn cli_tools_match_mcp_tools() {
        let server = SymcalcServer::new(&ServerConfig::default());

        let mcp_tools: std::collections::HashSet<String> =
            server.list_tool_names().into_iter().collect();

        let cli_tools: std::collections::HashSet<&str> =
            list_cli_tool_names().into_iter().collect();

        // Check for tools in MCP but missing from CLI
        let missing_from_cli: Vec<_> = mcp_tools
            .iter()
            .filter(|t| !cli_tools.contains(t.as_str()))
            .collect();

        // Check for tools in CLI but missing from MCP
        let missing_from_mcp: Vec<_> = cli_tools
            .iter()
            .filter(|t| !mcp_tools.contains(&t.to_string()))
            .collect();

        assert!(
            missing_from_cli.is_empty(),
            "CLI dispatcher is missing MCP tools: {:?}",
            missing_from_cli
        );

        assert!(
            missing_from_mcp.is_empty(),
            "CLI has tools not in MCP (should not happen): {:?}",
            missing_from_mcp
        );
    }
}
