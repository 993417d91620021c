//! Test utilities for symcalc integration tests

use std::time::Duration;
use symcalc::config::ServerConfig;
use symcalc::mcp::SymcalcServer;
use symcalc::tools::ResultFormatter;

/// Test context wrapping a server with a short deadline
pub struct TestContext {
    pub server: SymcalcServer,
}

impl TestContext {
    /// Server with LaTeX output enabled
    pub fn new() -> Self {
        Self::with_latex(true)
    }

    /// Server with LaTeX output switched on or off
    pub fn with_latex(latex: bool) -> Self {
        let config = ServerConfig {
            timeout: Duration::from_secs(10),
            latex,
        };
        Self {
            server: SymcalcServer::new(&config),
        }
    }
}

/// Formatter producing text only, for exact-match assertions
pub fn text_only() -> ResultFormatter {
    ResultFormatter::new(false)
}

/// The result line(s) after a tool's header line
pub fn body(output: &str) -> &str {
    output.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
}
