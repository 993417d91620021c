// crates/symcalc-server/src/cli/serve.rs
// MCP server initialization and main loop

use anyhow::Result;
use symcalc::config::ServerConfig;
use symcalc::mcp::SymcalcServer;
use tracing::{error, info, warn};

/// Load configuration and build the server
pub fn setup_server_context() -> SymcalcServer {
    let (config, env_config) = ServerConfig::load();

    // Validate and log problems; none of them stop the server
    let validation = env_config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    for err in &validation.errors {
        error!("{}", err);
    }

    info!(
        timeout_secs = config.timeout.as_secs(),
        latex = config.latex,
        "Server configured"
    );
    SymcalcServer::new(&config)
}

/// Run the MCP server over stdio until the client disconnects
pub async fn run_mcp_server() -> Result<()> {
    let server = setup_server_context();

    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    service.waiting().await?;

    Ok(())
}
