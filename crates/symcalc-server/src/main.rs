// crates/symcalc-server/src/main.rs
// symcalc - symbolic math tools over MCP

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use symcalc::config::env::log_level_from_env;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files (global first, then project - project overrides)
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".symcalc/.env"));
    }
    let _ = dotenvy::dotenv(); // Load .env from current directory

    let cli = Cli::parse();

    // Set up logging based on command
    let default_level = match &cli.command {
        Some(Commands::Serve) | None => Level::WARN, // Quiet for MCP stdio
        Some(Commands::Tool { .. }) => Level::INFO,
    };
    let log_level = log_level_from_env().unwrap_or(default_level);

    // stdout carries the MCP transport, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None | Some(Commands::Serve) => {
            cli::run_mcp_server().await?;
        }
        Some(Commands::Tool { name, args }) => {
            cli::run_tool(name, args).await?;
        }
    }

    Ok(())
}
