// crates/symcalc-server/src/cli/mod.rs
// CLI module for symcalc commands

use clap::{Parser, Subcommand};

pub mod serve;
pub mod tool;

// Re-export command handlers
pub use serve::run_mcp_server;
pub use tool::run_tool;

#[derive(Parser)]
#[command(name = "symcalc")]
#[command(about = "Symbolic math tools over MCP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio (default)
    Serve,

    /// Execute a tool directly
    Tool {
        /// Tool name (e.g. evaluate, solve_equation)
        #[arg(index = 1)]
        name: String,

        /// JSON arguments (e.g. '{"expression": "2+3*4"}')
        #[arg(index = 2)]
        args: String,
    },
}
