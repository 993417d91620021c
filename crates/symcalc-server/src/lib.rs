// crates/symcalc-server/src/lib.rs
// symcalc - symbolic math tools over MCP

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;
pub use error::{Result, SymcalcError};
