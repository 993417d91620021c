// crates/symcalc-engine/src/lib.rs
//! Symbolic math engine behind the symcalc tools.
//!
//! Expressions are immutable trees kept in canonical form by their
//! constructors (see [`Expr`]). On top of that the crate provides:
//!
//! - parsing of expression strings such as `x**2 + sin(x)` ([`parse`])
//! - numeric evaluation to 15 significant digits ([`Expr::evalf`])
//! - limits ([`limit`]), differentiation ([`diff`]) and integration ([`integrate`],
//!   [`integrate_definite`], with adaptive quadrature as a fallback)
//! - equation solving over the reals or complexes ([`solveset`])
//! - moments of Uniform, Normal and Bernoulli distributions ([`Distribution`])
//! - text and LaTeX output through the [`Render`] trait

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod diff;
mod display;
mod error;
mod eval;
mod expr;
mod functions;
mod integrate;
mod latex;
mod limit;
mod number;
mod parse;
mod poly;
pub mod quadrature;
mod render;
mod solve;
mod stats;

pub use diff::diff;
pub use error::{EngineError, Result};
pub use expr::{Constant, Expr, Func, Symbol};
pub use integrate::{integrate, integrate_definite};
pub use latex::to_latex;
pub use limit::limit;
pub use number::{format_float, Number};
pub use parse::{parse, parse_symbol, ParseOptions};
pub use render::Render;
pub use solve::{solveset, Domain, Equation, Family, SolutionSet};
pub use stats::Distribution;
