// crates/symcalc-server/src/tools/stats.rs
// Expectation and variance of named distributions

use super::error::{Stage, ToolError, ToolResult};
use super::format::ResultFormatter;
use serde_json::json;
use symcalc_engine::{Distribution, Expr, Number};

/// Optional numeric parameters, as supplied by the caller
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionParams {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub mu: Option<f64>,
    pub sigma: Option<f64>,
    pub p: Option<f64>,
}

/// Exact when the shortest decimal form allows it (0.5 becomes 1/2)
fn param(value: f64) -> Expr {
    Expr::number(Number::from_f64(value))
}

/// Build the distribution, plus the parameter mapping that was used
fn build(
    distribution: &str,
    params: &DistributionParams,
) -> Result<(Distribution, serde_json::Value), ToolError> {
    let engine_err = ToolError::engine(Stage::Statistics);

    match distribution.to_lowercase().as_str() {
        "uniform" => {
            let (Some(a), Some(b)) = (params.a, params.b) else {
                return Err(ToolError::validation(
                    "Uniform distribution requires 'a' (lower) and 'b' (upper) parameters.",
                ));
            };
            let dist = Distribution::uniform(param(a), param(b)).map_err(&engine_err)?;
            Ok((dist, json!({ "a": a, "b": b })))
        }
        "normal" => {
            let (Some(mu), Some(sigma)) = (params.mu, params.sigma) else {
                return Err(ToolError::validation(
                    "Normal distribution requires 'mu' (mean) and 'sigma' (std dev) parameters.",
                ));
            };
            let dist = Distribution::normal(param(mu), param(sigma)).map_err(&engine_err)?;
            Ok((dist, json!({ "mu": mu, "sigma": sigma })))
        }
        "bernoulli" => {
            let Some(p) = params.p else {
                return Err(ToolError::validation(
                    "Bernoulli distribution requires 'p' (probability) parameter.",
                ));
            };
            if !(0.0..=1.0).contains(&p) {
                return Err(ToolError::validation(
                    "Bernoulli probability p must be between 0 and 1.",
                ));
            }
            let dist = Distribution::bernoulli(param(p)).map_err(&engine_err)?;
            Ok((dist, json!({ "p": p })))
        }
        _ => Err(ToolError::validation(format!(
            "Unknown distribution '{}'. Supported: Uniform, Normal, Bernoulli.",
            distribution
        ))),
    }
}

/// E[X] and Var(X) for a Uniform, Normal or Bernoulli distribution.
///
/// The `Parameters:` line is the JSON object of the parameters as received.
pub fn stats_expectation_variance(
    formatter: &ResultFormatter,
    distribution: &str,
    params: &DistributionParams,
) -> ToolResult {
    let (dist, used) = build(distribution, params)?;

    Ok(format!(
        "Distribution: {}\nParameters: {}\nExpectation E[X] = {}\nVariance Var(X) = {}",
        distribution,
        used,
        formatter.format(&dist.expectation()),
        formatter.format(&dist.variance())
    ))
}
