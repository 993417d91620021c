// crates/symcalc-server/src/mcp/requests.rs
// MCP tool request types

use crate::tools::DistributionParams;
use rmcp::schemars;
use serde::Deserialize;

fn default_variable() -> String {
    "x".to_string()
}

fn default_order() -> i64 {
    1
}

fn default_domain() -> String {
    "C".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EvaluateRequest {
    #[schemars(description = "Expression to evaluate, e.g. \"2+3*4\" or \"sin(pi/3)\". Use ^ or ** for powers.")]
    pub expression: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DifferentiateRequest {
    #[schemars(description = "Expression to differentiate, e.g. \"sin(x)*exp(x)\"")]
    pub expression: String,
    #[schemars(description = "Variable to differentiate with respect to (default: x)")]
    #[serde(default = "default_variable")]
    pub variable: String,
    #[schemars(description = "Derivative order, 1 to 1000 (default: 1)")]
    #[serde(default = "default_order")]
    pub order: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IntegrateRequest {
    #[schemars(description = "Expression to integrate, e.g. \"exp(-x^2)\"")]
    pub expression: String,
    #[schemars(description = "Integration variable (default: x)")]
    #[serde(default = "default_variable")]
    pub variable: String,
    #[schemars(description = "Lower bound, e.g. \"0\" or \"-oo\". Omit together with upper for an indefinite integral.")]
    pub lower: Option<String>,
    #[schemars(description = "Upper bound, e.g. \"1\" or \"oo\". Omit together with lower for an indefinite integral.")]
    pub upper: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SolveEquationRequest {
    #[schemars(description = "Equation, e.g. \"x^2 - 2 = 0\", or an expression taken as equal to zero")]
    pub equation: String,
    #[schemars(description = "Variable to solve for (default: x)")]
    #[serde(default = "default_variable")]
    pub variable: String,
    #[schemars(description = "Solution domain: 'R' (reals) or 'C' (complexes, default)")]
    #[serde(default = "default_domain")]
    pub domain: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StatsRequest {
    #[schemars(description = "Distribution: Uniform, Normal or Bernoulli (case-insensitive)")]
    pub distribution: String,
    #[schemars(description = "Lower bound for Uniform")]
    pub a: Option<f64>,
    #[schemars(description = "Upper bound for Uniform")]
    pub b: Option<f64>,
    #[schemars(description = "Mean for Normal")]
    pub mu: Option<f64>,
    #[schemars(description = "Standard deviation for Normal")]
    pub sigma: Option<f64>,
    #[schemars(description = "Probability of success for Bernoulli")]
    pub p: Option<f64>,
}

impl StatsRequest {
    pub fn params(&self) -> DistributionParams {
        DistributionParams {
            a: self.a,
            b: self.b,
            mu: self.mu,
            sigma: self.sigma,
            p: self.p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let req: DifferentiateRequest = serde_json::from_str(r#"{"expression": "x^2"}"#).unwrap();
        assert_eq!(req.variable, "x");
        assert_eq!(req.order, 1);

        let req: SolveEquationRequest = serde_json::from_str(r#"{"equation": "x = 1"}"#).unwrap();
        assert_eq!(req.variable, "x");
        assert_eq!(req.domain, "C");
    }

    #[test]
    fn test_optional_bounds() {
        let req: IntegrateRequest =
            serde_json::from_str(r#"{"expression": "x", "lower": "0"}"#).unwrap();
        assert_eq!(req.lower.as_deref(), Some("0"));
        assert!(req.upper.is_none());
    }

    #[test]
    fn test_stats_params() {
        let req: StatsRequest =
            serde_json::from_str(r#"{"distribution": "bernoulli", "p": 0.3}"#).unwrap();
        let params = req.params();
        assert_eq!(params.p, Some(0.3));
        assert!(params.a.is_none());
    }

    #[test]
    fn test_missing_required_field() {
        assert!(serde_json::from_str::<EvaluateRequest>("{}").is_err());
    }
}
