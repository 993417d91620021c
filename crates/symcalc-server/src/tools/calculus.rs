// crates/symcalc-server/src/tools/calculus.rs
// Differentiation and integration tools

use super::error::{Stage, ToolError, ToolResult};
use super::format::ResultFormatter;
use super::intake::{parse_expression, parse_variable};
use symcalc_engine::{diff, integrate, integrate_definite};

/// Highest derivative order accepted
pub const MAX_ORDER: i64 = 1000;

const BOUNDS_MISMATCH: &str = "both lower and upper bounds must be provided for definite \
                               integration, or both omitted for indefinite integration.";

/// `order`-th derivative of `expression` with respect to `variable`
pub fn differentiate(
    formatter: &ResultFormatter,
    expression: &str,
    variable: &str,
    order: i64,
) -> ToolResult {
    if order < 1 {
        return Err(ToolError::validation(format!(
            "order must be >= 1, got {}",
            order
        )));
    }
    if order > MAX_ORDER {
        return Err(ToolError::validation(format!(
            "order must be <= {}, got {}",
            MAX_ORDER, order
        )));
    }
    let engine_err = ToolError::engine(Stage::Differentiate);

    let x = parse_variable(variable).map_err(&engine_err)?;
    let f = parse_expression(expression).map_err(&engine_err)?;
    // Bounded by MAX_ORDER above
    let result = diff(&f, &x, order as u32);

    Ok(format!(
        "d^{order}/{variable}^{order} of {expression}:\n{}",
        formatter.format(&result)
    ))
}

/// Indefinite integral, or definite over `[lower, upper]` when both are given
pub fn integrate_expr(
    formatter: &ResultFormatter,
    expression: &str,
    variable: &str,
    lower: Option<&str>,
    upper: Option<&str>,
) -> ToolResult {
    let bounds = match (lower, upper) {
        (Some(lo), Some(hi)) => Some((lo, hi)),
        (None, None) => None,
        _ => return Err(ToolError::validation(BOUNDS_MISMATCH)),
    };
    let engine_err = ToolError::engine(Stage::Integrate);

    let x = parse_variable(variable).map_err(&engine_err)?;
    let f = parse_expression(expression).map_err(&engine_err)?;

    match bounds {
        Some((lo, hi)) => {
            let lower_bound = parse_expression(lo).map_err(&engine_err)?;
            let upper_bound = parse_expression(hi).map_err(&engine_err)?;
            let value =
                integrate_definite(&f, &x, &lower_bound, &upper_bound).map_err(&engine_err)?;
            Ok(format!(
                "∫_{lo}^{hi} {expression} d{variable} =\n{}",
                formatter.format(&value)
            ))
        }
        None => {
            let antiderivative = integrate(&f, &x).map_err(&engine_err)?;
            Ok(format!(
                "∫ {expression} d{variable} =\n{}",
                formatter.format_with_suffix(&antiderivative, " + C")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> ResultFormatter {
        ResultFormatter::default()
    }

    // ============================================================================
    // differentiate
    // ============================================================================

    #[test]
    fn test_first_derivative() {
        let out = differentiate(&fmt(), "x^3", "x", 1).unwrap();
        assert_eq!(out, "d^1/x^1 of x^3:\n3*x**2\nLaTeX: 3 x^{2}");
    }

    #[test]
    fn test_second_derivative() {
        let out = differentiate(&fmt(), "x^3", "x", 2).unwrap();
        assert!(out.starts_with("d^2/x^2 of x^3:\n"), "{out}");
        assert!(out.contains(":\n6*x\n"), "{out}");
    }

    #[test]
    fn test_repeated_first_derivatives_match_higher_order() {
        let once = differentiate(&ResultFormatter::new(false), "x^3", "x", 1).unwrap();
        let first = once.lines().nth(1).unwrap().to_string();
        let twice = differentiate(&ResultFormatter::new(false), &first, "x", 1).unwrap();
        let direct = differentiate(&ResultFormatter::new(false), "x^3", "x", 2).unwrap();
        assert_eq!(twice.lines().nth(1), direct.lines().nth(1));
    }

    #[test]
    fn test_unrelated_variable_gives_zero() {
        let out = differentiate(&ResultFormatter::new(false), "x^2", "y", 1).unwrap();
        assert!(out.ends_with(":\n0"), "{out}");
    }

    #[test]
    fn test_order_validation() {
        let err = differentiate(&fmt(), "x", "x", 0).unwrap_err();
        assert_eq!(err.to_string(), "Error: order must be >= 1, got 0");
        let err = differentiate(&fmt(), "((", "x", -2).unwrap_err();
        assert_eq!(err.to_string(), "Error: order must be >= 1, got -2");
        assert!(matches!(
            differentiate(&fmt(), "x", "x", MAX_ORDER + 1),
            Err(ToolError::Validation(_))
        ));
    }

    #[test]
    fn test_differentiate_malformed() {
        let err = differentiate(&fmt(), "sin(x", "x", 1).unwrap_err();
        assert!(err.to_string().starts_with("Error: differentiation failed. Details: "));
    }

    // ============================================================================
    // integrate_expr
    // ============================================================================

    #[test]
    fn test_indefinite_appends_constant() {
        let out = integrate_expr(&fmt(), "x^2", "x", None, None).unwrap();
        assert_eq!(
            out,
            "∫ x^2 dx =\nx**3/3 + C\nLaTeX: \\frac{x^{3}}{3} + C"
        );
    }

    #[test]
    fn test_definite() {
        let out = integrate_expr(&fmt(), "x^2", "x", Some("0"), Some("3")).unwrap();
        assert_eq!(out, "∫_0^3 x^2 dx =\n9\nLaTeX: 9");
    }

    #[test]
    fn test_improper_bound() {
        let out = integrate_expr(&ResultFormatter::new(false), "exp(-x)", "x", Some("0"), Some("oo"))
            .unwrap();
        assert!(out.ends_with("=\n1"), "{out}");
    }

    #[test]
    fn test_pole_inside_interval() {
        let plain = ResultFormatter::new(false);
        let out = integrate_expr(&plain, "1/x^2", "x", Some("-1"), Some("1")).unwrap();
        assert_eq!(out, "∫_-1^1 1/x^2 dx =\noo");

        let err = integrate_expr(&plain, "1/x", "x", Some("-1"), Some("1")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Error: integration failed. Details: "), "{msg}");
        assert!(msg.contains("diverges"), "{msg}");
    }

    #[test]
    fn test_oscillating_improper_integral() {
        let err = integrate_expr(&ResultFormatter::new(false), "sin(x)", "x", Some("0"), Some("oo"))
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{err}");
    }

    #[test]
    fn test_single_bound_rejected_before_parsing() {
        for (lo, hi) in [(Some("0"), None), (None, Some("1"))] {
            let err = integrate_expr(&fmt(), "((not parsed", "x", lo, hi).unwrap_err();
            assert!(matches!(err, ToolError::Validation(_)));
            assert_eq!(err.to_string(), format!("Error: {}", BOUNDS_MISMATCH));
        }
    }

    #[test]
    fn test_integrate_malformed() {
        let err = integrate_expr(&fmt(), "x +", "x", None, None).unwrap_err();
        assert!(err.to_string().starts_with("Error: integration failed. Details: "));
    }
}
