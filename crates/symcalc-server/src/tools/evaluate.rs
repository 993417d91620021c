// crates/symcalc-server/src/tools/evaluate.rs
// Numeric or simplified-symbolic evaluation

use super::error::{Stage, ToolError, ToolResult};
use super::format::ResultFormatter;
use super::intake::parse_expression;

/// Evaluate an expression.
///
/// Expressions without free symbols are evaluated numerically; anything else
/// is returned in canonical form.
pub fn evaluate(formatter: &ResultFormatter, expression: &str) -> ToolResult {
    let engine_err = ToolError::engine(Stage::Evaluate);

    let parsed = parse_expression(expression).map_err(&engine_err)?;
    let value = if parsed.free_symbols().is_empty() {
        parsed.evalf().map_err(&engine_err)?
    } else {
        parsed
    };

    Ok(format!("Result:\n{}", formatter.format(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(expression: &str) -> ToolResult {
        evaluate(&ResultFormatter::default(), expression)
    }

    #[test]
    fn test_arithmetic() {
        let out = run("2+3*4").unwrap();
        assert!(out.starts_with("Result:\n"));
        assert!(out.contains("14"));
    }

    #[test]
    fn test_transcendental() {
        let out = run("sin(pi/6)").unwrap();
        assert!(out.contains("0.500000000000000"), "{out}");
    }

    #[test]
    fn test_complex_result() {
        let out = run("sqrt(-4)").unwrap();
        assert!(out.contains("2.00000000000000*I"), "{out}");
    }

    #[test]
    fn test_symbolic_left_unevaluated() {
        let out = run("x + x").unwrap();
        assert!(out.starts_with("Result:\n2*x"), "{out}");
    }

    #[test]
    fn test_division_by_zero() {
        let out = evaluate(&ResultFormatter::new(false), "1/0").unwrap();
        assert_eq!(out, "Result:\nzoo");
        let out = evaluate(&ResultFormatter::new(false), "0**-1").unwrap();
        assert_eq!(out, "Result:\nzoo");
    }

    #[test]
    fn test_beyond_float_range() {
        let out = evaluate(&ResultFormatter::new(false), "10^400").unwrap();
        assert_eq!(out, "Result:\n1.00000000000000e+400");
        let out = evaluate(&ResultFormatter::new(false), "factorial(5) + limit(sin(x)/x, x, 0)").unwrap();
        assert_eq!(out, "Result:\n121.000000000000");
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = evaluate(&ResultFormatter::new(false), "2^3^4^5").unwrap_err().to_string();
        assert!(err.contains("numeric overflow"), "{err}");
    }

    #[test]
    fn test_malformed_expression() {
        let err = run("(2+3").unwrap_err().to_string();
        assert!(err.starts_with("Error: could not evaluate expression. Details: "));
    }
}
