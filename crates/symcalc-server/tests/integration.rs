//! Integration tests for symcalc MCP tools
//!
//! These tests drive the tool handlers and the server dispatch boundary the
//! way MCP and CLI callers do.

mod test_utils;

use symcalc::mcp::requests::{
    DifferentiateRequest, EvaluateRequest, IntegrateRequest, SolveEquationRequest, StatsRequest,
};
use symcalc::tools::{
    DistributionParams, ToolError, differentiate, evaluate, integrate_expr, solve_equation,
    stats_expectation_variance,
};
use test_utils::{TestContext, body, text_only};

// ============================================================================
// Evaluate
// ============================================================================

#[test]
fn test_evaluate_numeric() {
    let out = evaluate(&text_only(), "2+3*4").unwrap();
    assert_eq!(out, "Result:\n14.0000000000000");
}

#[test]
fn test_evaluate_caret_power() {
    let out = evaluate(&text_only(), "2^0.5").unwrap();
    assert_eq!(body(&out), "1.41421356237310");
}

#[test]
fn test_evaluate_exact_arithmetic_beyond_f64() {
    let out = evaluate(&text_only(), "10^400").unwrap();
    assert_eq!(body(&out), "1.00000000000000e+400");

    let out = evaluate(&text_only(), "factorial(200)").unwrap();
    assert_eq!(body(&out), "7.88657867364791e+374");

    let out = evaluate(&text_only(), "1/0").unwrap();
    assert_eq!(body(&out), "zoo");

    let err = evaluate(&text_only(), "2^3^4^5").unwrap_err().to_string();
    assert!(err.contains("numeric overflow"), "{err}");
    assert!(!err.contains("2**oo"), "{err}");
}

#[test]
fn test_evaluate_inline_calculus() {
    let out = evaluate(&text_only(), "limit(sin(x)/x, x, 0)").unwrap();
    assert_eq!(body(&out), "1.00000000000000");

    let out = evaluate(&text_only(), "diff(x^3, x, 2)").unwrap();
    assert_eq!(body(&out), "6*x");

    let out = evaluate(&text_only(), "integrate(cos(x), x)").unwrap();
    assert_eq!(body(&out), "sin(x)");

    let out = evaluate(&text_only(), "limit(1/x, x, oo) + factorial(3)").unwrap();
    assert_eq!(body(&out), "6.00000000000000");
}

#[tokio::test]
async fn test_evaluate_through_server() {
    let ctx = TestContext::new();
    let out = ctx
        .server
        .run_evaluate(EvaluateRequest {
            expression: "sqrt(-4)".to_string(),
        })
        .await
        .unwrap();
    assert!(out.starts_with("Result:\n2.00000000000000*I"), "{out}");
}

// ============================================================================
// Differentiate / Integrate round trips
// ============================================================================

#[test]
fn test_integrate_then_differentiate() {
    for expression in ["x^2", "cos(3*x)", "exp(2*x)", "1/(x^2 + 1)", "x*exp(x)"] {
        let anti = integrate_expr(&text_only(), expression, "x", None, None).unwrap();
        let anti = body(&anti)
            .strip_suffix(" + C")
            .expect("indefinite integral ends with + C")
            .to_string();

        let back = differentiate(&text_only(), &anti, "x", 1).unwrap();
        let direct = evaluate(&text_only(), expression).unwrap();
        assert_eq!(
            body(&back),
            body(&direct),
            "d/dx of the antiderivative of {expression} was {}",
            body(&back)
        );
    }
}

#[test]
fn test_differentiate_product() {
    let out = differentiate(&text_only(), "sin(x)*exp(x)", "x", 1).unwrap();
    assert!(out.starts_with("d^1/x^1 of sin(x)*exp(x):\n"));
    let derivative = body(&out);
    let (first, second) = derivative.split_once(" + ").expect("two product-rule terms");
    for term in [first, second] {
        assert!(term.contains("exp(x)"), "{derivative}");
    }
    assert!(derivative.contains("sin(x)") && derivative.contains("cos(x)"), "{derivative}");
}

#[tokio::test]
async fn test_differentiate_defaults_through_server() {
    let ctx = TestContext::with_latex(false);
    let req: DifferentiateRequest = serde_json::from_str(r#"{"expression": "x^3"}"#).unwrap();
    let out = ctx.server.run_differentiate(req).await.unwrap();
    assert_eq!(out, "d^1/x^1 of x^3:\n3*x**2");
}

#[test]
fn test_definite_integrals() {
    let out = integrate_expr(&text_only(), "x^2", "x", Some("0"), Some("3")).unwrap();
    assert_eq!(body(&out), "9");

    let out = integrate_expr(&text_only(), "exp(-x)", "x", Some("0"), Some("oo")).unwrap();
    assert_eq!(body(&out), "1");

    let out = integrate_expr(&text_only(), "exp(-x^2)", "x", Some("0"), Some("1")).unwrap();
    assert!(body(&out).starts_with("0.74682413281"), "{out}");
}

#[test]
fn test_definite_integrals_with_poles() {
    let out = integrate_expr(&text_only(), "1/x^2", "x", Some("-1"), Some("1")).unwrap();
    assert_eq!(body(&out), "oo");

    let out = integrate_expr(&text_only(), "1/x", "x", Some("0"), Some("1")).unwrap();
    assert_eq!(body(&out), "oo");

    for (expression, lo, hi) in [("1/x", "-1", "1"), ("tan(x)", "0", "pi"), ("1/(x-2)", "0", "3")] {
        let err = integrate_expr(&text_only(), expression, "x", Some(lo), Some(hi)).unwrap_err();
        assert!(
            err.to_string().contains("diverges"),
            "integral of {expression} over [{lo}, {hi}]: {err}"
        );
    }

    let err = integrate_expr(&text_only(), "sin(x)", "x", Some("0"), Some("oo")).unwrap_err();
    assert!(!err.to_string().contains("cos(oo)"), "{err}");
}

#[tokio::test]
async fn test_integrate_single_bound_through_server() {
    let ctx = TestContext::new();
    let req: IntegrateRequest =
        serde_json::from_str(r#"{"expression": "x", "upper": "2"}"#).unwrap();
    let err = ctx.server.run_integrate(req).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error: both lower and upper bounds must be provided for definite integration, \
         or both omitted for indefinite integration."
    );
}

// ============================================================================
// Solve
// ============================================================================

#[test]
fn test_solve_quadratic_over_reals() {
    let out = solve_equation(&text_only(), "x^2 - 2 = 0", "x", "R").unwrap();
    assert_eq!(out, "Solutions for x^2 - 2 = 0 over R:\n{-sqrt(2), sqrt(2)}");
}

#[test]
fn test_solve_large_coefficients_exactly() {
    let out = solve_equation(&text_only(), "x^2 - 10000000000*x + 1 = 0", "x", "R").unwrap();
    let roots = body(&out);
    assert_eq!(roots.matches(", ").count(), 1, "{roots}");
    assert!(!roots.starts_with("{0,"), "{roots}");
    assert_eq!(roots.matches("5000000000").count(), 2, "{roots}");
}

#[test]
fn test_solve_cubic_over_complexes() {
    let out = solve_equation(&text_only(), "x^3 - 1", "x", "C").unwrap();
    let roots = body(&out);
    assert_eq!(roots.matches(", ").count(), 2, "{roots}");
    assert!(roots.ends_with(", 1}"), "{roots}");
    assert_eq!(roots.matches("sqrt(3)").count(), 2, "{roots}");
}

#[test]
fn test_solve_exponential() {
    let out = solve_equation(&text_only(), "2^x = 8", "x", "R").unwrap();
    assert_eq!(body(&out), "{3}");
}

#[tokio::test]
async fn test_solve_default_domain_through_server() {
    let ctx = TestContext::with_latex(false);
    let req: SolveEquationRequest = serde_json::from_str(r#"{"equation": "x^2 + 4"}"#).unwrap();
    let out = ctx.server.run_solve(req).await.unwrap();
    assert_eq!(out, "Solutions for x^2 + 4 over C:\n{-2*I, 2*I}");
}

#[test]
fn test_solve_rejects_unknown_domain() {
    let err = solve_equation(&text_only(), "x = 1", "x", "reals").unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_stats_bernoulli() {
    let params = DistributionParams {
        p: Some(0.5),
        ..Default::default()
    };
    let out = stats_expectation_variance(&text_only(), "bernoulli", &params).unwrap();
    assert!(out.contains("Expectation E[X] = 1/2"));
    assert!(out.contains("Variance Var(X) = 1/4"));
}

#[tokio::test]
async fn test_stats_through_server() {
    let ctx = TestContext::new();
    let req: StatsRequest =
        serde_json::from_str(r#"{"distribution": "Uniform", "a": 0, "b": 1}"#).unwrap();
    let out = ctx.server.run_stats(req).await.unwrap();
    assert!(out.starts_with("Distribution: Uniform\n"), "{out}");
    assert!(out.contains("Expectation E[X] = 1/2\nLaTeX: \\frac{1}{2}"), "{out}");
    assert!(out.contains("Variance Var(X) = 1/12\nLaTeX: \\frac{1}{12}"), "{out}");
}

#[test]
fn test_stats_out_of_range_probability() {
    let params = DistributionParams {
        p: Some(1.5),
        ..Default::default()
    };
    let err = stats_expectation_variance(&text_only(), "bernoulli", &params).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error: Bernoulli probability p must be between 0 and 1."
    );
}

// ============================================================================
// Malformed input never escapes a handler
// ============================================================================

#[test]
fn test_malformed_input_maps_to_handler_errors() {
    let fmt = text_only();
    let cases = [
        (evaluate(&fmt, "(1 + 2"), "Error: could not evaluate expression. Details: "),
        (differentiate(&fmt, "(x", "x", 1), "Error: differentiation failed. Details: "),
        (
            integrate_expr(&fmt, "x)", "x", None, None),
            "Error: integration failed. Details: ",
        ),
        (solve_equation(&fmt, "x = (", "x", "R"), "Error: solving failed. Details: "),
    ];
    for (result, prefix) in cases {
        let err = result.unwrap_err().to_string();
        assert!(err.starts_with(prefix), "{err}");
    }
}

#[test]
fn test_unknown_function_is_reported() {
    let err = evaluate(&text_only(), "frobnicate(2)").unwrap_err().to_string();
    assert!(err.contains("unknown function 'frobnicate'"), "{err}");
}
