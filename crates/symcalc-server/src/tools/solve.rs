// crates/symcalc-server/src/tools/solve.rs
// Equation solving tool

use super::error::{Stage, ToolError, ToolResult};
use super::format::ResultFormatter;
use super::intake::{parse_expression, parse_variable};
use symcalc_engine::{Domain, Equation, Expr, solveset};

/// `"R"` or `"C"`; anything else is rejected
pub fn parse_domain(domain: &str) -> Result<Domain, ToolError> {
    match domain.trim() {
        "R" => Ok(Domain::Reals),
        "C" => Ok(Domain::Complexes),
        other => Err(ToolError::validation(format!(
            "domain must be 'R' (reals) or 'C' (complexes), got '{}'",
            other
        ))),
    }
}

/// Solve `equation` for `variable` over `domain`.
///
/// `lhs = rhs` is split at the first `=`; text without `=` means `expr = 0`.
pub fn solve_equation(
    formatter: &ResultFormatter,
    equation: &str,
    variable: &str,
    domain: &str,
) -> ToolResult {
    let dom = parse_domain(domain)?;
    let engine_err = ToolError::engine(Stage::Solve);

    let x = parse_variable(variable).map_err(&engine_err)?;
    let eq = match equation.split_once('=') {
        Some((lhs, rhs)) => Equation::new(
            parse_expression(lhs.trim()).map_err(&engine_err)?,
            parse_expression(rhs.trim()).map_err(&engine_err)?,
        ),
        None => Equation::new(parse_expression(equation).map_err(&engine_err)?, Expr::zero()),
    };
    let solutions = solveset(&eq, &x, dom).map_err(&engine_err)?;

    Ok(format!(
        "Solutions for {equation} over {domain}:\n{}",
        formatter.format(&solutions)
    ))
}
