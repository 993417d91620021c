// crates/symcalc-server/src/tools/intake.rs
// Expression normalization and parsing

use symcalc_engine::{Expr, ParseOptions, Result, Symbol, parse, parse_symbol};

/// Rewrite caret exponentiation to `**`
pub fn normalize(raw: &str) -> String {
    raw.replace('^', "**")
}

/// Normalize then parse, with caret-as-power enabled in the parser too
pub fn parse_expression(raw: &str) -> Result<Expr> {
    parse(&normalize(raw), ParseOptions { convert_xor: true })
}

/// Symbol for a variable name
pub fn parse_variable(name: &str) -> Result<Symbol> {
    parse_symbol(name)
}
