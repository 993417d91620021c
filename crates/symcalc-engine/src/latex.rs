// crates/symcalc-engine/src/latex.rs
// LaTeX rendering of expressions

use crate::display::{print_order, split_fraction};
use crate::error::{EngineError, Result};
use crate::expr::{Constant, Expr, Func};
use crate::number::{format_float, Number};
use num_traits::{One, Signed};

/// Render an expression as LaTeX.
///
/// Fails for values with no typeset form (`nan`, non-finite floats) so callers
/// can fall back to plain text.
pub fn to_latex(e: &Expr) -> Result<String> {
    match e {
        Expr::Number(n) => number_latex(n),
        Expr::Symbol(s) => Ok(symbol_latex(s.name())),
        Expr::Constant(c) => constant_latex(*c),
        Expr::Add(terms) => add_latex(terms),
        Expr::Mul(factors) => mul_latex(factors),
        Expr::Pow(b, x) => pow_latex(b, x),
        Expr::Func(f, a) => func_latex(*f, a),
    }
}

fn number_latex(n: &Number) -> Result<String> {
    match n {
        Number::Rational(r) if r.is_integer() => Ok(r.numer().to_string()),
        Number::Rational(r) if r.is_negative() => Ok(format!(
            "- \\frac{{{}}}{{{}}}",
            -r.numer(),
            r.denom()
        )),
        Number::Rational(r) => Ok(format!("\\frac{{{}}}{{{}}}", r.numer(), r.denom())),
        Number::Float(v) if !v.is_finite() => Err(EngineError::Typeset(format_float(*v))),
        Number::Float(v) => Ok(format_float(*v)),
        Number::Wide(w) if !w.mantissa().is_finite() => Err(EngineError::Typeset(w.to_string())),
        Number::Wide(w) => Ok(w.to_string()),
    }
}

fn constant_latex(c: Constant) -> Result<String> {
    let s = match c {
        Constant::Pi => "\\pi",
        Constant::E => "e",
        Constant::ImaginaryUnit => "i",
        Constant::Infinity => "\\infty",
        Constant::ComplexInfinity => "\\tilde{\\infty}",
        Constant::Undefined => {
            return Err(EngineError::Typeset("nan has no typeset form".to_string()));
        }
    };
    Ok(s.to_string())
}

const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi", "omega",
    "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
];

/// Greek names become commands and trailing digits or `_suffix` become subscripts
pub(crate) fn symbol_latex(name: &str) -> String {
    let (head, sub) = match name.trim_start_matches('_').split_once('_') {
        Some((h, s)) if !h.is_empty() && !s.is_empty() => (h.to_string(), Some(s.to_string())),
        _ => {
            let trimmed = name.trim_start_matches('_');
            let split = trimmed
                .char_indices()
                .rev()
                .take_while(|(_, c)| c.is_ascii_digit())
                .last()
                .map(|(i, _)| i);
            match split {
                Some(i) if i > 0 => (trimmed[..i].to_string(), Some(trimmed[i..].to_string())),
                _ => (trimmed.to_string(), None),
            }
        }
    };
    let head = if GREEK.contains(&head.as_str()) {
        format!("\\{head}")
    } else {
        head
    };
    match sub {
        Some(s) => format!("{head}_{{{}}}", symbol_latex(&s)),
        None => head,
    }
}

fn add_latex(terms: &[Expr]) -> Result<String> {
    let mut out = String::new();
    for (i, term) in print_order(terms).into_iter().enumerate() {
        if i == 0 {
            out.push_str(&to_latex(term)?);
        } else if term.could_extract_minus_sign() {
            out.push_str(" - ");
            out.push_str(&to_latex(&-term.clone())?);
        } else {
            out.push_str(" + ");
            out.push_str(&to_latex(term)?);
        }
    }
    Ok(out)
}

fn factor_latex(f: &Expr) -> Result<String> {
    match f {
        Expr::Add(_) => Ok(format!("\\left({}\\right)", to_latex(f)?)),
        _ => to_latex(f),
    }
}

fn mul_latex(factors: &[Expr]) -> Result<String> {
    let fraction = split_fraction(factors);

    let mut numer: Vec<String> = Vec::new();
    let mut denom: Vec<String> = Vec::new();
    match &fraction.coeff {
        Number::Rational(r) => {
            if !r.numer().is_one() {
                numer.push(r.numer().to_string());
            }
            if !r.denom().is_one() {
                denom.push(r.denom().to_string());
            }
        }
        c => numer.push(number_latex(c)?),
    }
    for f in &fraction.numer {
        numer.push(factor_latex(f)?);
    }
    for f in &fraction.denom {
        denom.push(factor_latex(f)?);
    }

    let numer = if numer.is_empty() {
        "1".to_string()
    } else {
        numer.join(" ")
    };
    let body = if denom.is_empty() {
        numer
    } else {
        format!("\\frac{{{}}}{{{}}}", numer, denom.join(" "))
    };
    Ok(if fraction.negative {
        format!("- {body}")
    } else {
        body
    })
}

fn pow_latex(base: &Expr, exp: &Expr) -> Result<String> {
    if let Some(n) = exp.as_number() {
        if n.is_negative() {
            let flipped = Expr::power(base.clone(), Expr::Number(-n));
            return Ok(format!("\\frac{{1}}{{{}}}", to_latex(&flipped)?));
        }
        if let Some((1, q)) = n.as_rational() {
            if q == 2 {
                return Ok(format!("\\sqrt{{{}}}", to_latex(base)?));
            }
            if q > 2 {
                return Ok(format!("\\sqrt[{}]{{{}}}", q, to_latex(base)?));
            }
        }
    }

    let base_str = match base {
        Expr::Add(_) | Expr::Mul(_) | Expr::Pow(..) => format!("\\left({}\\right)", to_latex(base)?),
        Expr::Number(n) if n.is_negative() || !n.is_integer() => {
            format!("\\left({}\\right)", to_latex(base)?)
        }
        _ => to_latex(base)?,
    };
    Ok(format!("{}^{{{}}}", base_str, to_latex(exp)?))
}

fn func_latex(f: Func, arg: &Expr) -> Result<String> {
    let inner = to_latex(arg)?;
    let s = match f {
        Func::Exp => format!("e^{{{inner}}}"),
        Func::Abs => format!("\\left|{{{inner}}}\\right|"),
        Func::Asin | Func::Acos | Func::Atan => {
            format!("\\operatorname{{{}}}{{\\left({} \\right)}}", f.name(), inner)
        }
        _ => format!("\\{}{{\\left({} \\right)}}", f.name(), inner),
    };
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Symbol;

    fn x() -> Expr {
        Expr::Symbol(Symbol::new("x").unwrap())
    }

    #[test]
    fn test_polynomial_latex() {
        let e = Expr::int(3) * Expr::power(x(), Expr::int(2));
        assert_eq!(to_latex(&e).unwrap(), "3 x^{2}");
    }

    #[test]
    fn test_fraction_latex() {
        let e = Expr::rational(1, 3) * Expr::power(x(), Expr::int(3));
        assert_eq!(to_latex(&e).unwrap(), "\\frac{x^{3}}{3}");
        assert_eq!(to_latex(&Expr::rational(-1, 2)).unwrap(), "- \\frac{1}{2}");
    }

    #[test]
    fn test_function_latex() {
        assert_eq!(
            to_latex(&Expr::apply(Func::Sin, x())).unwrap(),
            "\\sin{\\left(x \\right)}"
        );
        assert_eq!(to_latex(&Expr::apply(Func::Exp, x())).unwrap(), "e^{x}");
        assert_eq!(to_latex(&Expr::sqrt(x())).unwrap(), "\\sqrt{x}");
    }

    #[test]
    fn test_symbol_subscripts() {
        assert_eq!(symbol_latex("x1"), "x_{1}");
        assert_eq!(symbol_latex("alpha"), "\\alpha");
        assert_eq!(symbol_latex("theta_0"), "\\theta_{0}");
    }

    #[test]
    fn test_undefined_has_no_latex() {
        assert!(matches!(
            to_latex(&Expr::undefined()),
            Err(EngineError::Typeset(_))
        ));
    }

    #[test]
    fn test_complex_infinity_and_large_numbers() {
        assert_eq!(
            to_latex(&Expr::complex_infinity()).unwrap(),
            "\\tilde{\\infty}"
        );
        let e = x() / Expr::power(Expr::int(10), Expr::int(30));
        assert_eq!(
            to_latex(&e).unwrap(),
            format!("\\frac{{x}}{{1{}}}", "0".repeat(30))
        );
    }
}
