// crates/symcalc-engine/src/display.rs
// Plain-text rendering of expressions

use crate::expr::Expr;
use crate::number::Number;
use num_traits::One;
use std::cmp::Ordering;
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print(self))
    }
}

fn print(e: &Expr) -> String {
    match e {
        Expr::Number(n) => n.to_string(),
        Expr::Symbol(s) => s.name().to_string(),
        Expr::Constant(c) => c.text().to_string(),
        Expr::Add(terms) => print_add(terms),
        Expr::Mul(factors) => print_mul(factors),
        Expr::Pow(b, x) => print_pow(b, x),
        Expr::Func(f, a) => format!("{}({})", f.name(), print(a)),
    }
}

fn print_add(terms: &[Expr]) -> String {
    let mut out = String::new();
    for (i, term) in print_order(terms).into_iter().enumerate() {
        if i == 0 {
            out.push_str(&print(term));
        } else if term.could_extract_minus_sign() {
            out.push_str(" - ");
            out.push_str(&print(&-term.clone()));
        } else {
            out.push_str(" + ");
            out.push_str(&print(term));
        }
    }
    out
}

/// Terms with symbols first (highest degree leading), then constants with
/// plain numbers ahead of radicals and `I`
pub(crate) fn print_order(terms: &[Expr]) -> Vec<&Expr> {
    let mut v: Vec<&Expr> = terms.iter().collect();
    v.sort_by(|a, b| {
        a.is_symbol_free()
            .cmp(&b.is_symbol_free())
            .then_with(|| {
                degree(b)
                    .partial_cmp(&degree(a))
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                let an = matches!(a, Expr::Number(_));
                let bn = matches!(b, Expr::Number(_));
                bn.cmp(&an)
            })
            .then_with(|| a.cmp_canonical(b))
    });
    v
}

fn degree(e: &Expr) -> f64 {
    match e {
        Expr::Symbol(_) => 1.0,
        Expr::Pow(b, x) if matches!(b.as_ref(), Expr::Symbol(_)) => {
            x.as_number().map(|n| n.to_f64()).unwrap_or(0.0)
        }
        Expr::Mul(fs) => fs.iter().map(degree).sum(),
        _ => 0.0,
    }
}

/// Factors split into numerator and denominator strings
pub(crate) struct Fraction<'a> {
    pub negative: bool,
    pub coeff: Number,
    pub numer: Vec<&'a Expr>,
    pub denom: Vec<Expr>,
}

pub(crate) fn split_fraction(factors: &[Expr]) -> Fraction<'_> {
    let (coeff, rest) = match factors.split_first() {
        Some((Expr::Number(c), rest)) => (c.clone(), rest),
        _ => (Number::int(1), factors),
    };
    let mut fraction = Fraction {
        negative: coeff.is_negative(),
        coeff: coeff.abs(),
        numer: Vec::new(),
        denom: Vec::new(),
    };
    for f in rest {
        match f {
            Expr::Pow(b, x) if x.could_extract_minus_sign() && x.as_number().is_some() => {
                fraction
                    .denom
                    .push(Expr::power(b.as_ref().clone(), -x.as_ref().clone()));
            }
            _ => fraction.numer.push(f),
        }
    }
    fraction
}

fn print_mul(factors: &[Expr]) -> String {
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
        c => numer.push(c.to_string()),
    }
    numer.extend(fraction.numer.iter().map(|f| print_factor(f)));
    denom.extend(fraction.denom.iter().map(print_factor));

    let numer = if numer.is_empty() {
        "1".to_string()
    } else {
        numer.join("*")
    };
    let body = match denom.len() {
        0 => numer,
        1 => format!("{}/{}", numer, denom[0]),
        _ => format!("{}/({})", numer, denom.join("*")),
    };
    if fraction.negative {
        format!("-{body}")
    } else {
        body
    }
}

fn print_factor(f: &Expr) -> String {
    match f {
        Expr::Add(_) => format!("({})", print(f)),
        _ => print(f),
    }
}

fn print_pow(base: &Expr, exp: &Expr) -> String {
    if let Some(n) = exp.as_number() {
        if n == Number::rational(1, 2) {
            return format!("sqrt({})", print(base));
        }
        if n == Number::rational(-1, 2) {
            return format!("1/sqrt({})", print(base));
        }
        if n.is_negative() {
            let flipped = Expr::power(base.clone(), Expr::Number(-n));
            return match flipped {
                Expr::Add(_) | Expr::Mul(_) => format!("1/({})", print(&flipped)),
                _ => format!("1/{}", print(&flipped)),
            };
        }
    }

    let base_str = if base_needs_parens(base) {
        format!("({})", print(base))
    } else {
        print(base)
    };
    let exp_str = match exp {
        Expr::Symbol(_) | Expr::Constant(_) => print(exp),
        Expr::Number(n) if n.is_integer() && !n.is_negative() => print(exp),
        Expr::Number(Number::Float(v)) if *v >= 0.0 => print(exp),
        _ => format!("({})", print(exp)),
    };
    format!("{base_str}**{exp_str}")
}

fn base_needs_parens(base: &Expr) -> bool {
    match base {
        Expr::Add(_) | Expr::Mul(_) | Expr::Pow(..) => true,
        Expr::Number(n) => n.is_negative() || (n.is_exact() && !n.is_integer()),
        _ => false,
    }
}
