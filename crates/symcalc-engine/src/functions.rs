// crates/symcalc-engine/src/functions.rs
// Exact values of elementary functions at special points

use crate::error::{EngineError, Result};
use crate::expr::{Constant, Expr, Func};
use crate::number::{Number, MAX_FACTORIAL};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;

/// Exact result of `f(arg)` when one is known
pub(crate) fn special_value(f: Func, arg: &Expr) -> Option<Expr> {
    match f {
        Func::Exp => exp_value(arg),
        Func::Log => log_value(arg),
        Func::Sin => sin_pi_multiple(&pi_multiple(arg)?),
        Func::Cos => cos_pi_multiple(&pi_multiple(arg)?),
        Func::Tan => {
            let c = pi_multiple(arg)?;
            let (s, k) = (sin_pi_multiple(&c)?, cos_pi_multiple(&c)?);
            if k.is_zero() {
                return Some(Expr::complex_infinity());
            }
            Some(s / k)
        }
        Func::Asin => inverse_sin_value(&arg.as_number()?),
        Func::Acos => {
            // acos(v) = pi/2 - asin(v)
            let n = arg.as_number()?;
            let asin = inverse_sin_value(&n)?;
            Some(Expr::rational(1, 2) * Expr::pi() - asin)
        }
        Func::Atan => match arg {
            _ if arg.is_zero() => Some(Expr::zero()),
            _ if arg.is_one() => Some(Expr::rational(1, 4) * Expr::pi()),
            _ => match arg.infinity_sign() {
                Some(s) => Some(Expr::rational(i64::from(s), 2) * Expr::pi()),
                None => None,
            },
        },
        Func::Sinh | Func::Tanh if arg.is_zero() => Some(Expr::zero()),
        Func::Cosh if arg.is_zero() => Some(Expr::one()),
        Func::Abs => match arg {
            Expr::Number(n) => Some(Expr::Number(n.abs())),
            _ if arg.infinity_sign().is_some() => Some(Expr::infinity()),
            Expr::Constant(Constant::Pi | Constant::E) => Some(arg.clone()),
            Expr::Constant(Constant::ImaginaryUnit) => Some(Expr::one()),
            _ => None,
        },
        _ => None,
    }
}

fn exp_value(arg: &Expr) -> Option<Expr> {
    if arg.is_zero() {
        return Some(Expr::one());
    }
    if arg.is_one() {
        return Some(Expr::e());
    }
    if let Expr::Func(Func::Log, inner) = arg {
        return Some(inner.as_ref().clone());
    }
    match arg.infinity_sign() {
        Some(s) if s > 0 => Some(Expr::infinity()),
        Some(_) => Some(Expr::zero()),
        None => None,
    }
}

fn log_value(arg: &Expr) -> Option<Expr> {
    if arg.is_one() {
        return Some(Expr::zero());
    }
    if arg.is_zero() {
        return Some(Expr::complex_infinity());
    }
    match arg {
        Expr::Constant(Constant::E) => Some(Expr::one()),
        Expr::Constant(Constant::Infinity) => Some(Expr::infinity()),
        // log(-q) = log(q) + I*pi on the principal branch
        Expr::Number(n) if n.is_negative() && n.is_exact() => Some(
            Expr::apply(Func::Log, Expr::Number(n.abs())) + Expr::i() * Expr::pi(),
        ),
        Expr::Func(Func::Exp, inner) if inner.real_value().is_some() => {
            Some(inner.as_ref().clone())
        }
        _ => None,
    }
}

/// `c` when `arg == c * pi` for a rational `c`
fn pi_multiple(arg: &Expr) -> Option<Number> {
    match arg {
        _ if arg.is_zero() => Some(Number::int(0)),
        Expr::Constant(Constant::Pi) => Some(Number::int(1)),
        Expr::Mul(fs) if fs.len() == 2 => match (&fs[0], &fs[1]) {
            (Expr::Number(c), Expr::Constant(Constant::Pi)) if c.is_exact() => Some(c.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// `sin(c * pi)` for denominators 1, 2, 3, 4 and 6
pub(crate) fn sin_pi_multiple(c: &Number) -> Option<Expr> {
    let r = c.as_ratio()?;
    let d = r.denom().to_i64()?;
    if ![1, 2, 3, 4, 6].contains(&d) {
        return None;
    }

    // Reduce to [0, 2), then fold with sin(t + pi) = -sin(t) and sin(pi - t) = sin(t)
    let m = r.numer().mod_floor(&BigInt::from(2 * d)).to_i64()?;
    let (m, negate) = if m >= d { (m - d, true) } else { (m, false) };
    let m = if 2 * m > d { d - m } else { m };

    let value = match Number::rational(m, d).as_rational()? {
        (0, _) => Expr::zero(),
        (1, 6) => Expr::rational(1, 2),
        (1, 4) => Expr::rational(1, 2) * Expr::sqrt(Expr::int(2)),
        (1, 3) => Expr::rational(1, 2) * Expr::sqrt(Expr::int(3)),
        (1, 2) => Expr::one(),
        _ => return None,
    };
    Some(if negate { -value } else { value })
}

/// `cos(c * pi) = sin((c + 1/2) * pi)`
pub(crate) fn cos_pi_multiple(c: &Number) -> Option<Expr> {
    sin_pi_multiple(&(c.clone() + Number::rational(1, 2)))
}

fn inverse_sin_value(v: &Number) -> Option<Expr> {
    let c = match v.as_rational()? {
        (0, _) => Number::int(0),
        (1, 2) => Number::rational(1, 6),
        (1, 1) => Number::rational(1, 2),
        (-1, 2) => Number::rational(-1, 6),
        (-1, 1) => Number::rational(-1, 2),
        _ => return None,
    };
    Some(Expr::Number(c) * Expr::pi())
}

/// `n!` for an integer `n`; negative integers give `zoo`
pub(crate) fn factorial(arg: &Expr) -> Result<Expr> {
    let Some(n) = arg.as_number().filter(Number::is_integer) else {
        return Err(EngineError::Unsupported(format!(
            "factorial is only supported for integer arguments, got {arg}"
        )));
    };
    if n.is_negative() {
        return Ok(Expr::complex_infinity());
    }
    n.as_integer()
        .and_then(|k| u64::try_from(k).ok())
        .and_then(Number::factorial)
        .map(Expr::Number)
        .ok_or_else(|| {
            EngineError::Overflow(format!(
                "factorial({arg}) is too large to compute exactly (limit {MAX_FACTORIAL})"
            ))
        })
}
