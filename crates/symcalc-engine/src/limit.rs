// crates/symcalc-engine/src/limit.rs
// Limits by substitution, infinity arithmetic and L'Hôpital's rule

use std::fmt;

use crate::diff::derivative;
use crate::error::{EngineError, Result};
use crate::expr::{Expr, Func, Symbol};
use tracing::debug;

/// Nesting bound for L'Hôpital and dominance rewrites
const MAX_DEPTH: usize = 12;

/// Where the variable goes
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Point {
    /// `at`, approached from the right for positive `side` and the left otherwise
    Finite { at: Expr, side: i8 },
    /// `oo` for a positive sign, `-oo` for a negative one
    Infinite(i8),
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Point::Finite { at, side } if *side < 0 => write!(f, "{at}-"),
            Point::Finite { at, .. } => write!(f, "{at}+"),
            Point::Infinite(s) if *s < 0 => write!(f, "-oo"),
            Point::Infinite(_) => write!(f, "oo"),
        }
    }
}

/// A limit in the extended reals
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Limit {
    Finite(Expr),
    Infinite(i8),
}

/// What the search knows about a subexpression near the point
#[derive(Debug, Clone)]
enum Lim {
    Finite(Expr),
    Infinite(i8),
    /// Stays bounded without settling, like `sin(x)` at `oo`
    Bounded,
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    /// No limit exists
    Oscillates,
    /// None of the rules apply
    Unknown,
}

type Found = std::result::Result<Lim, Failure>;

/// Limit of `expr` as `x` approaches `point`.
///
/// Finite points are approached from the right. Divergence to plus or minus
/// infinity gives `oo` or `-oo`; a limit that does not exist is an
/// [`EngineError::Undefined`].
pub fn limit(expr: &Expr, x: &Symbol, point: &Expr) -> Result<Expr> {
    if point.contains_undefined() || point.is_complex_infinity() {
        return Err(EngineError::Undefined(format!(
            "cannot take a limit at {point}"
        )));
    }
    let point = match point.infinity_sign() {
        Some(s) => Point::Infinite(s),
        None => Point::Finite {
            at: point.clone(),
            side: 1,
        },
    };
    Ok(match limit_at(expr, x, &point)? {
        Limit::Finite(v) => v,
        Limit::Infinite(s) if s < 0 => Expr::neg_infinity(),
        Limit::Infinite(_) => Expr::infinity(),
    })
}

pub(crate) fn limit_at(expr: &Expr, x: &Symbol, point: &Point) -> Result<Limit> {
    match find(expr, x, point, 0) {
        Ok(Lim::Finite(v)) => Ok(Limit::Finite(v)),
        Ok(Lim::Infinite(s)) => Ok(Limit::Infinite(s)),
        Ok(Lim::Bounded) | Err(Failure::Oscillates) => Err(EngineError::Undefined(format!(
            "limit of {expr} as {x} -> {point} does not exist"
        ))),
        Err(Failure::Unknown) => Err(EngineError::Unsupported(format!(
            "could not determine the limit of {expr} as {x} -> {point}"
        ))),
    }
}

fn find(e: &Expr, x: &Symbol, p: &Point, depth: usize) -> Found {
    if depth > MAX_DEPTH {
        debug!(%e, "limit search too deep");
        return Err(Failure::Unknown);
    }
    if !e.has_symbol(x) {
        return constant(e);
    }
    if let Point::Finite { at, .. } = p {
        let v = e.substitute(x, at);
        if v.is_finite_value() {
            return Ok(Lim::Finite(v));
        }
    }
    match e {
        Expr::Symbol(_) => Ok(match p {
            Point::Finite { at, .. } => Lim::Finite(at.clone()),
            Point::Infinite(s) => Lim::Infinite(*s),
        }),
        Expr::Add(ts) => sum_limit(ts, x, p, depth),
        Expr::Mul(fs) => product_limit(fs, x, p, depth),
        Expr::Pow(b, n) => power_limit(b, n, x, p, depth),
        Expr::Func(f, u) => func_limit(*f, e, u, x, p, depth),
        _ => Err(Failure::Unknown),
    }
}

fn constant(e: &Expr) -> Found {
    if let Some(s) = e.infinity_sign() {
        return Ok(Lim::Infinite(s));
    }
    if e.is_finite_value() {
        Ok(Lim::Finite(e.clone()))
    } else {
        Err(Failure::Unknown)
    }
}

fn sum_limit(ts: &[Expr], x: &Symbol, p: &Point, depth: usize) -> Found {
    let mut finite = Vec::new();
    let mut infinite: Vec<(&Expr, i8)> = Vec::new();
    let mut bounded = false;
    for t in ts {
        match find(t, x, p, depth + 1)? {
            Lim::Finite(v) => finite.push(v),
            Lim::Infinite(s) => infinite.push((t, s)),
            Lim::Bounded => bounded = true,
        }
    }

    if let Some(&(_, s)) = infinite.first() {
        if infinite.iter().all(|&(_, t)| t == s) {
            return Ok(Lim::Infinite(s));
        }
        return competing_infinities(&infinite, x, p, depth);
    }
    if bounded {
        return Ok(Lim::Bounded);
    }
    Ok(Lim::Finite(Expr::sum(finite)))
}

/// `oo - oo`: compare every infinite term against the first, then try a
/// common denominator
fn competing_infinities(terms: &[(&Expr, i8)], x: &Symbol, p: &Point, depth: usize) -> Found {
    let (lead, lead_sign) = terms[0];
    let ratio = Expr::sum(
        terms
            .iter()
            .map(|(t, _)| (*t).clone() / lead.clone())
            .collect(),
    );
    match find(&ratio, x, p, depth + 1) {
        Ok(Lim::Finite(v)) if !v.is_zero() => {
            let sign = real_sign(&v).ok_or(Failure::Unknown)?;
            return Ok(Lim::Infinite(lead_sign * sign));
        }
        Ok(Lim::Infinite(s)) => return Ok(Lim::Infinite(lead_sign * s)),
        _ => {}
    }

    let parts: Vec<(Expr, Expr)> = terms.iter().map(|(t, _)| fraction(t)).collect();
    if parts.iter().all(|(_, d)| d.is_one()) {
        return Err(Failure::Unknown);
    }
    let den = Expr::product(parts.iter().map(|(_, d)| d.clone()).collect());
    let num = Expr::sum(
        parts
            .iter()
            .enumerate()
            .map(|(i, (n, _))| {
                let mut fs = vec![n.clone()];
                fs.extend(
                    parts
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, (_, d))| d.clone()),
                );
                Expr::product(fs)
            })
            .collect(),
    );
    quotient_limit(&num, &den, x, p, depth + 1)
}

fn product_limit(fs: &[Expr], x: &Symbol, p: &Point, depth: usize) -> Found {
    let mut values = Vec::new();
    let mut zeros = Vec::new();
    let mut others = Vec::new();
    let mut sign: i8 = 1;
    let mut infinite = false;
    let mut bounded = false;
    for f in fs {
        match find(f, x, p, depth + 1)? {
            Lim::Finite(v) if v.is_zero() => zeros.push(f.clone()),
            Lim::Finite(v) => {
                values.push(v);
                others.push(f.clone());
            }
            Lim::Infinite(s) => {
                sign *= s;
                infinite = true;
                others.push(f.clone());
            }
            Lim::Bounded => {
                bounded = true;
                others.push(f.clone());
            }
        }
    }

    match (zeros.is_empty(), infinite) {
        (true, false) if bounded => Ok(Lim::Bounded),
        (true, false) => Ok(Lim::Finite(Expr::product(values))),
        (false, false) => Ok(Lim::Finite(Expr::zero())),
        (true, true) if bounded => Err(Failure::Unknown),
        (true, true) => {
            let coeff = real_sign(&Expr::product(values)).ok_or(Failure::Unknown)?;
            Ok(Lim::Infinite(sign * coeff))
        }
        (false, true) => {
            let (num, den) = fraction(&Expr::product(fs.to_vec()));
            if !den.is_one() {
                if let Ok(found) = quotient_limit(&num, &den, x, p, depth + 1) {
                    return Ok(found);
                }
            }
            // 0 * oo as oo / (1/0)
            let den = Expr::product(
                zeros
                    .iter()
                    .map(|z| Expr::power(z.clone(), Expr::int(-1)))
                    .collect(),
            );
            lhopital(&Expr::product(others), &den, x, p, depth + 1)
        }
    }
}

/// Limit of `num / den`, applying L'Hôpital's rule to `0/0` and `oo/oo`
fn quotient_limit(num: &Expr, den: &Expr, x: &Symbol, p: &Point, depth: usize) -> Found {
    let top = find(num, x, p, depth + 1)?;
    let bottom = find(den, x, p, depth + 1)?;
    match (&top, &bottom) {
        (Lim::Finite(a), Lim::Finite(b)) if a.is_zero() && b.is_zero() => {
            lhopital(num, den, x, p, depth)
        }
        (Lim::Infinite(_), Lim::Infinite(_)) => lhopital(num, den, x, p, depth),
        (Lim::Finite(a), Lim::Finite(b)) if !b.is_zero() => {
            Ok(Lim::Finite(a.clone() / b.clone()))
        }
        (Lim::Finite(a), Lim::Finite(_)) => {
            let s = real_sign(a).ok_or(Failure::Unknown)?;
            let d = sign_near(den, x, p).ok_or(Failure::Unknown)?;
            Ok(Lim::Infinite(s * d))
        }
        (Lim::Finite(_) | Lim::Bounded, Lim::Infinite(_)) => Ok(Lim::Finite(Expr::zero())),
        _ => Err(Failure::Unknown),
    }
}

fn lhopital(num: &Expr, den: &Expr, x: &Symbol, p: &Point, depth: usize) -> Found {
    let dd = derivative(den, x);
    if dd.is_zero() {
        return Err(Failure::Unknown);
    }
    let dn = derivative(num, x);
    debug!(%num, %den, "applying L'Hopital's rule");
    find(&(dn / dd), x, p, depth + 1)
}

fn power_limit(b: &Expr, n: &Expr, x: &Symbol, p: &Point, depth: usize) -> Found {
    if n.has_symbol(x) {
        // b**n = exp(n*log(b))
        let log = n.clone() * Expr::apply(Func::Log, b.clone());
        return match find(&log, x, p, depth + 1)? {
            Lim::Finite(v) => Ok(Lim::Finite(Expr::apply(Func::Exp, v))),
            Lim::Infinite(s) if s > 0 => Ok(Lim::Infinite(1)),
            Lim::Infinite(_) => Ok(Lim::Finite(Expr::zero())),
            Lim::Bounded => Ok(Lim::Bounded),
        };
    }

    let k = n.real_value().ok_or(Failure::Unknown)?;
    let parity = n.as_integer().map(|i| i.rem_euclid(2));
    match find(b, x, p, depth + 1)? {
        Lim::Finite(v) if v.is_zero() => {
            if k > 0.0 {
                return Ok(Lim::Finite(Expr::zero()));
            }
            let near = sign_near(b, x, p).ok_or(Failure::Unknown)?;
            match parity {
                Some(0) => Ok(Lim::Infinite(1)),
                Some(_) => Ok(Lim::Infinite(near)),
                None if near > 0 => Ok(Lim::Infinite(1)),
                None => Err(Failure::Unknown),
            }
        }
        Lim::Finite(v) => {
            let value = Expr::power(v, n.clone());
            if value.is_finite_value() {
                Ok(Lim::Finite(value))
            } else {
                Err(Failure::Unknown)
            }
        }
        Lim::Infinite(_) if k < 0.0 => Ok(Lim::Finite(Expr::zero())),
        Lim::Infinite(s) => match (s > 0, parity) {
            (true, _) | (false, Some(0)) => Ok(Lim::Infinite(1)),
            (false, Some(_)) => Ok(Lim::Infinite(-1)),
            (false, None) => Err(Failure::Unknown),
        },
        Lim::Bounded if k > 0.0 => Ok(Lim::Bounded),
        Lim::Bounded => Err(Failure::Unknown),
    }
}

fn func_limit(f: Func, e: &Expr, u: &Expr, x: &Symbol, p: &Point, depth: usize) -> Found {
    match find(u, x, p, depth + 1)? {
        Lim::Finite(v) => {
            let value = Expr::apply(f, v.clone());
            if value.is_finite_value() {
                return Ok(Lim::Finite(value));
            }
            match f {
                // Real part of the logarithm from either side
                Func::Log if v.is_zero() => Ok(Lim::Infinite(-1)),
                Func::Tan => Ok(Lim::Infinite(sign_near(e, x, p).ok_or(Failure::Unknown)?)),
                _ => Err(Failure::Unknown),
            }
        }
        Lim::Infinite(s) => match f {
            Func::Exp if s > 0 => Ok(Lim::Infinite(1)),
            Func::Exp => Ok(Lim::Finite(Expr::zero())),
            Func::Log if s > 0 => Ok(Lim::Infinite(1)),
            Func::Sin | Func::Cos => Ok(Lim::Bounded),
            Func::Tan => Err(Failure::Oscillates),
            Func::Atan => Ok(Lim::Finite(
                Expr::rational(i64::from(s), 2) * Expr::pi(),
            )),
            Func::Sinh => Ok(Lim::Infinite(s)),
            Func::Cosh | Func::Abs => Ok(Lim::Infinite(1)),
            Func::Tanh => Ok(Lim::Finite(Expr::int(i64::from(s)))),
            _ => Err(Failure::Unknown),
        },
        Lim::Bounded => match f {
            Func::Sin | Func::Cos | Func::Atan | Func::Tanh | Func::Exp | Func::Abs => {
                Ok(Lim::Bounded)
            }
            _ => Err(Failure::Unknown),
        },
    }
}

/// `num / den` with negative powers moved to the denominator
fn fraction(e: &Expr) -> (Expr, Expr) {
    let factors = match e {
        Expr::Mul(fs) => fs.clone(),
        other => vec![other.clone()],
    };
    let mut num = Vec::new();
    let mut den = Vec::new();
    for f in factors {
        match &f {
            Expr::Pow(b, n) if n.as_number().is_some_and(|k| k.is_negative()) => {
                den.push(Expr::power(b.as_ref().clone(), -n.as_ref().clone()));
            }
            _ => num.push(f),
        }
    }
    (Expr::product(num), Expr::product(den))
}

fn real_sign(v: &Expr) -> Option<i8> {
    let r = v.real_value()?;
    if r > 0.0 {
        Some(1)
    } else if r < 0.0 {
        Some(-1)
    } else {
        None
    }
}

/// Sign of `e` just next to the point, found by evaluating nearby
fn sign_near(e: &Expr, x: &Symbol, p: &Point) -> Option<i8> {
    let samples: Vec<f64> = match p {
        Point::Finite { at, side } => {
            let c = at.real_value()?;
            let scale = c.abs().max(1.0) * f64::from(*side);
            [1e-7, 1e-9, 1e-5].iter().map(|h| c + h * scale).collect()
        }
        Point::Infinite(s) => [1e8, 1e4, 1e2].iter().map(|t| t * f64::from(*s)).collect(),
    };
    samples
        .into_iter()
        .filter_map(|t| e.eval_real_at(x, t))
        .find(|v| *v != 0.0)
        .map(|v| if v > 0.0 { 1 } else { -1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Symbol {
        Symbol::new("x").unwrap()
    }

    fn xe() -> Expr {
        Expr::symbol(&x())
    }

    fn lim(e: &Expr, at: Expr) -> Result<Expr> {
        limit(e, &x(), &at)
    }

    #[test]
    fn test_continuous_point() {
        let e = Expr::power(xe(), Expr::int(2)) + Expr::one();
        assert_eq!(lim(&e, Expr::int(2)).unwrap(), Expr::int(5));
    }

    #[test]
    fn test_zero_over_zero() {
        let e = Expr::apply(Func::Sin, xe()) / xe();
        assert_eq!(lim(&e, Expr::zero()).unwrap(), Expr::one());

        let e = (Expr::one() - Expr::apply(Func::Cos, xe())) / Expr::power(xe(), Expr::int(2));
        assert_eq!(lim(&e, Expr::zero()).unwrap(), Expr::rational(1, 2));
    }

    #[test]
    fn test_zero_times_infinity() {
        let e = xe() * Expr::apply(Func::Log, xe());
        assert_eq!(lim(&e, Expr::zero()).unwrap(), Expr::zero());

        let e = xe() * Expr::apply(Func::Exp, -xe());
        assert_eq!(lim(&e, Expr::infinity()).unwrap(), Expr::zero());
    }

    #[test]
    fn test_poles_are_one_sided() {
        let e = Expr::one() / xe();
        assert_eq!(lim(&e, Expr::zero()).unwrap(), Expr::infinity());

        let left = Point::Finite {
            at: Expr::zero(),
            side: -1,
        };
        assert_eq!(limit_at(&e, &x(), &left).unwrap(), Limit::Infinite(-1));

        let e = Expr::apply(Func::Log, xe());
        assert_eq!(lim(&e, Expr::zero()).unwrap(), Expr::neg_infinity());
    }

    #[test]
    fn test_at_infinity() {
        let e = xe() / (xe() + Expr::one());
        assert_eq!(lim(&e, Expr::infinity()).unwrap(), Expr::one());

        let e = Expr::apply(Func::Atan, xe());
        assert_eq!(lim(&e, Expr::neg_infinity()).unwrap(), -(Expr::pi() / Expr::int(2)));

        let e = Expr::apply(Func::Exp, -xe()) * Expr::apply(Func::Cos, xe());
        assert_eq!(lim(&e, Expr::infinity()).unwrap(), Expr::zero());
    }

    #[test]
    fn test_dominant_term_wins() {
        let e = xe() - Expr::apply(Func::Log, xe());
        assert_eq!(lim(&e, Expr::infinity()).unwrap(), Expr::infinity());

        let e = xe() - Expr::power(xe(), Expr::int(2));
        assert_eq!(lim(&e, Expr::infinity()).unwrap(), Expr::neg_infinity());
    }

    #[test]
    fn test_oscillation_has_no_limit() {
        let e = Expr::apply(Func::Sin, xe());
        let err = lim(&e, Expr::infinity()).unwrap_err();
        assert!(matches!(err, EngineError::Undefined(_)), "{err}");
        assert!(err.to_string().contains("does not exist"));

        let e = Expr::apply(Func::Sin, Expr::one() / xe());
        assert!(matches!(lim(&e, Expr::zero()), Err(EngineError::Undefined(_))));
    }

    #[test]
    fn test_undefined_point() {
        assert!(lim(&xe(), Expr::undefined()).is_err());
    }
}
