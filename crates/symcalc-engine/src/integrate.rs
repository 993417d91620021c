// crates/symcalc-engine/src/integrate.rs
// Rule-based antiderivatives with a numeric fallback for definite integrals

use crate::diff::derivative;
use crate::error::{EngineError, Result};
use crate::expr::{Expr, Func, Symbol};
use crate::limit::{limit_at, Limit, Point};
use crate::quadrature;
use crate::solve::{solveset, Domain, Equation, Family, SolutionSet};
use tracing::debug;

/// Recursion guard for rule application
const MAX_DEPTH: usize = 16;
/// Most interior poles a definite integral is split at
const MAX_POLES: i64 = 1000;

/// Indefinite integral of `expr` with respect to `x`, without the constant
pub fn integrate(expr: &Expr, x: &Symbol) -> Result<Expr> {
    antiderivative(expr, x, 0).ok_or_else(|| {
        EngineError::Unsupported(format!(
            "could not find an antiderivative of {expr} with respect to {x}"
        ))
    })
}

/// Definite integral over `[lower, upper]`.
///
/// Uses the fundamental theorem when a closed-form antiderivative exists,
/// splitting the interval at interior poles and taking one-sided limits at
/// every endpoint. An integral that diverges to one side is `oo` or `-oo`;
/// one that diverges both ways is an [`EngineError::Undefined`]. Without a
/// usable antiderivative it integrates numerically, which requires numeric
/// bounds (`oo` and `-oo` allowed).
pub fn integrate_definite(expr: &Expr, x: &Symbol, lower: &Expr, upper: &Expr) -> Result<Expr> {
    if lower == upper {
        return Ok(Expr::zero());
    }
    if lower.contains_undefined() || upper.contains_undefined() {
        return Err(EngineError::Undefined(format!(
            "cannot integrate over [{lower}, {upper}]"
        )));
    }
    let bounds = (bound_value(lower), bound_value(upper));
    if let (Some(lo), Some(hi)) = bounds {
        if lo > hi {
            return Ok(-integrate_definite(expr, x, upper, lower)?);
        }
    }

    let poles = match bounds {
        (Some(lo), Some(hi)) => singular_points(expr, x, lo, hi)?,
        _ => Vec::new(),
    };
    let mut edges = Vec::with_capacity(poles.len() + 2);
    edges.push(lower.clone());
    edges.extend(poles.iter().map(|(at, _)| at.clone()));
    edges.push(upper.clone());

    match antiderivative(expr, x, 0) {
        Some(anti) => match closed_form(&anti, x, &edges) {
            Ok(value) => return Ok(value),
            Err(EngineError::Unsupported(reason)) => {
                debug!(%anti, %reason, "could not evaluate the antiderivative, integrating numerically");
            }
            Err(err) => return Err(err),
        },
        None => debug!(%expr, "no closed-form antiderivative, integrating numerically"),
    }

    let (Some(lo), Some(hi)) = bounds else {
        return Err(EngineError::Unsupported(format!(
            "could not integrate {expr} in closed form and the bounds are not numeric"
        )));
    };
    if !expr.free_symbols().iter().all(|s| s == x) {
        return Err(EngineError::Unsupported(format!(
            "could not integrate {expr} in closed form and it depends on symbols other than {x}"
        )));
    }
    let mut cuts = vec![lo];
    cuts.extend(poles.iter().map(|(_, v)| *v));
    cuts.push(hi);
    let mut total = 0.0;
    for w in cuts.windows(2) {
        total += quadrature::integrate(|t| expr.eval_real_at(x, t), w[0], w[1])?;
    }
    Ok(Expr::float(total))
}

/// Sum of `F(b-) - F(a+)` over consecutive edges
fn closed_form(anti: &Expr, x: &Symbol, edges: &[Expr]) -> Result<Expr> {
    let mut finite = Vec::new();
    let mut divergent: Option<i8> = None;
    for w in edges.windows(2) {
        let top = at_bound(anti, x, &w[1], -1)?;
        let bottom = at_bound(anti, x, &w[0], 1)?;
        let piece = match (top, bottom) {
            (Limit::Finite(b), Limit::Finite(a)) => Limit::Finite(b - a),
            (Limit::Infinite(s), Limit::Finite(_)) => Limit::Infinite(s),
            (Limit::Finite(_), Limit::Infinite(s)) => Limit::Infinite(-s),
            (Limit::Infinite(s), Limit::Infinite(t)) if s == -t => Limit::Infinite(s),
            (Limit::Infinite(_), Limit::Infinite(_)) => return Err(diverges(anti, w)),
        };
        match piece {
            Limit::Finite(v) => finite.push(v),
            Limit::Infinite(s) => match divergent {
                Some(prev) if prev != s => return Err(diverges(anti, edges)),
                _ => divergent = Some(s),
            },
        }
    }
    Ok(match divergent {
        Some(s) if s < 0 => Expr::neg_infinity(),
        Some(_) => Expr::infinity(),
        None => Expr::sum(finite),
    })
}

fn diverges(anti: &Expr, edges: &[Expr]) -> EngineError {
    let (first, last) = (&edges[0], &edges[edges.len() - 1]);
    EngineError::Undefined(format!(
        "the integral diverges on [{first}, {last}] (antiderivative {anti} goes to both oo and -oo)"
    ))
}

/// `F(bound)`, or its one-sided limit when `F` is not finite there
fn at_bound(anti: &Expr, x: &Symbol, bound: &Expr, side: i8) -> Result<Limit> {
    let point = match bound.infinity_sign() {
        Some(s) => Point::Infinite(s),
        None => {
            let value = anti.substitute(x, bound);
            if value.is_finite_value() {
                return Ok(Limit::Finite(value));
            }
            Point::Finite {
                at: bound.clone(),
                side,
            }
        }
    };
    limit_at(anti, x, &point)
}

/// Real points strictly inside `(lo, hi)` where the integrand has a pole,
/// in increasing order with their numeric values
fn singular_points(expr: &Expr, x: &Symbol, lo: f64, hi: f64) -> Result<Vec<(Expr, f64)>> {
    let mut candidates = Vec::new();
    pole_candidates(expr, x, &mut candidates);

    let mut points: Vec<(Expr, f64)> = Vec::new();
    for c in candidates {
        let eq = Equation::new(c.clone(), Expr::zero());
        let members = match solveset(&eq, x, Domain::Reals) {
            Ok(SolutionSet::Finite(roots)) => roots,
            Ok(SolutionSet::Periodic(families)) => family_members(&families, lo, hi)?,
            Ok(SolutionSet::Empty | SolutionSet::Whole(_)) => Vec::new(),
            Err(err) => {
                debug!(%c, %err, "could not locate the zeros of a denominator");
                Vec::new()
            }
        };
        for m in members {
            let Some(v) = m.real_value() else { continue };
            let tol = 1e-12 * (1.0 + v.abs());
            if v - tol > lo && v + tol < hi && !points.iter().any(|(_, w)| (w - v).abs() <= tol) {
                points.push((m, v));
            }
        }
    }
    points.sort_by(|a, b| a.1.total_cmp(&b.1));
    Ok(points)
}

/// Expressions whose real zeros are poles of `e`
fn pole_candidates(e: &Expr, x: &Symbol, out: &mut Vec<Expr>) {
    if !e.has_symbol(x) {
        return;
    }
    match e {
        Expr::Add(ts) | Expr::Mul(ts) => ts.iter().for_each(|t| pole_candidates(t, x, out)),
        Expr::Pow(b, n) => {
            if n.as_number().is_some_and(|k| k.is_negative()) && b.has_symbol(x) {
                out.push(b.as_ref().clone());
            }
            pole_candidates(b, x, out);
            pole_candidates(n, x, out);
        }
        Expr::Func(f, u) => {
            match f {
                Func::Tan => out.push(Expr::apply(Func::Cos, u.as_ref().clone())),
                Func::Log => out.push(u.as_ref().clone()),
                _ => {}
            }
            pole_candidates(u, x, out);
        }
        _ => {}
    }
}

/// Members of periodic families that fall within `[lo, hi]`
fn family_members(families: &[Family], lo: f64, hi: f64) -> Result<Vec<Expr>> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(EngineError::Unsupported(
            "the integrand has infinitely many poles on an unbounded interval".to_string(),
        ));
    }
    let mut out = Vec::new();
    for f in families {
        let (Some(base), Some(period)) = (f.base.real_value(), f.period.real_value()) else {
            continue;
        };
        if period <= 0.0 {
            continue;
        }
        let first = ((lo - base) / period).floor() as i64;
        let last = ((hi - base) / period).ceil() as i64;
        if last - first > MAX_POLES {
            return Err(EngineError::Unsupported(format!(
                "the integrand has more than {MAX_POLES} poles on [{lo}, {hi}]"
            )));
        }
        for k in first..=last {
            out.push(f.period.clone() * Expr::int(k) + f.base.clone());
        }
    }
    Ok(out)
}

/// Real value of a bound, with `oo` and `-oo` mapped to infinities
fn bound_value(bound: &Expr) -> Option<f64> {
    match bound.infinity_sign() {
        Some(s) if s > 0 => Some(f64::INFINITY),
        Some(_) => Some(f64::NEG_INFINITY),
        None => bound.real_value(),
    }
}

/// `(a, c)` with `u = a*x + c` and `a != 0` free of `x`
pub(crate) fn linear_coeffs(u: &Expr, x: &Symbol) -> Option<(Expr, Expr)> {
    let a = derivative(u, x);
    if a.is_zero() || a.has_symbol(x) {
        return None;
    }
    let c = (u.clone() - a.clone() * Expr::symbol(x)).expand();
    if c.has_symbol(x) {
        return None;
    }
    Some((a, c))
}

fn antiderivative(e: &Expr, x: &Symbol, depth: usize) -> Option<Expr> {
    if depth > MAX_DEPTH {
        return None;
    }
    if !e.has_symbol(x) {
        return Some(e.clone() * Expr::symbol(x));
    }
    match e {
        Expr::Symbol(_) => Some(Expr::rational(1, 2) * Expr::power(e.clone(), Expr::int(2))),
        Expr::Add(ts) => ts
            .iter()
            .map(|t| antiderivative(t, x, depth + 1))
            .collect::<Option<Vec<_>>>()
            .map(Expr::sum),
        Expr::Mul(fs) => integrate_product(e, fs, x, depth),
        Expr::Pow(b, n) => integrate_power(e, b, n, x, depth),
        Expr::Func(f, u) => integrate_function(*f, u, x),
        _ => None,
    }
}

fn integrate_product(e: &Expr, fs: &[Expr], x: &Symbol, depth: usize) -> Option<Expr> {
    let (constant, dependent): (Vec<Expr>, Vec<Expr>) =
        fs.iter().cloned().partition(|f| !f.has_symbol(x));
    if !constant.is_empty() {
        let inner = antiderivative(&Expr::product(dependent), x, depth + 1)?;
        return Some(Expr::product(constant) * inner);
    }

    let expanded = e.expand();
    if matches!(expanded, Expr::Add(_)) && expanded != *e {
        return antiderivative(&expanded, x, depth + 1);
    }

    integrate_by_parts(fs, x, depth)
}

/// `∫ p(x) g(x) dx = p G - ∫ p' G dx` for polynomial `p` and an
/// exponential, sine or cosine `g` of a linear argument
fn integrate_by_parts(fs: &[Expr], x: &Symbol, depth: usize) -> Option<Expr> {
    let (poly, rest): (Vec<Expr>, Vec<Expr>) = fs.iter().cloned().partition(|f| match f {
        Expr::Symbol(_) => true,
        Expr::Pow(b, n) => {
            matches!(b.as_ref(), Expr::Symbol(s) if s == x)
                && n.as_integer().is_some_and(|k| k > 0)
        }
        _ => false,
    });
    if poly.is_empty() || rest.len() != 1 {
        return None;
    }
    let g = &rest[0];
    if !matches!(
        g,
        Expr::Func(Func::Exp | Func::Sin | Func::Cos | Func::Sinh | Func::Cosh, _)
    ) {
        return None;
    }

    let p = Expr::product(poly);
    let big_g = antiderivative(g, x, depth + 1)?;
    let dp = derivative(&p, x);
    let remainder = antiderivative(&(dp * big_g.clone()), x, depth + 1)?;
    Some(p * big_g - remainder)
}

fn integrate_power(e: &Expr, b: &Expr, n: &Expr, x: &Symbol, depth: usize) -> Option<Expr> {
    match (b.has_symbol(x), n.has_symbol(x)) {
        (true, false) => {
            if let Some((a, _)) = linear_coeffs(b, x) {
                if n.is_neg_one() {
                    return Some(Expr::apply(Func::Log, b.clone()) / a);
                }
                let n1 = n.clone() + Expr::one();
                return Some(Expr::power(b.clone(), n1.clone()) / (n1 * a));
            }
            if n.is_neg_one() {
                if let Some(r) = atan_form(b, x) {
                    return Some(r);
                }
            }
            if n.as_integer().is_some_and(|k| k > 1) {
                let expanded = e.expand();
                if expanded != *e {
                    return antiderivative(&expanded, x, depth + 1);
                }
            }
            None
        }
        (false, true) => {
            // a**u = exp(u*log(a))
            let (k, _) = linear_coeffs(n, x)?;
            Some(e.clone() / (Expr::apply(Func::Log, b.clone()) * k))
        }
        _ => None,
    }
}

/// `∫ 1/(p x² + q) dx = atan(x √(p/q)) / √(p q)` for positive `p`, `q`
fn atan_form(b: &Expr, x: &Symbol) -> Option<Expr> {
    let coeffs = b.polynomial_coeffs(x)?;
    if coeffs.len() != 3 || !coeffs[1].is_zero() {
        return None;
    }
    let (q, p) = (coeffs[0].as_number()?, coeffs[2].as_number()?);
    if !p.is_positive() || !q.is_positive() {
        return None;
    }
    let scale = Expr::sqrt(Expr::Number(p.clone() / q.clone()));
    let norm = Expr::sqrt(Expr::Number(p * q));
    Some(Expr::apply(Func::Atan, scale * Expr::symbol(x)) / norm)
}

fn integrate_function(f: Func, u: &Expr, x: &Symbol) -> Option<Expr> {
    let (a, _) = linear_coeffs(u, x)?;
    let core = match f {
        Func::Exp => Expr::apply(Func::Exp, u.clone()),
        Func::Sin => -Expr::apply(Func::Cos, u.clone()),
        Func::Cos => Expr::apply(Func::Sin, u.clone()),
        Func::Sinh => Expr::apply(Func::Cosh, u.clone()),
        Func::Cosh => Expr::apply(Func::Sinh, u.clone()),
        Func::Tan => -Expr::apply(Func::Log, Expr::apply(Func::Cos, u.clone())),
        Func::Log => u.clone() * Expr::apply(Func::Log, u.clone()) - u.clone(),
        _ => return None,
    };
    Some(core / a)
}
