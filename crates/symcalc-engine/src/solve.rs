// crates/symcalc-engine/src/solve.rs
// Equation solving over the reals or the complexes

use crate::error::{EngineError, Result};
use crate::expr::{Expr, Func, Symbol};
use crate::integrate::linear_coeffs;
use crate::number::Number;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive};
use std::fmt;

/// Nested inversions (log of exp of ...) deeper than this are rejected
const MAX_DEPTH: usize = 8;
/// Largest constant term whose divisors are searched for rational roots
const MAX_ROOT_SEARCH: i64 = 1_000_000_000_000;

/// Where solutions are sought
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Reals,
    Complexes,
}

impl Domain {
    pub fn text(&self) -> &'static str {
        match self {
            Domain::Reals => "Reals",
            Domain::Complexes => "Complexes",
        }
    }

    pub fn latex(&self) -> &'static str {
        match self {
            Domain::Reals => "\\mathbb{R}",
            Domain::Complexes => "\\mathbb{C}",
        }
    }
}

/// `lhs = rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }

    /// `lhs - rhs`, whose zeros are the solutions
    pub fn residual(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Eq({}, {})", self.lhs, self.rhs)
    }
}

/// `{ base + n*period : n ∈ ℤ }`
#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    pub base: Expr,
    pub period: Expr,
}

impl Family {
    /// The family member for the integer parameter `n`
    pub fn member(&self, n: &Symbol) -> Expr {
        self.period.clone() * Expr::symbol(n) + self.base.clone()
    }
}

/// The set of values satisfying an equation
#[derive(Debug, Clone, PartialEq)]
pub enum SolutionSet {
    Empty,
    Finite(Vec<Expr>),
    Periodic(Vec<Family>),
    Whole(Domain),
}

/// Solve `eq` for `x` within `domain`
pub fn solveset(eq: &Equation, x: &Symbol, domain: Domain) -> Result<SolutionSet> {
    solve_zero(&eq.residual(), x, domain, 0).map_err(|e| match e {
        EngineError::Unsupported(msg) if msg.is_empty() => EngineError::Unsupported(format!(
            "no solution method for {eq} with respect to {x}"
        )),
        other => other,
    })
}

fn unsupported() -> EngineError {
    EngineError::Unsupported(String::new())
}

/// Solve `f = 0`
fn solve_zero(f: &Expr, x: &Symbol, domain: Domain, depth: usize) -> Result<SolutionSet> {
    if depth > MAX_DEPTH {
        return Err(unsupported());
    }
    let f = f.expand();
    if f.contains_undefined() {
        return Err(EngineError::Undefined(format!("{f} is not a number")));
    }

    if !f.has_symbol(x) {
        if f.is_zero() {
            return Ok(SolutionSet::Whole(domain));
        }
        if f.is_symbol_free() {
            return Ok(SolutionSet::Empty);
        }
        return Err(EngineError::Unsupported(format!(
            "equation does not involve {x}"
        )));
    }

    if let Some(coeffs) = f.polynomial_coeffs(x) {
        return solve_polynomial(&coeffs, domain).map(finite);
    }
    if let Some(roots) = solve_rational(&f, x, domain)? {
        return Ok(finite(roots));
    }
    if let Some(set) = solve_by_inversion(&f, x, domain, depth)? {
        return Ok(set);
    }
    Err(unsupported())
}

fn finite(roots: Vec<Expr>) -> SolutionSet {
    if roots.is_empty() {
        SolutionSet::Empty
    } else {
        SolutionSet::Finite(roots)
    }
}

// ============================================================================
// Polynomials
// ============================================================================

/// Roots of `c0 + c1 x + ... + cn x^n`, filtered to the domain, sorted, deduplicated
fn solve_polynomial(coeffs: &[Expr], domain: Domain) -> Result<Vec<Expr>> {
    let degree = coeffs.len().saturating_sub(1);
    if degree == 0 {
        return Ok(Vec::new());
    }

    let exact: Option<Vec<Number>> = coeffs
        .iter()
        .map(|c| c.as_number().filter(Number::is_exact))
        .collect();

    let roots = match (exact, degree) {
        (Some(nums), d) if d > 2 => rational_polynomial_roots(nums)?,
        (_, 1) => vec![-coeffs[0].clone() / coeffs[1].clone()],
        (_, 2) => quadratic(&coeffs[2], &coeffs[1], &coeffs[0]),
        (_, d) => {
            return Err(EngineError::Unsupported(format!(
                "polynomial equations of degree {d} with non-rational coefficients are not supported"
            )));
        }
    };
    Ok(finalize_roots(roots, domain))
}

fn quadratic(a: &Expr, b: &Expr, c: &Expr) -> Vec<Expr> {
    if let Some(roots) = float_quadratic(a, b, c) {
        return roots;
    }
    let disc = (Expr::power(b.clone(), Expr::int(2))
        - Expr::int(4) * a.clone() * c.clone())
    .expand();
    let root = Expr::sqrt(disc);
    let denom = Expr::int(2) * a.clone();
    vec![
        ((-b.clone() - root.clone()) / denom.clone()).expand(),
        ((-b.clone() + root) / denom).expand(),
    ]
}

/// Real roots of a float quadratic as `q/a` and `c/q`, so the smaller root
/// does not cancel away
fn float_quadratic(a: &Expr, b: &Expr, c: &Expr) -> Option<Vec<Expr>> {
    let nums = [a.as_number()?, b.as_number()?, c.as_number()?];
    if nums.iter().all(Number::is_exact) {
        return None;
    }
    let [a, b, c] = nums.map(|n| n.to_f64());
    let disc = b * b - 4.0 * a * c;
    if !disc.is_finite() || disc < 0.0 || a == 0.0 || b == 0.0 {
        return None;
    }
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    Some(vec![Expr::float(q / a), Expr::float(c / q)])
}

/// Exact roots of a polynomial with rational coefficients (ascending order)
fn rational_polynomial_roots(mut p: Vec<Number>) -> Result<Vec<Expr>> {
    let mut roots = Vec::new();

    while p.len() > 1 && p[0].is_zero() {
        roots.push(Expr::zero());
        p.remove(0);
    }

    if p.len() > 3 {
        if let Some(ints) = integer_coefficients(&p) {
            let (a0, an) = (ints[0], ints[ints.len() - 1]);
            for r in rational_candidates(a0, an) {
                while p.len() > 3 && horner(&p, &r).is_zero() {
                    p = deflate(&p, &r);
                    roots.push(Expr::Number(r.clone()));
                }
                if p.len() <= 3 {
                    break;
                }
            }
        }
    }

    let as_expr = |n: &Number| Expr::Number(n.clone());
    match p.len().saturating_sub(1) {
        0 => {}
        1 => roots.push(Expr::Number(-p[0].clone() / p[1].clone())),
        2 => roots.extend(quadratic(&as_expr(&p[2]), &as_expr(&p[1]), &as_expr(&p[0]))),
        n => roots.extend(solve_reduced(&p, n)?),
    }
    Ok(roots)
}

/// Polynomials in `x^g` (biquadratics, `x^n = c`) reduce to lower degree in `y = x^g`
fn solve_reduced(p: &[Number], degree: usize) -> Result<Vec<Expr>> {
    let g = p
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, c)| !c.is_zero())
        .map(|(i, _)| i)
        .fold(0, gcd_usize);
    if g <= 1 {
        return Err(EngineError::Unsupported(format!(
            "could not find closed-form roots of a degree-{degree} polynomial"
        )));
    }

    let reduced: Vec<Number> = p.iter().step_by(g).cloned().collect();
    let mut roots = Vec::new();
    for y in rational_polynomial_roots(reduced)? {
        roots.extend(nth_roots(&y, g)?);
    }
    Ok(roots)
}

/// All complex `n`-th roots of `c`
fn nth_roots(c: &Expr, n: usize) -> Result<Vec<Expr>> {
    if c.is_zero() {
        return Ok(vec![Expr::zero()]);
    }
    let Some(q) = c.as_number().filter(Number::is_exact) else {
        if n == 2 {
            let r = Expr::sqrt(c.clone());
            return Ok(vec![-r.clone(), r]);
        }
        return Err(EngineError::Unsupported(format!(
            "could not take {n}-th roots of {c}"
        )));
    };

    let n_i64 = i64::try_from(n).map_err(|_| unsupported())?;
    let magnitude = Expr::power(Expr::Number(q.abs()), Expr::rational(1, n_i64));
    let offset = if q.is_negative() { 1 } else { 0 };
    let mut out = Vec::with_capacity(n);
    for k in 0..n_i64 {
        // angle = (offset + 2k) * pi / n
        let angle = Number::rational(offset + 2 * k, n_i64);
        let unit = unit_root(angle);
        out.push((magnitude.clone() * unit).expand());
    }
    Ok(out)
}

/// `cos(c*pi) + I*sin(c*pi)`
fn unit_root(c: Number) -> Expr {
    let theta = Expr::Number(c) * Expr::pi();
    Expr::apply(Func::Cos, theta.clone()) + Expr::i() * Expr::apply(Func::Sin, theta)
}

fn gcd_usize(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd_usize(b, a % b) }
}

/// Coefficients scaled to integers, `None` if any is not exact or the
/// scaled values do not fit in `i64`
fn integer_coefficients(p: &[Number]) -> Option<Vec<i64>> {
    let ratios: Vec<&BigRational> = p.iter().map(Number::as_ratio).collect::<Option<_>>()?;
    let lcm = ratios
        .iter()
        .fold(BigInt::one(), |acc, r| acc.lcm(r.denom()));
    ratios
        .iter()
        .map(|r| (r.numer() * (&lcm / r.denom())).to_i64())
        .collect()
}

fn divisors(n: i64) -> Vec<i64> {
    let n = n.abs();
    let mut out = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            out.push(d);
            if d != n / d {
                out.push(n / d);
            }
        }
        d += 1;
    }
    out
}

/// `±p/q` with `p | a0` and `q | an`
fn rational_candidates(a0: i64, an: i64) -> Vec<Number> {
    if a0 == 0 || an == 0 || a0.abs() > MAX_ROOT_SEARCH || an.abs() > MAX_ROOT_SEARCH {
        return Vec::new();
    }
    let mut out: Vec<Number> = Vec::new();
    for p in divisors(a0) {
        for q in divisors(an) {
            for r in [Number::rational(p, q), Number::rational(-p, q)] {
                if !out.contains(&r) {
                    out.push(r);
                }
            }
        }
    }
    out.sort_by(|a, b| a.cmp_value(b));
    out
}

fn horner(p: &[Number], r: &Number) -> Number {
    p.iter()
        .rev()
        .fold(Number::int(0), |acc, c| acc * r.clone() + c.clone())
}

/// Divide by `(x - r)`, dropping the remainder
fn deflate(p: &[Number], r: &Number) -> Vec<Number> {
    let mut quotient = Vec::with_capacity(p.len() - 1);
    let mut acc = Number::int(0);
    for c in p.iter().rev() {
        acc = acc * r.clone() + c.clone();
        quotient.push(acc.clone());
    }
    quotient.pop();
    quotient.reverse();
    quotient
}

fn numeric(e: &Expr) -> Option<Complex64> {
    if !e.is_symbol_free() || e.contains_infinity() {
        return None;
    }
    e.eval_complex(&[]).ok()
}

fn finalize_roots(roots: Vec<Expr>, domain: Domain) -> Vec<Expr> {
    let mut kept: Vec<Expr> = roots
        .into_iter()
        .filter(|r| match domain {
            Domain::Complexes => true,
            Domain::Reals => !r.is_symbol_free() || r.real_value().is_some(),
        })
        .collect();

    kept.sort_by(|a, b| match (numeric(a), numeric(b)) {
        (Some(za), Some(zb)) => za
            .re
            .total_cmp(&zb.re)
            .then_with(|| za.im.total_cmp(&zb.im)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp_canonical(b),
    });

    let mut out: Vec<Expr> = Vec::with_capacity(kept.len());
    for r in kept {
        let duplicate = out.iter().any(|s| {
            *s == r
                || matches!((numeric(s), numeric(&r)), (Some(a), Some(b))
                    if (a - b).norm() <= 1e-12 * (1.0 + a.norm()))
        });
        if !duplicate {
            out.push(r);
        }
    }
    out
}

// ============================================================================
// Rational equations
// ============================================================================

/// Multiply through by every denominator in `x`, solve the numerator, and
/// drop roots where a denominator vanishes
fn solve_rational(f: &Expr, x: &Symbol, domain: Domain) -> Result<Option<Vec<Expr>>> {
    let terms: Vec<Expr> = match f {
        Expr::Add(ts) => ts.clone(),
        other => vec![other.clone()],
    };

    let mut denominators: Vec<(Expr, i64)> = Vec::new();
    for term in &terms {
        let factors = match term {
            Expr::Mul(fs) => fs.as_slice(),
            other => std::slice::from_ref(other),
        };
        for factor in factors {
            let Expr::Pow(b, e) = factor else { continue };
            let Some(k) = e.as_integer().filter(|k| *k < 0) else {
                continue;
            };
            if !b.has_symbol(x) {
                continue;
            }
            match denominators.iter_mut().find(|(d, _)| d == b.as_ref()) {
                Some((_, m)) => *m = (*m).max(-k),
                None => denominators.push((b.as_ref().clone(), -k)),
            }
        }
    }
    if denominators.is_empty() {
        return Ok(None);
    }

    let clearing: Vec<Expr> = denominators
        .iter()
        .map(|(b, k)| Expr::power(b.clone(), Expr::int(*k)))
        .collect();
    let numerator = Expr::sum(
        terms
            .iter()
            .map(|t| {
                let mut factors = vec![t.clone()];
                factors.extend(clearing.iter().cloned());
                Expr::product(factors).expand()
            })
            .collect(),
    );
    let Some(coeffs) = numerator.polynomial_coeffs(x) else {
        return Ok(None);
    };

    let roots = solve_polynomial(&coeffs, domain)?;
    Ok(Some(
        roots
            .into_iter()
            .filter(|r| {
                denominators.iter().all(|(b, _)| {
                    let at = b.substitute(x, r);
                    !at.is_zero() && numeric(&at).is_none_or(|z| z.norm() > 1e-12)
                })
            })
            .collect(),
    ))
}

// ============================================================================
// Inverse functions
// ============================================================================

/// Solve `k * g(u) + c = 0` for a single invertible `g`
fn solve_by_inversion(
    f: &Expr,
    x: &Symbol,
    domain: Domain,
    depth: usize,
) -> Result<Option<SolutionSet>> {
    let terms: Vec<Expr> = match f {
        Expr::Add(ts) => ts.clone(),
        other => vec![other.clone()],
    };
    let (dependent, independent): (Vec<Expr>, Vec<Expr>) =
        terms.into_iter().partition(|t| t.has_symbol(x));
    let [term] = dependent.as_slice() else {
        return Ok(None);
    };

    let factors = match term {
        Expr::Mul(fs) => fs.clone(),
        other => vec![other.clone()],
    };
    let (inner, scale): (Vec<Expr>, Vec<Expr>) =
        factors.into_iter().partition(|f| f.has_symbol(x));
    let [g] = inner.as_slice() else {
        return Ok(None);
    };
    let target = -Expr::sum(independent) / Expr::product(scale);

    match g {
        Expr::Func(Func::Exp, u) => invert_exponential(u, None, &target, x, domain, depth).map(Some),
        Expr::Pow(b, u) if !b.has_symbol(x) => {
            invert_exponential(u, Some(b.as_ref()), &target, x, domain, depth).map(Some)
        }
        Expr::Func(Func::Log, u) => {
            if domain == Domain::Reals && target.is_symbol_free() && target.real_value().is_none() {
                return Ok(Some(SolutionSet::Empty));
            }
            let residual = u.as_ref().clone() - Expr::apply(Func::Exp, target);
            solve_zero(&residual, x, domain, depth + 1).map(Some)
        }
        Expr::Func(f @ (Func::Sin | Func::Cos | Func::Tan), u) => {
            invert_trig(*f, u, &target, x, domain).map(Some)
        }
        Expr::Pow(b, q) => invert_root(b, q, &target, x, domain, depth),
        _ => Ok(None),
    }
}

/// `base**u = target`, with `base = E` when `None`
fn invert_exponential(
    u: &Expr,
    base: Option<&Expr>,
    target: &Expr,
    x: &Symbol,
    domain: Domain,
    depth: usize,
) -> Result<SolutionSet> {
    if target.is_zero() {
        return Ok(SolutionSet::Empty);
    }
    let principal = match base {
        None => Expr::apply(Func::Log, target.clone()),
        Some(b) => log_ratio(target, b),
    };

    match domain {
        Domain::Reals => {
            if target.is_symbol_free() && !target.real_value().is_some_and(|v| v > 0.0) {
                return Ok(SolutionSet::Empty);
            }
            solve_zero(&(u.clone() - principal), x, domain, depth + 1)
        }
        Domain::Complexes => {
            let (a, c) = linear_coeffs(u, x).ok_or_else(unsupported)?;
            let log_base = base
                .map(|b| Expr::apply(Func::Log, b.clone()))
                .unwrap_or_else(Expr::one);
            let period = Expr::int(2) * Expr::pi() * Expr::i() / (log_base * a.clone());
            let family = Family {
                base: ((principal - c) / a).expand(),
                period: period.expand(),
            };
            Ok(SolutionSet::Periodic(vec![family]))
        }
    }
}

/// `log(t)/log(b)`, exact when `t` is an integer power of `b`
fn log_ratio(t: &Expr, b: &Expr) -> Expr {
    if let (Some((tn, 1)), Some((bn, 1))) = (
        t.as_number().and_then(|n| n.as_rational()),
        b.as_number().and_then(|n| n.as_rational()),
    ) {
        if bn > 1 && tn > 0 {
            let guess = ((tn as f64).ln() / (bn as f64).ln()).round() as i64;
            if Number::int(bn).pow_int(guess) == Some(Number::int(tn)) {
                return Expr::int(guess);
            }
        }
    }
    Expr::apply(Func::Log, t.clone()) / Expr::apply(Func::Log, b.clone())
}

fn invert_trig(
    f: Func,
    u: &Expr,
    target: &Expr,
    x: &Symbol,
    domain: Domain,
) -> Result<SolutionSet> {
    if domain == Domain::Reals && target.is_symbol_free() {
        match target.real_value() {
            None => return Ok(SolutionSet::Empty),
            Some(v) if f != Func::Tan && v.abs() > 1.0 + 1e-12 => return Ok(SolutionSet::Empty),
            _ => {}
        }
    }

    let two_pi = Expr::int(2) * Expr::pi();
    let raw = match f {
        Func::Sin => {
            let s = Expr::apply(Func::Asin, target.clone());
            vec![(s.clone(), two_pi.clone()), (Expr::pi() - s, two_pi)]
        }
        Func::Cos => {
            let c = Expr::apply(Func::Acos, target.clone());
            vec![(c.clone(), two_pi.clone()), (-c, two_pi)]
        }
        _ => vec![(Expr::apply(Func::Atan, target.clone()), Expr::pi())],
    };

    let (a, c) = linear_coeffs(u, x).ok_or_else(unsupported)?;
    let mut families: Vec<Family> = Vec::new();
    for (base, period) in raw {
        let mut period = (period / a.clone()).expand();
        if period.real_value().is_some_and(|v| v < 0.0) {
            period = -period;
        }
        let family = Family {
            base: ((base - c.clone()) / a.clone()).expand(),
            period,
        };
        if !families.iter().any(|g| same_family(g, &family)) {
            families.push(family);
        }
    }
    Ok(SolutionSet::Periodic(families))
}

/// Two families coincide when their bases differ by a whole number of periods
fn same_family(a: &Family, b: &Family) -> bool {
    if a.period != b.period {
        return false;
    }
    let shift = (a.base.clone() - b.base.clone()) / a.period.clone();
    match shift.real_value() {
        Some(v) => (v - v.round()).abs() < 1e-12,
        None => shift.is_zero(),
    }
}

/// `b**(1/n) = target` gives `b = target**n`, keeping only roots that check out
fn invert_root(
    b: &Expr,
    q: &Expr,
    target: &Expr,
    x: &Symbol,
    domain: Domain,
    depth: usize,
) -> Result<Option<SolutionSet>> {
    let Some((1, n)) = q.as_number().and_then(|n| n.as_rational()) else {
        return Ok(None);
    };
    if n < 2 {
        return Ok(None);
    }
    if domain == Domain::Reals && n % 2 == 0 && target.real_value().is_some_and(|v| v < 0.0) {
        return Ok(Some(SolutionSet::Empty));
    }

    let residual = b.clone() - Expr::power(target.clone(), Expr::int(n));
    let set = solve_zero(&residual, x, domain, depth + 1)?;
    let SolutionSet::Finite(candidates) = set else {
        return Ok(Some(set));
    };

    let root = Expr::power(b.clone(), q.clone());
    let checked: Vec<Expr> = candidates
        .into_iter()
        .filter(|r| {
            let diff = root.substitute(x, r) - target.clone();
            match numeric(&diff) {
                Some(z) => z.norm() <= 1e-9,
                None => true,
            }
        })
        .collect();
    Ok(Some(finite(checked)))
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

    fn sq(e: Expr) -> Expr {
        Expr::power(e, Expr::int(2))
    }

    fn solve(lhs: Expr, rhs: Expr, domain: Domain) -> SolutionSet {
        solveset(&Equation::new(lhs, rhs), &x(), domain).unwrap()
    }

    #[test]
    fn test_quadratic_integer_roots() {
        let set = solve(sq(xe()) - Expr::int(4), Expr::zero(), Domain::Reals);
        assert_eq!(set, SolutionSet::Finite(vec![Expr::int(-2), Expr::int(2)]));
    }

    #[test]
    fn test_quadratic_with_large_coefficients() {
        let poly = sq(xe()) - Expr::int(10_000_000_000) * xe() + Expr::one();
        let SolutionSet::Finite(roots) = solve(poly.clone(), Expr::zero(), Domain::Reals) else {
            panic!("expected finitely many roots");
        };
        assert_eq!(roots.len(), 2);
        for r in &roots {
            assert!(!r.is_zero());
            assert!(poly.substitute(&x(), r).expand().is_zero(), "{r}");
        }
        let big = roots[1].real_value().unwrap();
        assert!((big - 1e10).abs() < 1.0, "{big}");
    }

    #[test]
    fn test_float_quadratic_keeps_small_root() {
        let poly = Expr::float(1.5) * sq(xe()) - Expr::float(1.5e10) * xe() + Expr::float(1.5);
        let set = solve(poly, Expr::zero(), Domain::Reals);
        assert_eq!(
            set,
            SolutionSet::Finite(vec![Expr::float(1e-10), Expr::float(1e10)])
        );
    }

    #[test]
    fn test_no_real_roots() {
        let set = solve(sq(xe()) + Expr::one(), Expr::zero(), Domain::Reals);
        assert_eq!(set, SolutionSet::Empty);
    }

    #[test]
    fn test_complex_roots() {
        let set = solve(sq(xe()) + Expr::one(), Expr::zero(), Domain::Complexes);
        assert_eq!(set, SolutionSet::Finite(vec![-Expr::i(), Expr::i()]));
    }

    #[test]
    fn test_irrational_roots() {
        let set = solve(sq(xe()), Expr::int(2), Domain::Reals);
        let r = Expr::sqrt(Expr::int(2));
        assert_eq!(set, SolutionSet::Finite(vec![-r.clone(), r]));
    }

    #[test]
    fn test_cubic_rational_roots() {
        // (x - 1)(x - 2)(x + 3) = x^3 - 7x + 6
        let e = Expr::power(xe(), Expr::int(3)) - Expr::int(7) * xe() + Expr::int(6);
        let set = solve(e, Expr::zero(), Domain::Reals);
        assert_eq!(
            set,
            SolutionSet::Finite(vec![Expr::int(-3), Expr::int(1), Expr::int(2)])
        );
    }

    #[test]
    fn test_biquadratic() {
        // x^4 - 5x^2 + 4 has roots ±1, ±2
        let e = Expr::power(xe(), Expr::int(4)) - Expr::int(5) * sq(xe()) + Expr::int(4);
        let set = solve(e, Expr::zero(), Domain::Reals);
        assert_eq!(
            set,
            SolutionSet::Finite(vec![Expr::int(-2), Expr::int(-1), Expr::int(1), Expr::int(2)])
        );
    }

    #[test]
    fn test_cube_roots_of_unity() {
        let e = Expr::power(xe(), Expr::int(3)) - Expr::one();
        match solve(e.clone(), Expr::zero(), Domain::Complexes) {
            SolutionSet::Finite(roots) => assert_eq!(roots.len(), 3),
            other => panic!("expected three roots, got {other:?}"),
        }
        assert_eq!(
            solve(e, Expr::zero(), Domain::Reals),
            SolutionSet::Finite(vec![Expr::one()])
        );
    }

    #[test]
    fn test_identity_and_contradiction() {
        assert_eq!(solve(xe(), xe(), Domain::Reals), SolutionSet::Whole(Domain::Reals));
        assert_eq!(solve(xe() + Expr::one(), xe(), Domain::Reals), SolutionSet::Empty);
    }

    #[test]
    fn test_exponential_over_reals() {
        let set = solve(Expr::power(Expr::int(2), xe()), Expr::int(8), Domain::Reals);
        assert_eq!(set, SolutionSet::Finite(vec![Expr::int(3)]));
        let none = solve(Expr::apply(Func::Exp, xe()), Expr::int(-1), Domain::Reals);
        assert_eq!(none, SolutionSet::Empty);
    }

    #[test]
    fn test_exponential_over_complexes() {
        let set = solve(Expr::apply(Func::Exp, xe()), Expr::one(), Domain::Complexes);
        match set {
            SolutionSet::Periodic(families) => {
                assert_eq!(families.len(), 1);
                assert_eq!(families[0].base, Expr::zero());
            }
            other => panic!("expected a periodic family, got {other:?}"),
        }
    }

    #[test]
    fn test_log_equation() {
        let set = solve(Expr::apply(Func::Log, xe()), Expr::one(), Domain::Reals);
        assert_eq!(set, SolutionSet::Finite(vec![Expr::e()]));
    }

    #[test]
    fn test_sine_families() {
        let set = solve(Expr::apply(Func::Sin, xe()), Expr::rational(1, 2), Domain::Reals);
        match set {
            SolutionSet::Periodic(families) => {
                assert_eq!(families.len(), 2);
                assert_eq!(families[0].base, Expr::rational(1, 6) * Expr::pi());
                assert_eq!(families[1].base, Expr::rational(5, 6) * Expr::pi());
            }
            other => panic!("expected periodic families, got {other:?}"),
        }
        let none = solve(Expr::apply(Func::Sin, xe()), Expr::int(2), Domain::Reals);
        assert_eq!(none, SolutionSet::Empty);
    }

    #[test]
    fn test_rational_equation_drops_poles() {
        // x/(x - 1) = 1/(x - 1) has no solution since x = 1 is a pole
        let d = Expr::power(xe() - Expr::one(), Expr::int(-1));
        let set = solve(xe() * d.clone(), d, Domain::Reals);
        assert_eq!(set, SolutionSet::Empty);

        let set = solve(Expr::one() / xe(), Expr::int(2), Domain::Reals);
        assert_eq!(set, SolutionSet::Finite(vec![Expr::rational(1, 2)]));
    }

    #[test]
    fn test_square_root_equation() {
        let set = solve(Expr::sqrt(xe()), Expr::int(3), Domain::Reals);
        assert_eq!(set, SolutionSet::Finite(vec![Expr::int(9)]));
        let none = solve(Expr::sqrt(xe()), Expr::int(-1), Domain::Reals);
        assert_eq!(none, SolutionSet::Empty);
    }

    #[test]
    fn test_unsupported_equation() {
        let e = Expr::apply(Func::Sin, xe()) - xe();
        let err = solveset(&Equation::new(e, Expr::zero()), &x(), Domain::Reals).unwrap_err();
        assert!(matches!(err, EngineError::Unsupported(_)));
        assert!(err.to_string().contains("no solution method"));
    }
}
