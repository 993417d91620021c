// crates/symcalc-engine/src/diff.rs
// Symbolic differentiation

use crate::expr::{Expr, Func, Symbol};

/// The `order`-th derivative of `expr` with respect to `x`
pub fn diff(expr: &Expr, x: &Symbol, order: u32) -> Expr {
    let mut result = expr.clone();
    for _ in 0..order {
        result = derivative(&result, x);
        if result.is_zero() {
            break;
        }
    }
    result
}

pub(crate) fn derivative(e: &Expr, x: &Symbol) -> Expr {
    if !e.has_symbol(x) {
        return Expr::zero();
    }
    match e {
        Expr::Symbol(_) => Expr::one(),
        Expr::Add(ts) => Expr::sum(ts.iter().map(|t| derivative(t, x)).collect()),
        Expr::Mul(fs) => {
            // Product rule
            let mut terms = Vec::new();
            for (i, f) in fs.iter().enumerate() {
                let df = derivative(f, x);
                if df.is_zero() {
                    continue;
                }
                let mut factors = fs.clone();
                factors[i] = df;
                terms.push(Expr::product(factors));
            }
            Expr::sum(terms)
        }
        Expr::Pow(b, n) => {
            let (b, n) = (b.as_ref(), n.as_ref());
            match (b.has_symbol(x), n.has_symbol(x)) {
                // d(u^n) = n u^(n-1) du
                (true, false) => Expr::product(vec![
                    n.clone(),
                    Expr::power(b.clone(), n.clone() - Expr::one()),
                    derivative(b, x),
                ]),
                // d(a^v) = a^v log(a) dv
                (false, _) => Expr::product(vec![
                    e.clone(),
                    Expr::apply(Func::Log, b.clone()),
                    derivative(n, x),
                ]),
                // d(u^v) = u^v (v' log(u) + v u'/u)
                (true, true) => Expr::product(vec![
                    e.clone(),
                    Expr::sum(vec![
                        Expr::product(vec![derivative(n, x), Expr::apply(Func::Log, b.clone())]),
                        Expr::product(vec![
                            n.clone(),
                            derivative(b, x),
                            Expr::power(b.clone(), Expr::int(-1)),
                        ]),
                    ]),
                ]),
            }
        }
        Expr::Func(f, u) => Expr::product(vec![outer_derivative(*f, u), derivative(u, x)]),
        _ => Expr::zero(),
    }
}

/// f'(u) for each elementary function
fn outer_derivative(f: Func, u: &Expr) -> Expr {
    let u2 = || Expr::power(u.clone(), Expr::int(2));
    match f {
        Func::Sin => Expr::apply(Func::Cos, u.clone()),
        Func::Cos => -Expr::apply(Func::Sin, u.clone()),
        Func::Tan => Expr::one() + Expr::power(Expr::apply(Func::Tan, u.clone()), Expr::int(2)),
        Func::Asin => Expr::power(Expr::one() - u2(), Expr::rational(-1, 2)),
        Func::Acos => -Expr::power(Expr::one() - u2(), Expr::rational(-1, 2)),
        Func::Atan => Expr::power(Expr::one() + u2(), Expr::int(-1)),
        Func::Sinh => Expr::apply(Func::Cosh, u.clone()),
        Func::Cosh => Expr::apply(Func::Sinh, u.clone()),
        Func::Tanh => Expr::one() - Expr::power(Expr::apply(Func::Tanh, u.clone()), Expr::int(2)),
        Func::Exp => Expr::apply(Func::Exp, u.clone()),
        Func::Log => Expr::power(u.clone(), Expr::int(-1)),
        Func::Abs => u.clone() / Expr::apply(Func::Abs, u.clone()),
    }
}
