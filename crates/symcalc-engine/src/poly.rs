// crates/symcalc-engine/src/poly.rs
// Expansion and polynomial coefficient extraction

use crate::expr::{Expr, Symbol};

/// Stop distributing products once a sum would exceed this many terms
const MAX_EXPANDED_TERMS: usize = 4096;
const MAX_EXPANDED_POWER: i64 = 32;
const MAX_DEGREE: usize = 256;

impl Expr {
    /// Distribute products over sums and multiply out small integer powers of sums
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Add(ts) => Expr::sum(ts.iter().map(Expr::expand).collect()),
            Expr::Mul(fs) => distribute(fs.iter().map(Expr::expand).collect()),
            Expr::Pow(b, e) => {
                let base = b.expand();
                match (e.as_integer(), &base) {
                    (Some(n), Expr::Add(_)) if (2..=MAX_EXPANDED_POWER).contains(&n) => {
                        let mut acc = base.clone();
                        for _ in 1..n {
                            acc = distribute(vec![acc, base.clone()]);
                        }
                        acc
                    }
                    _ => Expr::power(base, e.expand()),
                }
            }
            Expr::Func(f, a) => Expr::apply(*f, a.expand()),
            _ => self.clone(),
        }
    }

    /// Coefficients `[c0, c1, ..., cn]` if the expression is a polynomial in `x`
    pub fn polynomial_coeffs(&self, x: &Symbol) -> Option<Vec<Expr>> {
        let expanded = self.expand();
        let terms = match expanded {
            Expr::Add(ts) => ts,
            other => vec![other],
        };

        let mut buckets: Vec<Vec<Expr>> = Vec::new();
        for term in terms {
            let factors = match term {
                Expr::Mul(fs) => fs,
                other => vec![other],
            };
            let mut degree = 0usize;
            let mut rest = Vec::new();
            for f in factors {
                if !f.has_symbol(x) {
                    rest.push(f);
                    continue;
                }
                match &f {
                    Expr::Symbol(s) if s == x => degree += 1,
                    Expr::Pow(b, e) if matches!(b.as_ref(), Expr::Symbol(s) if s == x) => {
                        let n = usize::try_from(e.as_integer()?).ok()?;
                        degree += n;
                    }
                    _ => return None,
                }
            }
            if degree > MAX_DEGREE {
                return None;
            }
            if buckets.len() <= degree {
                buckets.resize_with(degree + 1, Vec::new);
            }
            buckets[degree].push(Expr::product(rest));
        }

        let mut coeffs: Vec<Expr> = buckets.into_iter().map(Expr::sum).collect();
        while coeffs.len() > 1 && coeffs.last().is_some_and(Expr::is_zero) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(Expr::zero());
        }
        Some(coeffs)
    }
}

/// Multiply a list of expanded factors term by term
fn distribute(factors: Vec<Expr>) -> Expr {
    let mut acc: Vec<Expr> = vec![Expr::one()];
    for factor in &factors {
        let terms: Vec<&Expr> = match factor {
            Expr::Add(ts) => ts.iter().collect(),
            other => vec![other],
        };
        if acc.len() * terms.len() > MAX_EXPANDED_TERMS {
            return Expr::product(factors);
        }
        acc = acc
            .iter()
            .flat_map(|a| terms.iter().map(move |t| Expr::product(vec![a.clone(), (*t).clone()])))
            .collect();
    }
    Expr::sum(acc)
}
