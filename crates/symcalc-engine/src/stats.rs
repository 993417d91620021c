// crates/symcalc-engine/src/stats.rs
// Closed-form moments of common probability distributions

use crate::error::{EngineError, Result};
use crate::expr::Expr;

/// A univariate distribution with symbolic parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// Continuous uniform on `[a, b]`
    Uniform { a: Expr, b: Expr },
    /// Normal with mean `mu` and standard deviation `sigma`
    Normal { mu: Expr, sigma: Expr },
    /// Bernoulli with success probability `p`
    Bernoulli { p: Expr },
}

impl Distribution {
    pub fn uniform(a: Expr, b: Expr) -> Result<Self> {
        if let (Some(lo), Some(hi)) = (a.real_value(), b.real_value()) {
            if lo >= hi {
                return Err(EngineError::Domain(format!(
                    "Uniform requires a < b, got a = {a} and b = {b}"
                )));
            }
        }
        Ok(Distribution::Uniform { a, b })
    }

    pub fn normal(mu: Expr, sigma: Expr) -> Result<Self> {
        if sigma.real_value().is_some_and(|s| s <= 0.0) {
            return Err(EngineError::Domain(format!(
                "standard deviation must be positive, got {sigma}"
            )));
        }
        Ok(Distribution::Normal { mu, sigma })
    }

    pub fn bernoulli(p: Expr) -> Result<Self> {
        if p.real_value().is_some_and(|v| !(0.0..=1.0).contains(&v)) {
            return Err(EngineError::Domain(format!(
                "probability must be between 0 and 1, got {p}"
            )));
        }
        Ok(Distribution::Bernoulli { p })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Uniform { .. } => "Uniform",
            Distribution::Normal { .. } => "Normal",
            Distribution::Bernoulli { .. } => "Bernoulli",
        }
    }

    /// E[X]
    pub fn expectation(&self) -> Expr {
        match self {
            Distribution::Uniform { a, b } => ((a.clone() + b.clone()) / Expr::int(2)).expand(),
            Distribution::Normal { mu, .. } => mu.clone(),
            Distribution::Bernoulli { p } => p.clone(),
        }
    }

    /// Var(X)
    pub fn variance(&self) -> Expr {
        match self {
            Distribution::Uniform { a, b } => {
                (Expr::power(b.clone() - a.clone(), Expr::int(2)) / Expr::int(12)).expand()
            }
            Distribution::Normal { sigma, .. } => Expr::power(sigma.clone(), Expr::int(2)),
            Distribution::Bernoulli { p } => (p.clone() * (Expr::one() - p.clone())).expand(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Symbol;

    #[test]
    fn test_uniform_moments() {
        let d = Distribution::uniform(Expr::zero(), Expr::one()).unwrap();
        assert_eq!(d.expectation(), Expr::rational(1, 2));
        assert_eq!(d.variance(), Expr::rational(1, 12));
    }

    #[test]
    fn test_normal_moments() {
        let d = Distribution::normal(Expr::int(3), Expr::int(2)).unwrap();
        assert_eq!(d.expectation(), Expr::int(3));
        assert_eq!(d.variance(), Expr::int(4));
    }

    #[test]
    fn test_bernoulli_moments() {
        let d = Distribution::bernoulli(Expr::rational(3, 10)).unwrap();
        assert_eq!(d.expectation(), Expr::rational(3, 10));
        assert_eq!(d.variance(), Expr::rational(21, 100));
    }

    #[test]
    fn test_symbolic_parameters() {
        let s = Expr::symbol(&Symbol::new("s").unwrap());
        let d = Distribution::normal(Expr::zero(), s.clone()).unwrap();
        assert_eq!(d.variance(), Expr::power(s, Expr::int(2)));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Distribution::uniform(Expr::one(), Expr::zero()).is_err());
        assert!(Distribution::normal(Expr::zero(), Expr::int(-1)).is_err());
        assert!(Distribution::bernoulli(Expr::int(2)).is_err());
    }
}
