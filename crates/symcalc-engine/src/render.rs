// crates/symcalc-engine/src/render.rs
// Text and LaTeX forms shared by expressions and solution sets

use crate::error::Result;
use crate::expr::{Expr, Symbol};
use crate::latex::{symbol_latex, to_latex};
use crate::solve::{Family, SolutionSet};

/// Anything that can be shown to a user as text and typeset as LaTeX
pub trait Render {
    fn text(&self) -> String;
    fn latex(&self) -> Result<String>;
}

impl Render for Expr {
    fn text(&self) -> String {
        self.to_string()
    }

    fn latex(&self) -> Result<String> {
        to_latex(self)
    }
}

/// Name of the integer parameter in periodic families
fn family_index() -> Symbol {
    Symbol::unchecked("_n")
}

impl Family {
    fn text(&self) -> String {
        format!("ImageSet(Lambda(_n, {}), Integers)", self.member(&family_index()))
    }

    fn latex(&self) -> Result<String> {
        let n = Symbol::unchecked("n");
        Ok(format!(
            "\\left\\{{{}\\; \\middle|\\; {} \\in \\mathbb{{Z}}\\right\\}}",
            to_latex(&self.member(&n))?,
            symbol_latex(n.name())
        ))
    }
}

impl Render for SolutionSet {
    fn text(&self) -> String {
        match self {
            SolutionSet::Empty => "EmptySet".to_string(),
            SolutionSet::Whole(domain) => domain.text().to_string(),
            SolutionSet::Finite(roots) => {
                let items: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
                format!("{{{}}}", items.join(", "))
            }
            SolutionSet::Periodic(families) => {
                let parts: Vec<String> = families.iter().map(Family::text).collect();
                if parts.len() == 1 {
                    parts.join("")
                } else {
                    format!("Union({})", parts.join(", "))
                }
            }
        }
    }

    fn latex(&self) -> Result<String> {
        match self {
            SolutionSet::Empty => Ok("\\emptyset".to_string()),
            SolutionSet::Whole(domain) => Ok(domain.latex().to_string()),
            SolutionSet::Finite(roots) => {
                let items = roots.iter().map(to_latex).collect::<Result<Vec<_>>>()?;
                Ok(format!("\\left\\{{{}\\right\\}}", items.join(", ")))
            }
            SolutionSet::Periodic(families) => {
                let parts = families
                    .iter()
                    .map(Family::latex)
                    .collect::<Result<Vec<_>>>()?;
                Ok(parts.join(" \\cup "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::Domain;

    #[test]
    fn test_finite_set() {
        let set = SolutionSet::Finite(vec![Expr::int(-2), Expr::int(2)]);
        assert_eq!(set.text(), "{-2, 2}");
        assert_eq!(set.latex().unwrap(), "\\left\\{-2, 2\\right\\}");
    }

    #[test]
    fn test_special_sets() {
        assert_eq!(SolutionSet::Empty.text(), "EmptySet");
        assert_eq!(SolutionSet::Empty.latex().unwrap(), "\\emptyset");
        assert_eq!(SolutionSet::Whole(Domain::Reals).text(), "Reals");
        assert_eq!(
            SolutionSet::Whole(Domain::Complexes).latex().unwrap(),
            "\\mathbb{C}"
        );
    }

    #[test]
    fn test_periodic_family() {
        let family = Family {
            base: Expr::zero(),
            period: Expr::int(2) * Expr::pi(),
        };
        let set = SolutionSet::Periodic(vec![family]);
        assert_eq!(set.text(), "ImageSet(Lambda(_n, 2*pi*_n), Integers)");
    }

    #[test]
    fn test_expression_render() {
        let e = Expr::rational(1, 2);
        assert_eq!(e.text(), "1/2");
        assert_eq!(e.latex().unwrap(), "\\frac{1}{2}");
    }
}
