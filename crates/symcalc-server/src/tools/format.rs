// crates/symcalc-server/src/tools/format.rs
// Result formatting: canonical text plus an optional LaTeX line

use symcalc_engine::Render;
use tracing::debug;

/// Renders engine results for tool responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultFormatter {
    latex: bool,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self { latex: true }
    }
}

impl ResultFormatter {
    pub fn new(latex: bool) -> Self {
        Self { latex }
    }

    /// `text`, then `LaTeX: <typeset>` on its own line.
    ///
    /// Never fails: when typesetting is not possible only the text is returned.
    pub fn format<R: Render + ?Sized>(&self, value: &R) -> String {
        self.format_with_suffix(value, "")
    }

    /// Like [`format`](Self::format), with `suffix` appended to both forms
    pub fn format_with_suffix<R: Render + ?Sized>(&self, value: &R, suffix: &str) -> String {
        let text = format!("{}{}", value.text(), suffix);
        if !self.latex {
            return text;
        }
        match value.latex() {
            Ok(tex) => format!("{}\nLaTeX: {}{}", text, tex, suffix),
            Err(e) => {
                debug!(error = %e, "LaTeX rendering failed, returning text only");
                text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symcalc_engine::{Expr, SolutionSet};

    #[test]
    fn test_text_and_latex() {
        let formatter = ResultFormatter::default();
        let out = formatter.format(&Expr::rational(1, 2));
        assert_eq!(out, "1/2\nLaTeX: \\frac{1}{2}");
    }

    #[test]
    fn test_latex_disabled() {
        let formatter = ResultFormatter::new(false);
        assert_eq!(formatter.format(&Expr::rational(1, 2)), "1/2");
    }

    #[test]
    fn test_suffix_on_both_lines() {
        let formatter = ResultFormatter::default();
        let out = formatter.format_with_suffix(&Expr::int(3), " + C");
        assert_eq!(out, "3 + C\nLaTeX: 3 + C");
    }

    #[test]
    fn test_typeset_failure_falls_back_to_text() {
        let formatter = ResultFormatter::default();
        let out = formatter.format(&Expr::undefined());
        assert_eq!(out, "nan");
        assert!(!out.contains("LaTeX"));
    }

    #[test]
    fn test_solution_set() {
        let formatter = ResultFormatter::default();
        let out = formatter.format(&SolutionSet::Empty);
        assert_eq!(out, "EmptySet\nLaTeX: \\emptyset");
    }
}
