use std::fmt;
use std::str::FromStr;

use tableau_solver::ConstraintOp;

use crate::lexer::Span;

/// A decision variable `x<n>`, identified by its positive numeric suffix.
///
/// Ordering follows the suffix, so `x2 < x10`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(pub u32);

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl FromStr for Var {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('x').ok_or(())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(());
        }
        match digits.parse::<u32>() {
            Ok(0) | Err(_) => Err(()),
            Ok(n) => Ok(Var(n)),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub span: Span,
    pub coefficient: f64,
    pub var: Var,
}

/// A linear expression: a sum of signed terms
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    pub terms: Vec<Term>,
}

impl Expression {
    /// Distinct variables, ascending by suffix
    pub fn variables(&self) -> Vec<Var> {
        let mut vars: Vec<Var> = self.terms.iter().map(|t| t.var).collect();
        vars.sort();
        vars.dedup();
        vars
    }

    /// Signed coefficient of `var`; zero when absent, summed over repeated terms
    pub fn coefficient(&self, var: Var) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.var == var)
            .map(|t| t.coefficient)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// `<expression> <op> <number>`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintExpr {
    pub span: Span,
    pub lhs: Expression,
    pub op: ConstraintOp,
    pub rhs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_from_str() {
        assert_eq!("x1".parse::<Var>(), Ok(Var(1)));
        assert_eq!("x12".parse::<Var>(), Ok(Var(12)));
        assert!("x0".parse::<Var>().is_err());
        assert!("x".parse::<Var>().is_err());
        assert!("y1".parse::<Var>().is_err());
        assert!("x1a".parse::<Var>().is_err());
        assert!("x+1".parse::<Var>().is_err());
    }

    #[test]
    fn test_var_ordering_is_numeric() {
        let mut vars = vec![Var(10), Var(2), Var(1)];
        vars.sort();
        assert_eq!(vars, vec![Var(1), Var(2), Var(10)]);
        assert_eq!(Var(10).to_string(), "x10");
    }
}
