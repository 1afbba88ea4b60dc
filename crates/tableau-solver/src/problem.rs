use std::fmt;
use std::str::FromStr;

use crate::SolveError;

/// Represents a linear programming problem with implicit non-negativity
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Decision variable names, in column order
    pub variables: Vec<String>,
    /// Objective function coefficients
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to maximize or minimize
    pub problem_type: ProblemType,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "=",
        };
        f.pad(s)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProblemType {
    #[default]
    Max,
    Min,
}

impl FromStr for ProblemType {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "maximize" => Ok(ProblemType::Max),
            "min" | "minimize" => Ok(ProblemType::Min),
            other => Err(SolveError::UnknownOption {
                kind: "problem type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemType::Max => f.pad("max"),
            ProblemType::Min => f.pad("min"),
        }
    }
}

/// Which tableau formulation to pivot on
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Standard tableau simplex on the problem as given
    #[default]
    Primal,
    /// Simplex on the dual problem built directly from the inputs
    Dual,
}

impl FromStr for Method {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primal" | "simplex" => Ok(Method::Primal),
            "dual" => Ok(Method::Dual),
            other => Err(SolveError::UnknownOption {
                kind: "method",
                value: other.to_string(),
            }),
        }
    }
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                problem_type: ProblemType::Max,
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, problem_type: ProblemType) {
        self.objective = Objective {
            coefficients,
            problem_type,
        };
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        coefficients: Vec<f64>,
        op: ConstraintOp,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Checks the problem is non-empty and every coefficient row fits the variable list
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.constraints.is_empty() {
            return Err(SolveError::EmptyInput("no constraints"));
        }
        if self.variables.is_empty() && self.objective.coefficients.is_empty() {
            return Err(SolveError::EmptyInput("empty objective"));
        }

        let n = self.num_variables();
        if self.objective.coefficients.len() > n {
            return Err(SolveError::DimensionMismatch {
                row: "objective".to_string(),
                expected: n,
                found: self.objective.coefficients.len(),
            });
        }
        for c in &self.constraints {
            if c.coefficients.len() > n {
                return Err(SolveError::DimensionMismatch {
                    row: c.name.clone(),
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
        }
        Ok(())
    }

    /// Objective coefficient for variable `j`, zero when the row is short
    pub(crate) fn objective_coefficient(&self, j: usize) -> f64 {
        self.objective.coefficients.get(j).copied().unwrap_or(0.0)
    }
}

impl Constraint {
    pub(crate) fn coefficient(&self, j: usize) -> f64 {
        self.coefficients.get(j).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_type_from_str() {
        assert_eq!("max".parse::<ProblemType>().unwrap(), ProblemType::Max);
        assert_eq!(" MIN ".parse::<ProblemType>().unwrap(), ProblemType::Min);
        assert!("maximum".parse::<ProblemType>().is_err());
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("simplex".parse::<Method>().unwrap(), Method::Primal);
        assert_eq!("Dual".parse::<Method>().unwrap(), Method::Dual);
        assert!("two-phase".parse::<Method>().is_err());
    }

    #[test]
    fn test_validate_empty_constraints() {
        let mut problem = LpProblem::new(vec!["x1".to_string()]);
        problem.set_objective(vec![1.0], ProblemType::Max);
        assert!(matches!(problem.validate(), Err(SolveError::EmptyInput(_))));
    }

    #[test]
    fn test_validate_dimension_mismatch() {
        let mut problem = LpProblem::new(vec!["x1".to_string()]);
        problem.set_objective(vec![1.0], ProblemType::Max);
        problem.add_constraint("c1", vec![1.0, 2.0], ConstraintOp::Le, 4.0);
        match problem.validate() {
            Err(SolveError::DimensionMismatch { row, expected, found }) => {
                assert_eq!(row, "c1");
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("Expected dimension mismatch, got {:?}", other),
        }
    }
}
