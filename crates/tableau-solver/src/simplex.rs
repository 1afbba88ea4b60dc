use log::{debug, warn};
use thiserror::Error;

use crate::pivot::{self, PivotRule};
use crate::problem::{ConstraintOp, LpProblem, Method};
use crate::solution::Solution;
use crate::steps::{PivotInfo, Step, StepRecorder};
use crate::tableau::{Tableau, TableauKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
    #[error("Row {row} has {found} coefficients but the problem has {expected} variables")]
    DimensionMismatch {
        row: String,
        expected: usize,
        found: usize,
    },
    #[error("Unbounded: no finite solution ({column} can increase without limit)")]
    Unbounded { column: String },
    #[error("No optimum after {0} iterations")]
    IterationLimit(usize),
    #[error("Unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
}

/// Everything a caller needs to present a solve: the answer and how it was reached
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub solution: Solution,
    /// Initial tableau followed by one entry per pivot
    pub steps: Vec<Step>,
    /// Column labels shared by every step's table
    pub columns: Vec<String>,
}

/// Tableau simplex solver
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    pivot_rule: PivotRule,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-8,
            pivot_rule: PivotRule::Dantzig,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_pivot_rule(mut self, rule: PivotRule) -> Self {
        self.pivot_rule = rule;
        self
    }

    /// Build the tableau for `method`, pivot to optimality and read the result
    pub fn solve(&self, problem: &LpProblem, method: Method) -> Result<SolveResult, SolveError> {
        let mut tableau = match method {
            Method::Primal => Tableau::primal(problem)?,
            Method::Dual => Tableau::dual(problem)?,
        };

        if tableau.kind() == TableauKind::Primal {
            self.warn_on_unsupported_basis(problem, &tableau);
        }

        debug!(
            "built {:?} tableau: {} rows x {} columns",
            tableau.kind(),
            tableau.num_rows(),
            tableau.num_cols()
        );

        let mut recorder = StepRecorder::new();
        recorder.record_initial(&tableau);

        self.run(&mut tableau, &mut recorder)?;

        let solution = Solution::extract(&tableau, problem, self.tolerance);
        debug!(
            "optimal after {} pivots: value = {}",
            recorder.len() - 1,
            solution.optimal_value
        );

        Ok(SolveResult {
            solution,
            steps: recorder.into_steps(),
            columns: tableau.columns().to_vec(),
        })
    }

    /// Pivot until no objective-row entry is negative
    fn run(&self, tableau: &mut Tableau, recorder: &mut StepRecorder) -> Result<(), SolveError> {
        for iteration in 0..self.max_iterations {
            let Some(col) = pivot::entering_column(
                &tableau.data,
                tableau.num_candidate_cols(),
                self.tolerance,
                self.pivot_rule,
            ) else {
                return Ok(());
            };

            let Some(row) = pivot::leaving_row(
                &tableau.data,
                col,
                self.tolerance,
                self.pivot_rule,
                &tableau.basis,
            ) else {
                return Err(SolveError::Unbounded {
                    column: tableau.columns[col].clone(),
                });
            };

            let info = PivotInfo {
                row,
                col,
                entering: tableau.columns[col].clone(),
                leaving: tableau.columns[tableau.basis[row]].clone(),
            };
            debug!(
                "iteration {}: pivot at ({}, {}), {} enters, {} leaves",
                iteration + 1,
                row,
                col,
                info.entering,
                info.leaving
            );

            pivot::pivot(&mut tableau.data, row, col);
            tableau.basis[row] = col;
            recorder.record_pivot(tableau, info);
        }

        // the cap only counts pivots; an optimal tableau at the cap is still optimal
        match pivot::entering_column(
            &tableau.data,
            tableau.num_candidate_cols(),
            self.tolerance,
            self.pivot_rule,
        ) {
            None => Ok(()),
            Some(_) => Err(SolveError::IterationLimit(self.max_iterations)),
        }
    }

    fn warn_on_unsupported_basis(&self, problem: &LpProblem, tableau: &Tableau) {
        if problem.constraints.iter().any(|c| c.op != ConstraintOp::Le) {
            warn!("primal tableau has >= or = rows; the slack basis may not be feasible");
        }
        if !tableau.is_basis_feasible(self.tolerance) {
            warn!("initial basis has a negative right-hand side; the result may not be feasible");
        }
    }
}
