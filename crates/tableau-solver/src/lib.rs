mod pivot;
mod problem;
mod simplex;
mod solution;
mod steps;
mod tableau;

pub use pivot::{entering_column, leaving_row, pivot, PivotRule};
pub use problem::{Constraint, ConstraintOp, LpProblem, Method, Objective, ProblemType};
pub use simplex::{SolveError, SolveResult, Solver};
pub use solution::{Solution, Variable};
pub use steps::{PivotInfo, Step, StepRecorder};
pub use tableau::{Matrix, Tableau, TableauKind};
