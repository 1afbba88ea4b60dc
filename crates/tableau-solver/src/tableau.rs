use crate::problem::{ConstraintOp, LpProblem, ProblemType};
use crate::SolveError;

/// Dense tableau matrix, one `Vec` per row
pub type Matrix = Vec<Vec<f64>>;

/// Which formulation a tableau was built from
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableauKind {
    Primal,
    Dual,
}

/// A simplex tableau.
///
/// Rows are the structural rows followed by the objective row. Columns are the
/// structural variables, the auxiliary (slack) variables, the bookkeeping
/// column (`Z` or `p`) and finally the RHS. Column order is fixed at
/// construction; pivoting only changes the numeric entries and the basis.
#[derive(Debug, Clone)]
pub struct Tableau {
    pub(crate) data: Matrix,
    /// Basic column for each structural row
    pub(crate) basis: Vec<usize>,
    /// Label for every column, including bookkeeping and RHS
    pub(crate) columns: Vec<String>,
    pub(crate) kind: TableauKind,
    pub(crate) n_structural: usize,
    pub(crate) n_auxiliary: usize,
}

impl Tableau {
    /// Build the standard-form tableau for the problem as given.
    ///
    /// One slack per constraint (`+1` for `<=`, `-1` for `>=`, none for `=`).
    /// The objective row holds the objective coefficients negated when
    /// maximizing, so pivoting always proceeds as a minimization of the
    /// negative. The all-slack basis is assumed to be feasible.
    pub fn primal(problem: &LpProblem) -> Result<Self, SolveError> {
        problem.validate()?;

        let n = problem.num_variables();
        let m = problem.num_constraints();
        let total_cols = n + m + 2;
        let rhs_col = total_cols - 1;

        let mut data = vec![vec![0.0; total_cols]; m + 1];

        for (i, c) in problem.constraints.iter().enumerate() {
            for j in 0..n {
                data[i][j] = c.coefficient(j);
            }
            match c.op {
                ConstraintOp::Le => data[i][n + i] = 1.0,
                ConstraintOp::Ge => data[i][n + i] = -1.0,
                ConstraintOp::Eq => {}
            }
            data[i][rhs_col] = c.rhs;
        }

        let sign = match problem.objective.problem_type {
            ProblemType::Max => -1.0,
            ProblemType::Min => 1.0,
        };
        for j in 0..n {
            // 0.0 * -1.0 would leave a -0 in the initial table
            let coef = problem.objective_coefficient(j);
            data[m][j] = if coef == 0.0 { 0.0 } else { sign * coef };
        }
        data[m][n + m] = 1.0;

        let mut columns = problem.variables.clone();
        columns.extend((1..=m).map(|i| format!("s{}", i)));
        columns.push("Z".to_string());
        columns.push("RHS".to_string());

        Ok(Self {
            data,
            basis: (n..n + m).collect(),
            columns,
            kind: TableauKind::Primal,
            n_structural: n,
            n_auxiliary: m,
        })
    }

    /// Build the tableau of the dual problem directly.
    ///
    /// Each primal variable `x_j` becomes a row `sum_i a_ij * y_i + s_j = c_j`
    /// and each constraint `i` becomes a dual variable `y_i` whose objective
    /// row entry is `-b_i`. Operators and the problem type are not consulted:
    /// the inputs are read as `min c.x` subject to `Ax >= b`.
    pub fn dual(problem: &LpProblem) -> Result<Self, SolveError> {
        problem.validate()?;

        let n = problem.num_variables();
        let m = problem.num_constraints();
        let total_cols = m + n + 2;
        let rhs_col = total_cols - 1;

        let mut data = vec![vec![0.0; total_cols]; n + 1];

        for j in 0..n {
            for (i, c) in problem.constraints.iter().enumerate() {
                data[j][i] = c.coefficient(j);
            }
            data[j][m + j] = 1.0;
            data[j][rhs_col] = problem.objective_coefficient(j);
        }

        for (i, c) in problem.constraints.iter().enumerate() {
            data[n][i] = if c.rhs == 0.0 { 0.0 } else { -c.rhs };
        }
        data[n][m + n] = 1.0;

        let mut columns: Vec<String> = (1..=m).map(|i| format!("y{}", i)).collect();
        columns.extend((1..=n).map(|j| format!("s{}", j)));
        columns.push("p".to_string());
        columns.push("RHS".to_string());

        Ok(Self {
            data,
            basis: (m..m + n).collect(),
            columns,
            kind: TableauKind::Dual,
            n_structural: m,
            n_auxiliary: n,
        })
    }

    pub fn kind(&self) -> TableauKind {
        self.kind
    }

    pub fn data(&self) -> &Matrix {
        &self.data
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Labels of the basic variables, one per structural row
    pub fn basis_labels(&self) -> Vec<String> {
        self.basis.iter().map(|&c| self.columns[c].clone()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.data.len()
    }

    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    /// Number of structural (constraint) rows
    pub fn num_constraint_rows(&self) -> usize {
        self.data.len() - 1
    }

    pub fn objective_row(&self) -> usize {
        self.data.len() - 1
    }

    pub fn rhs_col(&self) -> usize {
        self.columns.len() - 1
    }

    /// Columns eligible to enter the basis: everything before the bookkeeping column
    pub fn num_candidate_cols(&self) -> usize {
        self.n_structural + self.n_auxiliary
    }

    pub fn objective_value(&self) -> f64 {
        self.data[self.objective_row()][self.rhs_col()]
    }

    /// Whether the current basic solution has a non-negative RHS in every row
    pub fn is_basis_feasible(&self, tolerance: f64) -> bool {
        let rhs = self.rhs_col();
        self.data[..self.num_constraint_rows()]
            .iter()
            .all(|row| row[rhs] >= -tolerance)
    }

    /// Deep copy of the matrix for step recording
    pub fn snapshot(&self) -> Matrix {
        self.data.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook() -> LpProblem {
        let mut problem = LpProblem::new(vec!["x1".to_string(), "x2".to_string()]);
        problem.set_objective(vec![3.0, 5.0], ProblemType::Max);
        problem.add_constraint("c1", vec![1.0, 0.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("c2", vec![0.0, 2.0], ConstraintOp::Le, 12.0);
        problem.add_constraint("c3", vec![3.0, 2.0], ConstraintOp::Le, 18.0);
        problem
    }

    #[test]
    fn test_primal_shape_and_layout() {
        let tableau = Tableau::primal(&textbook()).unwrap();
        assert_eq!(tableau.num_rows(), 4);
        assert_eq!(tableau.num_cols(), 2 + 3 + 2);
        assert_eq!(tableau.columns(), &["x1", "x2", "s1", "s2", "s3", "Z", "RHS"]);
        assert_eq!(tableau.data()[2], vec![3.0, 2.0, 0.0, 0.0, 1.0, 0.0, 18.0]);
        assert_eq!(tableau.data()[3], vec![-3.0, -5.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(tableau.basis_labels(), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn test_primal_minimize_keeps_sign() {
        let mut problem = textbook();
        problem.objective.problem_type = ProblemType::Min;
        let tableau = Tableau::primal(&problem).unwrap();
        assert_eq!(&tableau.data()[3][..2], &[3.0, 5.0]);
    }

    #[test]
    fn test_primal_slack_signs() {
        let mut problem = LpProblem::new(vec!["x1".to_string()]);
        problem.set_objective(vec![1.0], ProblemType::Max);
        problem.add_constraint("le", vec![1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("ge", vec![1.0], ConstraintOp::Ge, 1.0);
        problem.add_constraint("eq", vec![1.0], ConstraintOp::Eq, 2.0);
        let tableau = Tableau::primal(&problem).unwrap();
        assert_eq!(&tableau.data()[0][1..4], &[1.0, 0.0, 0.0]);
        assert_eq!(&tableau.data()[1][1..4], &[0.0, -1.0, 0.0]);
        assert_eq!(&tableau.data()[2][1..4], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dual_shape_and_layout() {
        let tableau = Tableau::dual(&textbook()).unwrap();
        // n + 1 rows, m + n + 2 columns
        assert_eq!(tableau.num_rows(), 3);
        assert_eq!(tableau.num_cols(), 3 + 2 + 2);
        assert_eq!(tableau.columns(), &["y1", "y2", "y3", "s1", "s2", "p", "RHS"]);
        assert_eq!(tableau.data()[0], vec![1.0, 0.0, 3.0, 1.0, 0.0, 0.0, 3.0]);
        assert_eq!(tableau.data()[1], vec![0.0, 2.0, 2.0, 0.0, 1.0, 0.0, 5.0]);
        assert_eq!(tableau.data()[2], vec![-4.0, -12.0, -18.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(tableau.basis_labels(), vec!["s1", "s2"]);
    }

    #[test]
    fn test_empty_constraints_rejected() {
        let mut problem = LpProblem::new(vec!["x1".to_string()]);
        problem.set_objective(vec![1.0], ProblemType::Max);
        assert!(matches!(Tableau::primal(&problem), Err(SolveError::EmptyInput(_))));
        assert!(matches!(Tableau::dual(&problem), Err(SolveError::EmptyInput(_))));
    }

    #[test]
    fn test_basis_feasibility() {
        let mut problem = textbook();
        assert!(Tableau::primal(&problem).unwrap().is_basis_feasible(1e-8));
        problem.constraints[0].rhs = -1.0;
        assert!(!Tableau::primal(&problem).unwrap().is_basis_feasible(1e-8));
    }
}
