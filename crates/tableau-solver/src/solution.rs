use crate::problem::{LpProblem, ProblemType};
use crate::tableau::{Tableau, TableauKind};

/// A named variable and its value at the optimum
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: f64,
}

/// The result of reading a terminal tableau
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Optimal objective value, in the sense the problem was posed
    pub optimal_value: f64,
    /// Decision variables first, then slack (primal) or dual variables
    pub variables: Vec<Variable>,
    /// No infeasibility check is performed, so this is always `true`
    pub feasible: bool,
}

impl Solution {
    /// Value of the variable called `name`, if it was reported
    pub fn value(&self, name: &str) -> Option<f64> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value)
    }

    /// Read a terminal tableau back into named values.
    pub fn extract(tableau: &Tableau, problem: &LpProblem, tolerance: f64) -> Self {
        match tableau.kind() {
            TableauKind::Primal => extract_primal(tableau, problem, tolerance),
            TableauKind::Dual => extract_dual(tableau, problem, tolerance),
        }
    }
}

fn extract_primal(tableau: &Tableau, problem: &LpProblem, tolerance: f64) -> Solution {
    let values = basic_values(tableau, tolerance);

    let variables = tableau.columns()[..tableau.num_candidate_cols()]
        .iter()
        .zip(values)
        .map(|(name, value)| Variable {
            name: name.clone(),
            value: clean(value, tolerance),
        })
        .collect();

    // pivoting always maximizes the negative of a minimization
    let raw = tableau.objective_value();
    let optimal_value = match problem.objective.problem_type {
        ProblemType::Max => raw,
        ProblemType::Min => -raw,
    };

    Solution {
        optimal_value: clean(optimal_value, tolerance),
        variables,
        feasible: true,
    }
}

fn extract_dual(tableau: &Tableau, problem: &LpProblem, tolerance: f64) -> Solution {
    let m = tableau.n_structural;
    let n = tableau.n_auxiliary;
    let obj = &tableau.data()[tableau.objective_row()];

    // primal x_j is the objective-row entry under the dual slack s_j
    let mut variables: Vec<Variable> = problem
        .variables
        .iter()
        .enumerate()
        .take(n)
        .map(|(j, name)| Variable {
            name: name.clone(),
            value: clean(obj[m + j], tolerance),
        })
        .collect();

    let values = basic_values(tableau, tolerance);
    variables.extend(
        tableau.columns()[..m]
            .iter()
            .zip(values)
            .map(|(name, value)| Variable {
                name: name.clone(),
                value: clean(value, tolerance),
            }),
    );

    Solution {
        optimal_value: clean(tableau.objective_value(), tolerance),
        variables,
        feasible: true,
    }
}

/// Values of every candidate column, read off the rows where each is basic.
///
/// A column is basic in a row when it is a unit vector over the constraint
/// rows with its `1` in that row. When several columns qualify for the same
/// row, a structural column with a zero objective entry wins outright;
/// otherwise the smallest absolute objective entry wins, first column on ties.
fn basic_values(tableau: &Tableau, tolerance: f64) -> Vec<f64> {
    let data = tableau.data();
    let n_rows = tableau.num_constraint_rows();
    let n_candidates = tableau.num_candidate_cols();
    let obj = &data[tableau.objective_row()];
    let rhs = tableau.rhs_col();

    let mut values = vec![0.0; n_candidates];

    for row in 0..n_rows {
        let mut chosen: Option<usize> = None;
        let mut best = f64::INFINITY;

        for col in 0..n_candidates {
            if !is_unit_in_row(data, n_rows, row, col, tolerance) {
                continue;
            }
            let cost = obj[col].abs();
            if col < tableau.n_structural && cost < tolerance {
                chosen = Some(col);
                break;
            }
            if cost < best {
                best = cost;
                chosen = Some(col);
            }
        }

        if let Some(col) = chosen {
            values[col] = data[row][rhs];
        }
    }

    values
}

fn is_unit_in_row(data: &[Vec<f64>], n_rows: usize, row: usize, col: usize, tolerance: f64) -> bool {
    data[..n_rows].iter().enumerate().all(|(i, r)| {
        let expected = if i == row { 1.0 } else { 0.0 };
        (r[col] - expected).abs() < tolerance
    })
}

fn clean(value: f64, tolerance: f64) -> f64 {
    if value.abs() < tolerance { 0.0 } else { value }
}
