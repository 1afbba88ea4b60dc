use std::collections::BTreeSet;

use log::debug;
use tableau_solver::{LpProblem, Method, ProblemType, SolveError, SolveResult, Solver};
use thiserror::Error;

use crate::ast::*;
use crate::Parser;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
    #[error("Constraint {index}: {source}")]
    Parse {
        /// 1-based position in the constraint list
        index: usize,
        #[source]
        source: crate::ParseError,
    },
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Turns objective and constraint strings into a coefficient-array [`LpProblem`]
pub struct Compiler {
    solver: Solver,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
        }
    }

    /// Use a configured solver for [`Compiler::solve`]
    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    /// Parse the inputs and lay them out as dense coefficient rows.
    ///
    /// Columns are the union of every variable named in the objective and the
    /// constraints, ascending by suffix. Constraints are named `c1..cm`.
    pub fn compile<S: AsRef<str>>(
        &self,
        objective: &str,
        constraints: &[S],
        problem_type: ProblemType,
    ) -> Result<LpProblem, CompileError> {
        let objective = objective.trim();
        if objective.is_empty() {
            return Err(CompileError::EmptyInput("empty objective"));
        }
        if constraints.is_empty() {
            return Err(CompileError::EmptyInput("no constraints"));
        }

        let objective = Parser::parse_expression(objective);
        let parsed = constraints
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Parser::parse_constraint(c.as_ref().trim())
                    .map_err(|source| CompileError::Parse { index: i + 1, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut vars: BTreeSet<Var> = objective.variables().into_iter().collect();
        for c in &parsed {
            vars.extend(c.lhs.variables());
        }
        let vars: Vec<Var> = vars.into_iter().collect();

        let mut problem = LpProblem::new(vars.iter().map(|v| v.to_string()).collect());
        problem.set_objective(coefficients(&objective, &vars), problem_type);
        for (i, c) in parsed.iter().enumerate() {
            problem.add_constraint(format!("c{}", i + 1), coefficients(&c.lhs, &vars), c.op, c.rhs);
        }

        debug!(
            "compiled {} problem: {} variables, {} constraints",
            problem_type,
            problem.num_variables(),
            problem.num_constraints()
        );

        Ok(problem)
    }

    /// Compile and solve with the configured solver
    pub fn solve<S: AsRef<str>>(
        &self,
        objective: &str,
        constraints: &[S],
        problem_type: ProblemType,
        method: Method,
    ) -> Result<SolveResult, CompileError> {
        let problem = self.compile(objective, constraints, problem_type)?;
        Ok(self.solver.solve(&problem, method)?)
    }
}

/// Solve `objective` subject to `constraints` with default solver settings
pub fn solve<S: AsRef<str>>(
    objective: &str,
    constraints: &[S],
    problem_type: ProblemType,
    method: Method,
) -> Result<SolveResult, CompileError> {
    Compiler::new().solve(objective, constraints, problem_type, method)
}

fn coefficients(expr: &Expression, vars: &[Var]) -> Vec<f64> {
    vars.iter().map(|&v| expr.coefficient(v)).collect()
}
