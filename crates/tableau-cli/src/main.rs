use clap::{ArgAction, Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

use tableau_lang::Compiler;
use tableau_solver::{Method, PivotRule, ProblemType, SolveResult, Solver, Step};

#[derive(Parser)]
#[command(name = "tableau")]
#[command(about = "Tableau simplex solver that shows every pivot step", long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a linear program
    Solve {
        /// Objective expression, e.g. "3x1 + 5x2"
        objective: Option<String>,
        /// A constraint, e.g. "3x1 + 2x2 <= 18" (repeatable)
        #[arg(short, long = "constraint")]
        constraints: Vec<String>,
        /// max or min
        #[arg(short = 't', long = "type", default_value = "max")]
        problem_type: String,
        /// primal or dual
        #[arg(short, long, default_value = "primal")]
        method: String,
        /// JSON file with objective, constraints, problemType and method
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Print every tableau, not just the result
        #[arg(short, long)]
        steps: bool,
        /// Give up after this many pivots
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Use Bland's rule instead of the most negative entry
        #[arg(long)]
        bland: bool,
    },
    /// Show how an expression or constraint is parsed
    Parse {
        /// Expression or constraint, e.g. "-2.5x1 + x3" or "x1 + x2 <= 5"
        expression: String,
    },
}

/// Problem definition read from `--input`
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemFile {
    objective: String,
    constraints: Vec<String>,
    #[serde(default)]
    problem_type: ProblemType,
    #[serde(default)]
    method: Method,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            objective,
            constraints,
            problem_type,
            method,
            input,
            format,
            steps,
            max_iterations,
            bland,
        } => {
            let (objective, constraints, problem_type, method) = match input {
                Some(path) => {
                    let source = std::fs::read_to_string(&path)
                        .unwrap_or_else(|e| fail(format!("Error reading file: {}", e)));
                    let file: ProblemFile = serde_json::from_str(&source)
                        .unwrap_or_else(|e| fail(format!("Invalid problem file: {}", e)));
                    debug!("loaded problem from {}", path.display());
                    (file.objective, file.constraints, file.problem_type, file.method)
                }
                None => {
                    let objective = objective
                        .unwrap_or_else(|| fail("Missing objective (or pass --input)"));
                    let problem_type: ProblemType =
                        problem_type.parse().unwrap_or_else(|e| fail(e));
                    let method: Method = method.parse().unwrap_or_else(|e| fail(e));
                    (objective, constraints, problem_type, method)
                }
            };

            let mut solver = Solver::new();
            if let Some(max) = max_iterations {
                solver = solver.with_max_iterations(max);
            }
            if bland {
                solver = solver.with_pivot_rule(PivotRule::Bland);
            }

            let result = Compiler::new()
                .with_solver(solver)
                .solve(&objective, constraints.as_slice(), problem_type, method)
                .unwrap_or_else(|e| fail(format!("Error: {}", e)));

            if format == "json" {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => fail(format!("Error: {}", e)),
                }
                return;
            }

            println!("{} {}", problem_type, objective.trim());
            println!("subject to");
            for c in &constraints {
                println!("  {}", c.trim());
            }
            println!();

            if steps {
                print_steps(&result);
            }
            print_solution(&result, method);
        }
        Commands::Parse { expression } => {
            if expression.contains(|c: char| matches!(c, '<' | '>' | '=')) {
                match tableau_lang::Parser::parse_constraint(expression.trim()) {
                    Ok(c) => {
                        for var in c.lhs.variables() {
                            println!("  {:6} {:>10}", var.to_string(), c.lhs.coefficient(var));
                        }
                        println!("  {:6} {:>10}", c.op, c.rhs);
                    }
                    Err(e) => fail(e),
                }
            } else {
                let expr = tableau_lang::Parser::parse_expression(&expression);
                if expr.is_empty() {
                    println!("  (no terms)");
                }
                for var in expr.variables() {
                    println!("  {:6} {:>10}", var.to_string(), expr.coefficient(var));
                }
            }
        }
    }
}

fn print_steps(result: &SolveResult) {
    for (i, step) in result.steps.iter().enumerate() {
        match &step.pivot_info {
            None => println!("Initial tableau:"),
            Some(info) => println!(
                "Step {}: {} enters, {} leaves (row {}, column {})",
                i,
                info.entering,
                info.leaving,
                info.row + 1,
                info.col + 1
            ),
        }
        print_table(&result.columns, step);
        println!();
    }
}

fn print_table(columns: &[String], step: &Step) {
    print!("  {:>6}", "");
    for name in columns {
        print!(" {:>9}", name);
    }
    println!();

    let last = step.table.len().saturating_sub(1);
    for (i, row) in step.table.iter().enumerate() {
        let label = if i == last {
            ""
        } else {
            step.basis.get(i).map(String::as_str).unwrap_or("")
        };
        print!("  {:>6}", label);
        for value in row {
            // avoid printing -0.000
            let value = if value.abs() < 5e-4 { 0.0 } else { *value };
            print!(" {:>9.3}", value);
        }
        println!();
    }
}

fn print_solution(result: &SolveResult, method: Method) {
    let solution = &result.solution;
    println!("Status: OPTIMAL");
    println!("Pivots: {}", result.steps.len() - 1);
    println!("Optimal value: {:.4}", solution.optimal_value);
    println!();
    match method {
        Method::Primal => println!("Variables:"),
        Method::Dual => println!("Variables (primal, then dual):"),
    }
    for v in &solution.variables {
        println!("  {:6} {:12.4}", v.name, v.value);
    }
}
