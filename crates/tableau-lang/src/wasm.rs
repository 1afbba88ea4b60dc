//! WASM bindings for the tableau solver
//!
//! The browser form turns its coefficient fields into an objective string and
//! a list of constraint strings; these functions hand back everything needed
//! to render the result and each pivot step.

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::compiler::Compiler;
use crate::lexer::{Lexer, TokenKind};
use crate::parser::Parser;
use tableau_solver::{Method, ProblemType};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Solve and return `{ solution, steps, columns }` as a JS object
#[wasm_bindgen]
pub fn solve(
    objective: &str,
    constraints: Array,
    problem_type: &str,
    method: &str,
) -> Result<JsValue, JsValue> {
    let constraints =
        constraint_list(constraints.iter().map(|v| v.as_string())).map_err(to_js_error)?;
    let problem_type: ProblemType = problem_type.parse().map_err(to_js_error)?;
    let method: Method = method.parse().map_err(to_js_error)?;

    let result = Compiler::new()
        .solve(objective, constraints.as_slice(), problem_type, method)
        .map_err(to_js_error)?;

    serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
}

/// Every entry must be a string; the position of the first one that is not is reported
fn constraint_list(
    entries: impl IntoIterator<Item = Option<String>>,
) -> Result<Vec<String>, String> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| entry.ok_or_else(|| format!("Constraint {}: expected a string", i + 1)))
        .collect()
}

#[derive(serde::Serialize)]
struct TermInfo {
    variable: String,
    coefficient: f64,
}

/// Coefficients of a linear expression, one entry per distinct variable
#[wasm_bindgen]
pub fn parse_expression(source: &str) -> Result<JsValue, JsValue> {
    let expr = Parser::parse_expression(source);
    let terms: Vec<TermInfo> = expr
        .variables()
        .into_iter()
        .map(|v| TermInfo {
            variable: v.to_string(),
            coefficient: expr.coefficient(v),
        })
        .collect();
    serde_wasm_bindgen::to_value(&terms).map_err(to_js_error)
}

#[derive(serde::Serialize, Debug, PartialEq)]
struct Diagnostic {
    message: String,
    start: usize,
    end: usize,
}

fn diagnose(source: &str) -> Option<Diagnostic> {
    let e = Parser::parse_constraint(source).err()?;
    // highlight the operators and stray characters
    let relations: Vec<_> = Lexer::tokenize(source)
        .into_iter()
        .filter(|t| t.kind.is_relation() || t.kind == TokenKind::Error)
        .collect();
    let (start, end) = match (relations.first(), relations.last()) {
        (Some(first), Some(last)) => (first.span.start, last.span.end),
        _ => (0, source.len()),
    };
    Some(Diagnostic {
        message: e.to_string(),
        start,
        end,
    })
}

/// Check one constraint string; returns `null` when it is well formed
#[wasm_bindgen]
pub fn validate_constraint(source: &str) -> JsValue {
    match diagnose(source) {
        None => JsValue::NULL,
        Some(diagnostic) => serde_wasm_bindgen::to_value(&diagnostic)
            .unwrap_or_else(|_| JsValue::from_str(&diagnostic.message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_list_rejects_non_strings() {
        let entries = vec![Some("x1 <= 4".to_string()), None, Some("x2 <= 1".to_string())];
        assert_eq!(
            constraint_list(entries),
            Err("Constraint 2: expected a string".to_string())
        );

        let entries = vec![Some("x1 <= 4".to_string()), Some("x2 <= 1".to_string())];
        assert_eq!(constraint_list(entries).unwrap().len(), 2);
    }

    #[test]
    fn test_diagnose() {
        assert_eq!(diagnose("x1 + x2 <= 5"), None);

        let diagnostic = diagnose("0 <= x1 <= 5").unwrap();
        assert_eq!((diagnostic.start, diagnostic.end), (2, 10));
        assert!(diagnostic.message.starts_with("Malformed constraint"));

        let diagnostic = diagnose("x1 + x2").unwrap();
        assert_eq!((diagnostic.start, diagnostic.end), (0, 7));
    }
}
