use log::trace;
use tableau_solver::ConstraintOp;
use thiserror::Error;

use crate::ast::*;
use crate::lexer::{Lexer, Span, Token, TokenKind};

/// A constraint string that cannot be split into `<expression> <op> <number>`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed constraint '{0}': expected one of <=, >=, =")]
    MissingOperator(String),
    #[error("Malformed constraint '{0}': more than one relational operator")]
    MultipleOperators(String),
    #[error("Malformed constraint '{constraint}': right-hand side '{rhs}' is not a number")]
    InvalidRhs { constraint: String, rhs: String },
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse a linear expression such as `3x1 - 2.5x2 + x4`.
    ///
    /// Never fails: terms that are not `[sign][number]x<n>` are skipped.
    pub fn parse_expression(source: &str) -> Expression {
        let mut parser = Parser::new(Lexer::tokenize(source));
        parser.expression()
    }

    /// Parse `<expression> <op> <number>` with exactly one of `<=`, `>=`, `=`.
    pub fn parse_constraint(source: &str) -> Result<ConstraintExpr, ParseError> {
        let tokens = Lexer::tokenize(source);
        let mut relations = tokens.iter().filter(|t| t.kind.is_relation());

        let Some(relation) = relations.next() else {
            return Err(ParseError::MissingOperator(source.to_string()));
        };
        if relations.next().is_some() {
            return Err(ParseError::MultipleOperators(source.to_string()));
        }

        let op = match relation.kind {
            TokenKind::Le => ConstraintOp::Le,
            TokenKind::Ge => ConstraintOp::Ge,
            _ => ConstraintOp::Eq,
        };

        let rhs_text = source[relation.span.end..].trim();
        let rhs = match rhs_text.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Err(ParseError::InvalidRhs {
                    constraint: source.to_string(),
                    rhs: rhs_text.to_string(),
                });
            }
        };

        let lhs = Parser::parse_expression(&source[..relation.span.start]);

        Ok(ConstraintExpr {
            span: Span::new(0, source.len()),
            lhs,
            op,
            rhs,
        })
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn expression(&mut self) -> Expression {
        let mut terms = Vec::new();
        while self.peek_kind() != TokenKind::Eof {
            if let Some(term) = self.term() {
                terms.push(term);
            }
        }
        Expression { terms }
    }

    /// One `sign* number? '*'? ident` term. Consumes at least one token.
    fn term(&mut self) -> Option<Term> {
        let start_pos = self.pos;
        let start = self.current()?.span;
        let mut sign = 1.0;

        while matches!(self.peek_kind(), TokenKind::Plus | TokenKind::Minus) {
            if self.peek_kind() == TokenKind::Minus {
                sign = -sign;
            }
            self.advance();
        }

        let mut magnitude = None;
        if self.peek_kind() == TokenKind::Number {
            magnitude = self.advance().and_then(|t| t.text.parse::<f64>().ok());
            if self.peek_kind() == TokenKind::Star {
                self.advance();
            }
        }

        if self.peek_kind() == TokenKind::Ident {
            let token = self.advance()?.clone();
            if magnitude.is_some_and(|m: f64| !m.is_finite()) {
                trace!("skipping term with out-of-range coefficient for '{}'", token.text);
                return None;
            }
            return match token.text.parse::<Var>() {
                Ok(var) => Some(Term {
                    span: start.merge(token.span),
                    coefficient: sign * magnitude.unwrap_or(1.0),
                    var,
                }),
                Err(()) => {
                    trace!("skipping term with unknown variable '{}'", token.text);
                    None
                }
            };
        }

        if self.pos == start_pos {
            let token = self.advance()?;
            trace!("skipping unexpected token '{}'", token.text);
        } else {
            // a constant or a dangling sign
            trace!("skipping term without a variable at {:?}", start);
        }
        None
    }
}
