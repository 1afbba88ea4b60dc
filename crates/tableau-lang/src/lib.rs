pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use ast::*;
pub use compiler::{solve, CompileError, Compiler};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, Parser};
