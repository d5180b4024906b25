//! A tree-walking interpreter for a small dynamically-typed scripting
//! language: source text is scanned into tokens, parsed into a syntax tree
//! and evaluated directly against a chain of lexical scopes.

/// Expression and statement syntax trees.
pub mod ast;
/// Variable scopes linked to their enclosing scope.
pub mod environment;
/// Scan, parse and runtime failures.
pub mod error;
/// Evaluates syntax trees and holds the runtime value type.
pub mod interpreter;
/// Wires scanner, parser and interpreter into one run.
pub mod lox;
/// Recursive-descent parser producing statements from tokens.
pub mod parser;
/// Prefix and source renderings of syntax trees.
pub mod printer;
/// Turns source text into tokens.
pub mod scanner;
pub mod token;

pub use error::{LoxError, ParseError, ParseErrors, RuntimeError, ScanError};
pub use interpreter::{Interpreter, RuntimeValue};
pub use lox::{parse, tokenize, Lox};
