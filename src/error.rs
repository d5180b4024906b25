use std::{fmt, io};

use thiserror::Error;

use crate::token::{Token, TokenType};

/// Failure raised while turning source text into tokens. Scanning stops at the
/// first one.
#[derive(Debug, Error, PartialEq)]
pub enum ScanError {
    #[error("[line {line}] Error: Unexpected character: {character}")]
    UnexpectedCharacter { character: char, line: usize },
    #[error("[line {line}] Error: Unterminated string.")]
    UnterminatedString { line: usize },
    #[error("[line {line}] Error: Malformed number '{lexeme}'.")]
    MalformedNumber { lexeme: String, line: usize },
}

impl ScanError {
    pub fn line(&self) -> usize {
        match self {
            ScanError::UnexpectedCharacter { line, .. }
            | ScanError::UnterminatedString { line }
            | ScanError::MalformedNumber { line, .. } => *line,
        }
    }
}

/// A syntax error found while parsing one declaration.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("{} Expect expression.", location(.token))]
    UnexpectedToken { token: Token },
    #[error("{} {message}", location(.token))]
    Expected { token: Token, message: &'static str },
    #[error("{} Invalid assignment target.", location(.equals))]
    InvalidAssignmentTarget { equals: Token },
}

impl ParseError {
    pub fn token(&self) -> &Token {
        match self {
            ParseError::UnexpectedToken { token } | ParseError::Expected { token, .. } => token,
            ParseError::InvalidAssignmentTarget { equals } => equals,
        }
    }
}

fn location(token: &Token) -> String {
    if token.token_type == TokenType::Eof {
        format!("[line {}] Error at end:", token.line)
    } else {
        format!("[line {}] Error at '{}':", token.line, token.lexeme)
    }
}

/// Every declaration-level error collected during one parse, in source order.
#[derive(Debug, PartialEq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    pub fn errors(&self) -> &[ParseError] {
        &self.0
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{}'.\n[line {}]", .name.lexeme, .name.line)]
    UndefinedVariable { name: Token },
    #[error("{message}\n[line {}]", .operator.line)]
    TypeMismatch {
        operator: Token,
        message: &'static str,
    },
    #[error("Could not write program output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    pub fn type_mismatch(operator: &Token, message: &'static str) -> RuntimeError {
        RuntimeError::TypeMismatch {
            operator: operator.clone(),
            message,
        }
    }

    /// The token the failure is attributed to, if it came from the program
    /// itself rather than the output sink.
    pub fn token(&self) -> Option<&Token> {
        match self {
            RuntimeError::UndefinedVariable { name } => Some(name),
            RuntimeError::TypeMismatch { operator, .. } => Some(operator),
            RuntimeError::Output(_) => None,
        }
    }
}

/// Any failure of a full scan, parse and interpret run.
#[derive(Debug, Error)]
pub enum LoxError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseErrors),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl LoxError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LoxError::Scan(_) | LoxError::Parse(_) => 65,
            LoxError::Runtime(_) => 70,
        }
    }
}
