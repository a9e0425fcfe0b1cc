//! Centralised error hierarchy for the **KPL syntax checker**.
//!
//! The scanner, the lookahead cursor, the grammar rules and the file driver
//! all report failure through [`KplError`].  Syntax errors additionally carry a
//! structured [`Diagnostic`] so tooling can consume them without parsing text.
//!
//! The module **does not** print diagnostics itself.

use std::fmt;
use std::io;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::token::{Token, TokenType};

/// Category of a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The lookahead differs from the token the grammar requires here.
    MissingToken,
    InvalidConstant,
    InvalidType,
    InvalidStatement,
    InvalidComparator,
    InvalidFactor,

    /// Blocks, statements or expressions nested past the parser's limit.
    NestingTooDeep,
}

impl ErrorCategory {
    fn message(self) -> &'static str {
        match self {
            ErrorCategory::MissingToken => "Missing token",
            ErrorCategory::InvalidConstant => "Invalid constant",
            ErrorCategory::InvalidType => "Invalid type",
            ErrorCategory::InvalidStatement => "Invalid statement",
            ErrorCategory::InvalidComparator => "Invalid comparator",
            ErrorCategory::InvalidFactor => "Invalid factor",
            ErrorCategory::NestingTooDeep => "Nesting too deep",
        }
    }
}

/// Structured syntax error event: what was expected, what was found, where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: ErrorCategory,

    /// Only set for [`ErrorCategory::MissingToken`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<TokenType>,

    /// Kind of the offending lookahead token.
    pub found: TokenType,

    /// Lexeme of the offending lookahead token (empty at end of file).
    pub lexeme: String,

    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    /// Report `found` in place of the `expected` token.
    pub fn missing(expected: TokenType, found: &Token<'_>) -> Self {
        Self::at(ErrorCategory::MissingToken, Some(expected), found)
    }

    /// Report `found` as the start of an invalid construct.
    pub fn invalid(category: ErrorCategory, found: &Token<'_>) -> Self {
        Self::at(category, None, found)
    }

    fn at(category: ErrorCategory, expected: Option<TokenType>, found: &Token<'_>) -> Self {
        debug!(
            "Creating {:?} diagnostic at {}:{} (expected={:?}, found={:?})",
            category, found.line, found.column, expected, found.token_type
        );

        Self {
            category,
            expected,
            found: found.token_type,
            lexeme: found.lexeme.to_owned(),
            line: found.line,
            column: found.column,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}, column {}] Error: ", self.line, self.column)?;

        match self.expected {
            Some(expected) => write!(f, "Missing {}", expected.describe())?,
            None => f.write_str(self.category.message())?,
        }

        match self.found {
            TokenType::EOF => write!(f, " (found {})", TokenType::EOF.describe()),
            _ => write!(f, " (found '{}')", self.lexeme),
        }
    }
}

impl std::error::Error for Diagnostic {}

/// Canonical error type used throughout the checker.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KplError {
    /// Lexical (scanner) error with source position.
    #[error("[line {line}, column {column}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,

        /// 1‑based column where the offending lexeme starts.
        column: usize,
    },

    /// Syntactic (grammar) error.
    #[error(transparent)]
    Syntax(#[from] Diagnostic),

    /// The token source ran dry without ever yielding `EOF`.
    #[error("Token stream ended before the end-of-file marker")]
    Exhausted,

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl KplError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, column: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!(
            "Creating Lex error: line={}, column={}, msg={}",
            line, column, message
        );

        KplError::Lex {
            message,
            line,
            column,
        }
    }

    /// Short machine-readable label for structured output.
    pub fn category(&self) -> &'static str {
        match self {
            KplError::Lex { .. } => "lexical",
            KplError::Syntax(_) => "syntax",
            KplError::Exhausted => "token_stream",
            KplError::Io(_) => "io",
            KplError::Utf8(_) => "encoding",
        }
    }

    /// The structured diagnostic, when this is a syntax error.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            KplError::Syntax(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, KplError>;
