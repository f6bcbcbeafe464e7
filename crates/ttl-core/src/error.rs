//! Error types for the 3TL core
//!
//! All fallible operations return `Result<T, Error>`.
//! Parsing fails atomically with a [`ParseError`] that carries the
//! location and the set of token kinds the grammar would have accepted.

use std::path::PathBuf;

use serde::Serialize;

use crate::parser::tokenizer::{Span, TokenKind};

/// Grammar violation at a specific source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error(
    "line {line}, column {column}: expected {}, found {found}",
    describe_expected(.expected)
)]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
    /// Token kinds acceptable at this point, in grammar order
    pub expected: Vec<TokenKind>,
    /// What was actually there
    pub found: String,
}

impl ParseError {
    pub fn new(span: &Span, expected: Vec<TokenKind>, found: impl Into<String>) -> Self {
        let mut unique: Vec<TokenKind> = Vec::with_capacity(expected.len());
        for kind in expected {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }

        ParseError {
            line: span.line,
            column: span.column,
            expected: unique,
            found: found.into(),
        }
    }

    /// Render the offending source line with a caret under the failing column
    ///
    /// ```text
    ///    2 | #@ id:uint, name
    ///      |                 ^
    /// ```
    pub fn snippet(&self, source: &str) -> String {
        let text = source
            .lines()
            .nth(self.line.saturating_sub(1))
            .unwrap_or("")
            .trim_end_matches('\r');
        let gutter = self.line.to_string().len().max(4);

        format!(
            "{:>width$} | {}\n{:>width$} | {}^",
            self.line,
            text,
            "",
            " ".repeat(self.column.saturating_sub(1)),
            width = gutter
        )
    }
}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let init: Vec<String> = init.iter().map(ToString::to_string).collect();
            format!("{} or {}", init.join(", "), last)
        }
    }
}

/// 3TL core error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input does not match the 3TL grammar
    #[error("Parse error at {0}")]
    Parse(#[from] ParseError),

    /// Source file could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for 3TL operations
pub type Result<T> = std::result::Result<T, Error>;
