//! Scan error types.

use source_span::Span;
use thiserror::Error;

/// A problem found while scanning a stylesheet.
///
/// Scanning never stops on these; they are collected next to the rules so
/// the syntax checks can report them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ScanError {
    /// The kind of error.
    pub kind: ScanErrorKind,
    /// Where the problem is.
    pub span: Span,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of scan error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanErrorKind {
    /// A `{` without a matching `}`.
    #[error("unclosed block: `{prelude}` is never closed")]
    UnclosedBlock {
        /// The selector or at-rule prelude of the block.
        prelude: String,
    },

    /// A `}` with no open block.
    #[error("unexpected `}}` with no open block")]
    UnexpectedCloseBrace,

    /// A comment running to the end of the file.
    #[error("unterminated comment")]
    UnterminatedComment,

    /// A string cut off by a newline or the end of the file.
    #[error("unterminated string")]
    UnterminatedString,

    /// A rule with no declarations.
    #[error("empty rule: `{selector}` has no declarations")]
    EmptyRule {
        /// The selector of the empty rule.
        selector: String,
    },

    /// Two or more `;` in a row.
    #[error("duplicate semicolon")]
    DuplicateSemicolon,

    /// A declaration without a `:`.
    #[error("invalid declaration: `{text}`")]
    InvalidDeclaration {
        /// The text of the declaration.
        text: String,
    },
}

impl ScanErrorKind {
    /// Returns true for errors that change how the rest of the file scans.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ScanErrorKind::UnclosedBlock { .. }
                | ScanErrorKind::UnexpectedCloseBrace
                | ScanErrorKind::UnterminatedComment
                | ScanErrorKind::UnterminatedString
        )
    }
}
