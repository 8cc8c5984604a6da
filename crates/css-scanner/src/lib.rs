//! Stylesheet and template scanner for css-audit.
//!
//! This crate provides:
//! - Lexer (tokenizer) for stylesheet text using `logos`
//! - A tolerant rule scanner that recovers from malformed input
//! - Selector helpers for class-oriented questions
//! - A regex-based template scanner for class attributes and buttons
//!
//! It is not a CSS parser: there is no cascade, specificity or value
//! grammar. Rules, declarations and their at-rule context are what the
//! audit needs, and that is all this crate produces.
//!
//! # Example
//!
//! ```
//! use css_scanner::scan;
//!
//! let result = scan(".glass-card { backdrop-filter: blur(10px); }");
//! assert!(result.errors.is_empty());
//!
//! let rule = &result.stylesheet.rules[0];
//! assert!(rule.defines_class("glass-card"));
//! assert_eq!(rule.declaration("backdrop-filter").unwrap().value, "blur(10px)");
//! ```

mod error;
mod lexer;
mod parser;
pub mod selectors;
mod stylesheet;
mod template;

pub use error::{ScanError, ScanErrorKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use source_span::Span;
pub use stylesheet::{Declaration, Rule, Stylesheet};
pub use template::{count_occurrences, ButtonElement, ClassUse, Template};

/// The result of scanning a stylesheet.
#[derive(Debug)]
pub struct ScanResult {
    /// The scanned rules.
    pub stylesheet: Stylesheet,
    /// Problems found along the way, in source order.
    pub errors: Vec<ScanError>,
}

/// Scans stylesheet text into rules and declarations.
///
/// Scanning always completes; malformed input is reported in
/// [`ScanResult::errors`].
pub fn scan(source: &str) -> ScanResult {
    let result = parser::Scanner::new(source).scan();
    tracing::trace!(
        rules = result.stylesheet.rules.len(),
        errors = result.errors.len(),
        "scanned stylesheet"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_empty() {
        let result = scan("");
        assert!(result.errors.is_empty());
        assert!(result.stylesheet.rules.is_empty());
    }

    #[test]
    fn test_scan_garbage_terminates() {
        let result = scan("}}{{;;@@ /* \" '");
        assert!(!result.errors.is_empty());
    }
}
