//! Source positions for css-audit.
//!
//! Findings point back into stylesheet and template text through byte
//! [`Span`]s; [`LineIndex`] turns those into the 1-indexed `file:line:col`
//! locations printed by the CLI and extracts the line for code snippets.

mod line_index;
mod span;

pub use line_index::{LineCol, LineIndex};
pub use span::{ByteOffset, Span};
