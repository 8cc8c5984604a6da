//! Tolerant rule scanner.
//!
//! Walks the token stream with a stack of open blocks. Conditional group
//! at-rules (`@media`, `@supports`, ...) are transparent: their preludes are
//! recorded on the rules they contain. Descriptor blocks (`@keyframes`,
//! `@font-face`, ...) are skipped. Every other block is a style rule whose
//! body is split into declarations. Malformed input produces [`ScanError`]s,
//! never a failed scan.

use crate::error::{ScanError, ScanErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::stylesheet::{Declaration, Rule, Stylesheet};
use crate::ScanResult;
use smol_str::SmolStr;
use source_span::Span;

/// At-rules whose blocks contain ordinary style rules.
const GROUPING_AT_RULES: &[&str] = &[
    "@media",
    "@supports",
    "@layer",
    "@container",
    "@document",
    "@scope",
];

enum Frame {
    /// `@media ... {`
    Group { prelude: String, open: Span },
    /// `@keyframes ... {` and anything nested in it.
    Opaque { prelude: String, open: Span },
    /// `.selector {`
    Style {
        rule: Rule,
        open: Span,
        has_nested: bool,
        /// Non-empty statements seen, valid or not.
        statements: usize,
    },
}

pub(crate) struct Scanner<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    stack: Vec<Frame>,
    /// Tokens since the last `{`, `}` or top-level `;`.
    pending: Vec<Token>,
    paren_depth: usize,
    last_significant: Option<TokenKind>,
    rules: Vec<Rule>,
    errors: Vec<ScanError>,
}

impl<'src> Scanner<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Lexer::new(source).collect(),
            stack: Vec::new(),
            pending: Vec::new(),
            paren_depth: 0,
            last_significant: None,
            rules: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn scan(mut self) -> ScanResult {
        let tokens = std::mem::take(&mut self.tokens);

        for token in tokens {
            match token.kind {
                TokenKind::LBrace => self.open_block(token),
                TokenKind::RBrace => self.close_block(token),
                TokenKind::Semicolon if self.paren_depth == 0 => self.end_statement(token),
                TokenKind::Comment => {}
                TokenKind::UnterminatedComment => {
                    self.error(ScanErrorKind::UnterminatedComment, token.span);
                }
                TokenKind::Eof => self.finish(token),
                kind => {
                    match kind {
                        TokenKind::LParen => self.paren_depth += 1,
                        TokenKind::RParen => {
                            self.paren_depth = self.paren_depth.saturating_sub(1)
                        }
                        TokenKind::UnterminatedString => {
                            self.error(ScanErrorKind::UnterminatedString, token.span);
                        }
                        _ => {}
                    }
                    if kind != TokenKind::Whitespace || !self.pending.is_empty() {
                        self.pending.push(token);
                    }
                }
            }

            if !token.kind.is_trivia() {
                self.last_significant = Some(token.kind);
            }
        }

        self.rules.sort_by_key(|rule| rule.selector_span.start);
        self.errors.sort_by_key(|error| error.span.start);

        ScanResult {
            stylesheet: Stylesheet { rules: self.rules },
            errors: self.errors,
        }
    }

    fn error(&mut self, kind: ScanErrorKind, span: Span) {
        self.errors.push(ScanError::new(kind, span));
    }

    fn in_opaque(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::Opaque { .. }))
    }

    /// Collapses the pending tokens into text, dropping surrounding whitespace.
    fn pending_text(tokens: &[Token], source: &str) -> String {
        let mut text = String::new();
        for token in tokens {
            if token.kind == TokenKind::Whitespace {
                if !text.is_empty() && !text.ends_with(' ') {
                    text.push(' ');
                }
            } else if let Some(slice) = token.span.slice(source) {
                text.push_str(slice);
            }
        }
        text.trim_end().to_string()
    }

    fn pending_span(tokens: &[Token]) -> Option<Span> {
        let first = tokens.iter().find(|t| !t.kind.is_trivia())?;
        let last = tokens.iter().rev().find(|t| !t.kind.is_trivia())?;
        Some(first.span.cover(last.span))
    }

    fn open_block(&mut self, token: Token) {
        let pending = std::mem::take(&mut self.pending);
        self.paren_depth = 0;
        let prelude = Self::pending_text(&pending, self.source);
        let prelude_span = Self::pending_span(&pending).unwrap_or(token.span);

        if self.in_opaque() || prelude.is_empty() {
            self.stack.push(Frame::Opaque {
                prelude,
                open: token.span,
            });
            return;
        }

        if let Some(Frame::Style { has_nested, .. }) = self.stack.last_mut() {
            *has_nested = true;
        }

        if prelude.starts_with('@') {
            let keyword = prelude
                .split(|c: char| c.is_whitespace() || c == '(')
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase();
            let frame = if GROUPING_AT_RULES.contains(&keyword.as_str()) {
                Frame::Group {
                    prelude,
                    open: token.span,
                }
            } else {
                Frame::Opaque {
                    prelude,
                    open: token.span,
                }
            };
            self.stack.push(frame);
            return;
        }

        let at_rules = self
            .stack
            .iter()
            .filter_map(|frame| match frame {
                Frame::Group { prelude, .. } => Some(prelude.clone()),
                _ => None,
            })
            .collect();

        self.stack.push(Frame::Style {
            rule: Rule {
                selector: prelude,
                selector_span: prelude_span,
                body_span: token.span,
                declarations: Vec::new(),
                at_rules,
            },
            open: token.span,
            has_nested: false,
            statements: 0,
        });
    }

    fn end_statement(&mut self, token: Token) {
        let pending = std::mem::take(&mut self.pending);
        let has_content = pending.iter().any(|t| !t.kind.is_trivia());

        if !has_content {
            if self.last_significant == Some(TokenKind::Semicolon) {
                self.error(ScanErrorKind::DuplicateSemicolon, token.span);
            }
            return;
        }

        if let Some(Frame::Style {
            rule, statements, ..
        }) = self.stack.last_mut()
        {
            *statements += 1;
            if let Some(result) = Self::declaration(&pending, self.source) {
                match result {
                    Ok(decl) => rule.declarations.push(decl),
                    Err(error) => self.errors.push(error),
                }
            }
        }
    }

    /// Builds a declaration from the tokens between two `;`.
    fn declaration(tokens: &[Token], source: &str) -> Option<Result<Declaration, ScanError>> {
        let span = Self::pending_span(tokens)?;
        let colon = tokens.iter().position(|t| t.kind == TokenKind::Colon);

        let Some(colon) = colon else {
            let text = Self::pending_text(tokens, source);
            return Some(Err(ScanError::new(
                ScanErrorKind::InvalidDeclaration { text },
                span,
            )));
        };

        let property = Self::pending_text(&tokens[..colon], source);
        let property = if property.starts_with("--") {
            SmolStr::new(property.trim())
        } else {
            SmolStr::new(property.trim().to_ascii_lowercase())
        };

        let value_tokens: Vec<Token> = tokens[colon + 1..]
            .iter()
            .copied()
            .filter(|t| t.kind != TokenKind::Important)
            .collect();
        let important = value_tokens.len() + colon + 1 != tokens.len();
        let value = Self::pending_text(&value_tokens, source).trim().to_string();

        Some(Ok(Declaration {
            property,
            value,
            important,
            span,
        }))
    }

    fn close_block(&mut self, token: Token) {
        let Some(frame) = self.stack.pop() else {
            self.pending.clear();
            self.error(ScanErrorKind::UnexpectedCloseBrace, token.span);
            return;
        };

        match frame {
            Frame::Style {
                mut rule,
                has_nested,
                mut statements,
                ..
            } => {
                let pending = std::mem::take(&mut self.pending);
                if let Some(result) = Self::declaration(&pending, self.source) {
                    statements += 1;
                    match result {
                        Ok(decl) => rule.declarations.push(decl),
                        Err(error) => self.errors.push(error),
                    }
                }

                rule.body_span = rule.body_span.cover(token.span);
                if statements == 0 && !has_nested {
                    self.error(
                        ScanErrorKind::EmptyRule {
                            selector: rule.selector.clone(),
                        },
                        rule.span(),
                    );
                }
                self.rules.push(rule);
            }
            Frame::Group { .. } | Frame::Opaque { .. } => {
                self.pending.clear();
            }
        }
        self.paren_depth = 0;
    }

    fn finish(&mut self, eof: Token) {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Style { mut rule, open, .. } => {
                    let pending = std::mem::take(&mut self.pending);
                    if let Some(Ok(decl)) = Self::declaration(&pending, self.source) {
                        rule.declarations.push(decl);
                    }
                    rule.body_span = rule.body_span.cover(eof.span);
                    self.error(
                        ScanErrorKind::UnclosedBlock {
                            prelude: rule.selector.clone(),
                        },
                        open,
                    );
                    self.rules.push(rule);
                }
                Frame::Group { prelude, open } | Frame::Opaque { prelude, open } => {
                    self.error(ScanErrorKind::UnclosedBlock { prelude }, open);
                }
            }
        }
    }
}
