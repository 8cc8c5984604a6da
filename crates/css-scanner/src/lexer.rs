//! Stylesheet lexer using logos.
//!
//! The lexer is deliberately shallow: it only distinguishes the tokens the
//! scanner needs to find rule boundaries and declarations. Everything else
//! (identifiers, numbers, hashes, selectors' punctuation) is a `Text` run.

use logos::Logos;
use source_span::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
}

/// Token kinds for stylesheet text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
pub enum TokenKind {
    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `:`
    #[token(":")]
    Colon,

    /// `,`
    #[token(",")]
    Comma,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `/* ... */`
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", priority = 10)]
    Comment,

    /// `/* ...` running to the end of the file
    #[regex(r"/\*([^*]|\*+[^*/])*\**", priority = 5)]
    UnterminatedComment,

    /// A single or double quoted string.
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,

    /// A quoted string cut off by a newline or the end of the file.
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r#"'([^'\\\n]|\\.)*"#)]
    UnterminatedString,

    /// `@media`, `@keyframes`, ...
    #[regex(r"@[a-zA-Z-][a-zA-Z0-9_-]*")]
    AtKeyword,

    /// `!important`
    #[regex(r"![ \t]*[iI][mM][pP][oO][rR][tT][aA][nN][tT]")]
    Important,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    /// Anything else: identifiers, numbers, selector punctuation.
    #[regex(r#"[^{};:,()'"/@!\s]+"#)]
    #[token("/")]
    #[token("@")]
    #[token("!")]
    Text,

    /// End of input.
    Eof,

    #[default]
    Error,
}

impl TokenKind {
    /// Whitespace and comments carry no content for selectors or values.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::UnterminatedComment
        )
    }

    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comment => "comment",
            TokenKind::UnterminatedComment => "unterminated comment",
            TokenKind::String => "string",
            TokenKind::UnterminatedString => "unterminated string",
            TokenKind::AtKeyword => "at-keyword",
            TokenKind::Important => "'!important'",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Text => "text",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

/// Iterator over the tokens of a stylesheet, always ending with `Eof`.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(result) => {
                let kind = result.unwrap_or(TokenKind::Error);
                Some(Token {
                    kind,
                    span: Span::from(self.inner.span()),
                })
            }
            None => {
                self.finished = true;
                Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::from_usize(self.source.len(), self.source.len()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof && *k != TokenKind::Whitespace)
            .collect()
    }

    #[test]
    fn test_simple_rule() {
        assert_eq!(
            tokenize(".card { color: red; }"),
            vec![
                TokenKind::Text,
                TokenKind::LBrace,
                TokenKind::Text,
                TokenKind::Colon,
                TokenKind::Text,
                TokenKind::Semicolon,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_comment_is_single_token() {
        assert_eq!(
            tokenize("/* .fake { color: red; } */"),
            vec![TokenKind::Comment]
        );
        assert_eq!(tokenize("/**/"), vec![TokenKind::Comment]);
        assert_eq!(tokenize("/* a ** b **/"), vec![TokenKind::Comment]);
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(
            tokenize(".a {} /* never closed"),
            vec![
                TokenKind::Text,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::UnterminatedComment,
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokenize(r#"content: "a;b}";"#),
            vec![
                TokenKind::Text,
                TokenKind::Colon,
                TokenKind::String,
                TokenKind::Semicolon,
            ]
        );
        assert_eq!(
            tokenize("content: 'open\n"),
            vec![
                TokenKind::Text,
                TokenKind::Colon,
                TokenKind::UnterminatedString,
            ]
        );
    }

    #[test]
    fn test_at_keyword_and_important() {
        assert_eq!(
            tokenize("@media (max-width: 768px) { .a { color: red !important; } }"),
            vec![
                TokenKind::AtKeyword,
                TokenKind::LParen,
                TokenKind::Text,
                TokenKind::Colon,
                TokenKind::Text,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Text,
                TokenKind::LBrace,
                TokenKind::Text,
                TokenKind::Colon,
                TokenKind::Text,
                TokenKind::Important,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_spans_cover_source() {
        let source = ".a{b:c}";
        let tokens: Vec<Token> = Lexer::new(source).collect();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        let rebuilt: String = tokens
            .iter()
            .filter_map(|t| t.span.slice(source))
            .collect();
        assert_eq!(rebuilt, source);
    }
}
