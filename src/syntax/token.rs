//! Tokens and the keyword table.

use crate::ast::Span;
use crate::syntax::lexer::escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,
    Comment,
    Whitespace,
    Identifier,
    Integer,
    String,
    Eof,
    // Keywords
    Lambda,
    LambdaAlt,
    Def,
    Cond,
    Arrow,
    Equals,
    Let,
    // Malformed input
    Panic,
    BadWhitespace,
    BadComment,
    BadIdChar,
    BadIdLen,
    UnterminatedString,
    BadStringLen,
    BadStringEscape,
    BadStringChar,
    BadIntChar,
    BadIntLen,
    BadChar,
}

impl TokenKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenParen => "OPEN_PAREN",
            Self::CloseParen => "CLOSE_PAREN",
            Self::OpenBrace => "OPEN_BRACE",
            Self::CloseBrace => "CLOSE_BRACE",
            Self::Comma => "COMMA",
            Self::Semicolon => "SEMICOLON",
            Self::Comment => "COMMENT",
            Self::Whitespace => "WS",
            Self::Identifier => "ID",
            Self::Integer => "INTEGER",
            Self::String => "STRING",
            Self::Eof => "EOF",
            Self::Lambda => "lambda",
            Self::LambdaAlt => "λ",
            Self::Def => "def",
            Self::Cond => "cond",
            Self::Arrow => "=>",
            Self::Equals => "=",
            Self::Let => "let",
            Self::Panic => "PANIC",
            Self::BadWhitespace => "WHITESPACE_TOO_LONG",
            Self::BadComment => "COMMENT_TOO_LONG",
            Self::BadIdChar => "INVALID_ID_CHAR",
            Self::BadIdLen => "INVALID_ID_LEN",
            Self::UnterminatedString => "UNTERMINATED_STRING",
            Self::BadStringLen => "STRING_TOO_LONG",
            Self::BadStringEscape => "INVALID_STRING_ESCAPE",
            Self::BadStringChar => "INVALID_STRING_CHAR",
            Self::BadIntChar => "INVALID_INT_CHAR",
            Self::BadIntLen => "INVALID_INT_LEN",
            Self::BadChar => "INVALID_CHAR",
        }
    }

    /// Whitespace and comments, which the parser skips.
    pub const fn is_atmosphere(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    pub const fn is_malformed(self) -> bool {
        matches!(
            self,
            Self::Panic
                | Self::BadWhitespace
                | Self::BadComment
                | Self::BadIdChar
                | Self::BadIdLen
                | Self::UnterminatedString
                | Self::BadStringLen
                | Self::BadStringEscape
                | Self::BadStringChar
                | Self::BadIntChar
                | Self::BadIntLen
                | Self::BadChar
        )
    }

    /// Kinds whose source text is worth showing when tracing.
    const fn has_payload(self) -> bool {
        matches!(self, Self::Identifier | Self::Integer | Self::String | Self::Comment)
            || self.is_malformed()
    }
}

/// Keywords in table order. Only consulted after a complete identifier scan,
/// so `lambdas` and `define` stay identifiers.
pub const KEYWORDS: [(&str, TokenKind); 7] = [
    ("lambda", TokenKind::Lambda),
    ("λ", TokenKind::LambdaAlt),
    ("def", TokenKind::Def),
    ("cond", TokenKind::Cond),
    ("=>", TokenKind::Arrow),
    ("=", TokenKind::Equals),
    ("let", TokenKind::Let),
];

pub fn keyword(text: &[u8]) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(word, _)| word.as_bytes() == text)
        .map(|&(_, kind)| kind)
}

/// A token never owns text; it names a region of the input it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Offset of the offending byte relative to `span.start`, for malformed
    /// tokens. Zero otherwise.
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
            pos: 0,
        }
    }

    /// A malformed token whose offending byte is at absolute offset `at`.
    pub fn malformed(kind: TokenKind, start: usize, end: usize, at: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
            pos: at.saturating_sub(start),
        }
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.len() == 0
    }

    /// Absolute offset of the problem inside a malformed token.
    pub fn error_offset(&self) -> usize {
        self.span.start + self.pos
    }

    pub fn text<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        let end = self.span.end.min(input.len());
        let start = self.span.start.min(end);
        &input[start..end]
    }

    /// One tracer line: `[ID "abc"]`, `[OPEN_PAREN]`.
    pub fn describe(&self, input: &[u8]) -> String {
        if self.kind.has_payload() {
            format!("[{} {}]", self.kind.name(), escape(self.text(input)))
        } else {
            format!("[{}]", self.kind.name())
        }
    }
}
