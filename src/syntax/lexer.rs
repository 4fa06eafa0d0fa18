//! The tokenizer.
//!
//! Reads one token at a time from a [`Cursor`]. Tokens are classified by
//! their leading bytes in a fixed order: brackets, whitespace, integers,
//! strings, separators, `=>`, `=`, `//` comments, end of input, and finally
//! identifiers (which may turn out to be keywords). Malformed input never
//! fails the tokenizer; it yields a malformed token that records where the
//! problem is and leaves the decision to the parser.

use crate::config::{MAX_ATMOSPHERE_LEN, MAX_IDLEN, MAX_INTLEN, MAX_STRINGLEN};
use crate::syntax::chars::{
    is_arrow, is_comment_start, is_delimiter, is_digit, is_escape_char, is_forbidden_control,
    is_quote, is_sign, is_whitespace, utf8_error_at,
};
use crate::syntax::token::{keyword, Token, TokenKind};
use std::sync::Arc;

// ============================================================================
// CURSOR
// ============================================================================

/// An input buffer and a read position. Cloning is cheap; the bytes are
/// shared.
#[derive(Debug, Clone)]
pub struct Cursor {
    input: Arc<Vec<u8>>,
    pos: usize,
}

impl Cursor {
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self {
            input: Arc::new(input.into()),
            pos: 0,
        }
    }

    /// A cursor at an arbitrary position. Positions past the end are allowed;
    /// reading from one yields a `Panic` token.
    pub fn with_position(input: Arc<Vec<u8>>, pos: usize) -> Self {
        Self { input, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    pub fn source(&self) -> &Arc<Vec<u8>> {
        &self.input
    }

    /// The unread part of the input.
    pub fn rest(&self) -> &[u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

// ============================================================================
// TOKEN READER
// ============================================================================

/// Reads the next token, whitespace and comments included, and advances the
/// cursor past it.
pub fn read_token(cursor: &mut Cursor) -> Token {
    let token = scan(&cursor.input, cursor.pos);
    cursor.pos = cursor.pos.max(token.span.end);
    token
}

/// Reads the next token without advancing.
pub fn peek_token(cursor: &Cursor) -> Token {
    scan(&cursor.input, cursor.pos)
}

fn scan(input: &[u8], start: usize) -> Token {
    let Some(rest) = input.get(start..) else {
        return Token::new(TokenKind::Panic, start, start);
    };
    let Some(&first) = rest.first() else {
        return Token::new(TokenKind::Eof, start, start);
    };
    let single = |kind| Token::new(kind, start, start + 1);
    match first {
        b'(' => single(TokenKind::OpenParen),
        b')' => single(TokenKind::CloseParen),
        b'{' => single(TokenKind::OpenBrace),
        b'}' => single(TokenKind::CloseBrace),
        b if is_whitespace(b) => lex_whitespace(input, start),
        b if is_digit(b) || is_sign(b) => lex_integer(input, start),
        b if is_quote(b) => lex_string(input, start),
        b',' => single(TokenKind::Comma),
        b';' => single(TokenKind::Semicolon),
        _ if is_arrow(rest) => Token::new(TokenKind::Arrow, start, start + 2),
        b'=' => single(TokenKind::Equals),
        _ if is_comment_start(rest) => lex_comment(input, start),
        _ => lex_identifier(input, start),
    }
}

fn scan_to_delimiter(input: &[u8], start: usize) -> usize {
    let mut end = start;
    while !is_delimiter(&input[end..]) {
        end += 1;
    }
    end
}

/// First byte that is not well-formed UTF-8 or is a forbidden control byte.
fn first_bad_byte(text: &[u8]) -> Option<usize> {
    let control = text.iter().position(|&b| is_forbidden_control(b));
    [utf8_error_at(text), control].into_iter().flatten().min()
}

fn lex_whitespace(input: &[u8], start: usize) -> Token {
    let len = input[start..].iter().take_while(|&&b| is_whitespace(b)).count();
    atmosphere(TokenKind::Whitespace, TokenKind::BadWhitespace, start, start + len)
}

fn lex_comment(input: &[u8], start: usize) -> Token {
    let len = input[start..]
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(input.len() - start);
    atmosphere(TokenKind::Comment, TokenKind::BadComment, start, start + len)
}

fn atmosphere(kind: TokenKind, too_long: TokenKind, start: usize, end: usize) -> Token {
    if end - start > MAX_ATMOSPHERE_LEN {
        Token::malformed(too_long, start, end, start + MAX_ATMOSPHERE_LEN)
    } else {
        Token::new(kind, start, end)
    }
}

fn lex_integer(input: &[u8], start: usize) -> Token {
    let end = scan_to_delimiter(input, start);
    let digits = if is_sign(input[start]) { start + 1 } else { start };
    let digits_end = digits + input[digits..end].iter().take_while(|&&b| is_digit(b)).count();

    if digits_end == digits {
        let at = if digits < end { digits } else { start };
        return Token::malformed(TokenKind::BadIntChar, start, end, at);
    }
    if digits_end != end {
        return Token::malformed(TokenKind::BadIntChar, start, end, digits_end);
    }
    if end - start > MAX_INTLEN {
        return Token::malformed(TokenKind::BadIntLen, start, end, start + MAX_INTLEN);
    }
    Token::new(TokenKind::Integer, start, end)
}

fn lex_identifier(input: &[u8], start: usize) -> Token {
    let end = scan_to_delimiter(input, start);
    if end - start > MAX_IDLEN {
        return Token::malformed(TokenKind::BadIdLen, start, end, start + MAX_IDLEN);
    }
    let text = &input[start..end];
    if let Some(at) = first_bad_byte(text) {
        let kind = if at == 0 {
            TokenKind::BadChar
        } else {
            TokenKind::BadIdChar
        };
        return Token::malformed(kind, start, end, start + at);
    }
    Token::new(keyword(text).unwrap_or(TokenKind::Identifier), start, end)
}

fn lex_string(input: &[u8], start: usize) -> Token {
    let content = start + 1;
    let mut close = content;
    let mut bad_escape = None;
    while close < input.len() && !is_quote(input[close]) {
        if input[close] == b'\\' && close + 1 < input.len() {
            if bad_escape.is_none() && !is_escape_char(input[close + 1]) {
                bad_escape = Some(close);
            }
            close += 1;
        }
        close += 1;
    }
    let terminated = close < input.len();
    let end = if terminated { close + 1 } else { close };

    if close - content > MAX_STRINGLEN {
        return Token::malformed(TokenKind::BadStringLen, start, end, content + MAX_STRINGLEN);
    }
    if !terminated {
        return Token::malformed(TokenKind::UnterminatedString, start, end, end);
    }
    if let Some(at) = first_bad_byte(&input[content..close]) {
        return Token::malformed(TokenKind::BadStringChar, start, end, content + at);
    }
    if let Some(at) = bad_escape {
        return Token::malformed(TokenKind::BadStringEscape, start, end, at);
    }
    Token::new(TokenKind::String, start, end)
}

// ============================================================================
// LITERAL HELPERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnescapeError {
    /// Index of the backslash starting an unknown escape.
    BadEscape { at: usize },
    /// The input ran out before the stop byte.
    UnexpectedEnd { at: usize },
    /// `limit` bytes were produced without reaching the stop byte.
    LengthExceeded,
}

/// Interprets escapes in `bytes` up to the first byte accepted by `stop_at`.
/// Returns the unescaped bytes and the index of the stop byte.
pub fn unescape(
    bytes: &[u8],
    limit: usize,
    stop_at: impl Fn(u8) -> bool,
) -> Result<(Vec<u8>, usize), UnescapeError> {
    let mut out = Vec::new();
    let mut i = 0;
    loop {
        let Some(&b) = bytes.get(i) else {
            return Err(UnescapeError::UnexpectedEnd { at: i });
        };
        if stop_at(b) {
            return Ok((out, i));
        }
        if out.len() >= limit {
            return Err(UnescapeError::LengthExceeded);
        }
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let Some(&next) = bytes.get(i + 1) else {
            return Err(UnescapeError::UnexpectedEnd { at: i });
        };
        out.push(match next {
            b'\\' => b'\\',
            b'"' => b'"',
            b'r' => b'\r',
            b'n' => b'\n',
            b't' => b'\t',
            _ => return Err(UnescapeError::BadEscape { at: i }),
        });
        i += 2;
    }
}

/// Renders bytes as a quoted string literal.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'"');
    for &b in bytes {
        match b {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'"' => out.extend_from_slice(b"\\\""),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\t' => out.extend_from_slice(b"\\t"),
            _ => out.push(b),
        }
    }
    out.push(b'"');
    String::from_utf8_lossy(&out).into_owned()
}

/// Interprets `[+-]?[0-9]+` as an `i64`. `None` when malformed or out of
/// range.
pub fn interpret_int(text: &[u8]) -> Option<i64> {
    let (negative, digits) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.iter().all(|&b| is_digit(b)) {
        return None;
    }
    let magnitude = digits.iter().try_fold(0u64, |acc, &d| {
        acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
    })?;
    if negative {
        if magnitude == i64::MIN.unsigned_abs() {
            Some(i64::MIN)
        } else {
            i64::try_from(magnitude).ok().map(|v| -v)
        }
    } else {
        i64::try_from(magnitude).ok()
    }
}
