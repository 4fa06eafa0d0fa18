//! Byte classification.
//!
//! Single-byte predicates take a `u8`; predicates that need lookahead take
//! the remaining input, where an empty slice means end of input.

pub const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

pub const fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

pub const fn is_sign(b: u8) -> bool {
    matches!(b, b'+' | b'-')
}

pub const fn is_quote(b: u8) -> bool {
    b == b'"'
}

pub const fn is_paren_or_brace(b: u8) -> bool {
    matches!(b, b'(' | b')' | b'{' | b'}')
}

/// Bytes that may follow a backslash inside a string literal.
pub const fn is_escape_char(b: u8) -> bool {
    matches!(b, b'\\' | b'"' | b'r' | b'n' | b't')
}

/// ASCII control bytes that are not whitespace, plus DEL.
pub const fn is_forbidden_control(b: u8) -> bool {
    (b < 0x20 && !is_whitespace(b)) || b == 0x7F
}

pub fn is_arrow(rest: &[u8]) -> bool {
    rest.starts_with(b"=>")
}

/// A lone `=`. An arrow is not an equals sign.
pub fn is_equals(rest: &[u8]) -> bool {
    rest.first() == Some(&b'=') && !is_arrow(rest)
}

pub fn is_comment_start(rest: &[u8]) -> bool {
    rest.starts_with(b"//")
}

/// True where an identifier or integer token must end.
pub fn is_delimiter(rest: &[u8]) -> bool {
    match rest.first() {
        None => true,
        Some(&b) => {
            is_whitespace(b)
                || is_paren_or_brace(b)
                || b == b','
                || b == b';'
                || b == b'='
                || is_comment_start(rest)
        }
    }
}

pub fn all_whitespace(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| is_whitespace(b))
}

/// Offset of the first byte that breaks UTF-8 well-formedness, if any.
///
/// A multi-byte sequence cut short is reported at the byte that should have
/// been a continuation byte, or at `bytes.len()` when the input ends first.
/// Leads are sized by their bit pattern alone. Sequences that are complete
/// but still invalid (overlong, surrogate, above U+10FFFF) are reported at
/// their lead byte.
pub fn utf8_error_at(bytes: &[u8]) -> Option<usize> {
    match std::str::from_utf8(bytes) {
        Ok(_) => None,
        Err(e) => {
            let lead = e.valid_up_to();
            let width = match bytes[lead] {
                0xC0..=0xDF => 2,
                0xE0..=0xEF => 3,
                0xF0..=0xF7 => 4,
                _ => return Some(lead),
            };
            let continuation = (1..width)
                .map(|i| lead + i)
                .find(|&i| i >= bytes.len() || bytes[i] & 0xC0 != 0x80);
            Some(continuation.unwrap_or(lead).min(bytes.len()))
        }
    }
}
