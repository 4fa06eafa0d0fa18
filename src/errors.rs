//! Brace error handling.
//!
//! A parse either succeeds or stops at its first problem, described by a
//! single [`SyntaxError`] that remembers the byte offset it points at and the
//! complete input it came from. Errors are values threaded through `Result`;
//! nothing in the tokenizer or the parser panics on bad input.

use crate::config::MAX_MSGLEN;
use crate::syntax::chars::all_whitespace;
use miette::{Diagnostic, LabeledSpan, SourceCode};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

// ============================================================================
// ERROR KINDS
// ============================================================================

/// The fixed taxonomy of syntax errors. Names are stable and user visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Eof,
    Program,
    Definition,
    Assignment,
    Lambda,
    Parameters,
    Block,
    Cond,
    IdSyntax,
    IdLen,
    IntSyntax,
    IntLen,
    IntRange,
    StrChar,
    StrEsc,
    StrLen,
    BadChar,
    Lexer,
    Depth,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 19] = [
        Self::Eof,
        Self::Program,
        Self::Definition,
        Self::Assignment,
        Self::Lambda,
        Self::Parameters,
        Self::Block,
        Self::Cond,
        Self::IdSyntax,
        Self::IdLen,
        Self::IntSyntax,
        Self::IntLen,
        Self::IntRange,
        Self::StrChar,
        Self::StrEsc,
        Self::StrLen,
        Self::BadChar,
        Self::Lexer,
        Self::Depth,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Eof => "Unexpected EOF",
            Self::Program => "Not a valid program",
            Self::Definition => "Improper binding (def/let)",
            Self::Assignment => "Improper assignment",
            Self::Lambda => "Improper lambda expression",
            Self::Parameters => "Improper parameter list",
            Self::Block => "Improper block",
            Self::Cond => "Improper cond",
            Self::IdSyntax => "Invalid identifier syntax",
            Self::IdLen => "Identifier too long",
            Self::IntSyntax => "Invalid integer",
            Self::IntLen => "Integer too long",
            Self::IntRange => "Integer out of range",
            Self::StrChar => "Invalid character in string",
            Self::StrEsc => "Invalid escape sequence",
            Self::StrLen => "String too long",
            Self::BadChar => "Illegal character",
            Self::Lexer => "Lexer failed",
            Self::Depth => "Nesting too deep",
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(self) -> &'static str {
        match self {
            Self::Eof => "unexpected_eof",
            Self::Program => "not_a_program",
            Self::Definition => "improper_binding",
            Self::Assignment => "improper_assignment",
            Self::Lambda => "improper_lambda",
            Self::Parameters => "improper_parameters",
            Self::Block => "improper_block",
            Self::Cond => "improper_cond",
            Self::IdSyntax => "identifier_syntax",
            Self::IdLen => "identifier_length",
            Self::IntSyntax => "integer_syntax",
            Self::IntLen => "integer_length",
            Self::IntRange => "integer_range",
            Self::StrChar => "string_character",
            Self::StrEsc => "string_escape",
            Self::StrLen => "string_length",
            Self::BadChar => "illegal_character",
            Self::Lexer => "lexer_failed",
            Self::Depth => "nesting_depth",
        }
    }

    /// Length-ceiling errors point at the ceiling, not at a bad byte, so the
    /// caret line is left out when printing them.
    pub const fn is_length_ceiling(self) -> bool {
        matches!(self, Self::IdLen | Self::IntLen | Self::StrLen)
    }

    const fn help(self) -> Option<&'static str> {
        match self {
            Self::Program => Some("a program is a single expression, not a bare parameter list"),
            Self::Parameters => Some("parameter lists cannot be nested directly inside one another"),
            Self::StrEsc => Some("valid escapes are \\\\ \\\" \\r \\n and \\t"),
            Self::IdLen => Some("identifiers are limited in length; shorten this name"),
            Self::IntRange => Some("integers must fit in a signed 64-bit value"),
            Self::Cond => Some("each cond clause has the shape (test => consequent)"),
            _ => None,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Eof => "input ends here",
            Self::IdLen | Self::IntLen | Self::StrLen => "limit reached here",
            Self::Depth => "nested too deeply",
            _ => "here",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SYNTAX ERROR
// ============================================================================

/// The first problem found in an input.
#[derive(Debug, Clone, Error)]
#[error("Syntax error [{kind}]: {}", .message.as_deref().unwrap_or_default())]
pub struct SyntaxError {
    pub kind: ErrorKind,
    /// Byte offset into the input. May equal the input length (EOF).
    pub offset: usize,
    pub message: Option<String>,
    input: Arc<Vec<u8>>,
}

impl SyntaxError {
    pub fn new(kind: ErrorKind, input: Arc<Vec<u8>>, offset: usize, message: Option<&str>) -> Self {
        Self {
            kind,
            offset,
            message: message.map(truncate_message),
            input,
        }
    }

    /// The complete input this error was found in.
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// The error offset clamped into the input, plus the length of the
    /// highlighted region (one byte, or nothing at end of input).
    fn label_span(&self) -> (usize, usize) {
        let offset = self.offset.min(self.input.len());
        let len = usize::from(offset < self.input.len());
        (offset, len)
    }
}

/// Two errors are the same when they have the same kind, offset and message,
/// whichever buffer they were found in.
impl PartialEq for SyntaxError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.offset == other.offset && self.message == other.message
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("brace::syntax::{}", self.kind.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (offset, len) = self.label_span();
        let label = LabeledSpan::new(Some(self.kind.label().to_string()), offset, len);
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&*self.input as &dyn SourceCode)
    }
}

fn truncate_message(message: &str) -> String {
    if message.len() <= MAX_MSGLEN {
        return message.to_string();
    }
    let mut end = MAX_MSGLEN;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    message[..end].to_string()
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Writes the classic three-line report:
///
/// ```text
/// Syntax error [Improper parameter list]: parameters not allowed here
///   (1, 2, (3))
///          ^
/// ```
pub fn write_error<W: Write + ?Sized>(w: &mut W, error: &SyntaxError) -> io::Result<()> {
    writeln!(w, "{error}")?;
    write_error_context(w, error)
}

/// Writes the source line and caret of a report, without the heading.
pub fn write_error_context<W: Write + ?Sized>(w: &mut W, error: &SyntaxError) -> io::Result<()> {
    if error.kind == ErrorKind::Lexer {
        return Ok(());
    }
    let input = error.input();
    let Some((start, end)) = line_at(input, error.offset) else {
        return Ok(());
    };
    let line = &input[start..end];
    if all_whitespace(line) {
        return Ok(());
    }
    writeln!(w, "  {}", String::from_utf8_lossy(line))?;
    if !error.kind.is_length_ceiling() {
        let point = error.offset.clamp(start, end);
        writeln!(w, "  {}^", caret_indent(&input[start..point]))?;
    }
    Ok(())
}

/// Prints an error in the classic format to stderr.
pub fn print_error(error: &SyntaxError) {
    let stderr = io::stderr();
    let _ = write_error(&mut stderr.lock(), error);
}

/// Prints an error with full miette diagnostics.
pub fn print_report(error: SyntaxError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// Locates the line holding `offset`. An offset at EOF, or on a newline,
/// belongs to the line that ends there.
pub fn line_at(input: &[u8], offset: usize) -> Option<(usize, usize)> {
    if input.is_empty() {
        return None;
    }
    let mut point = offset.min(input.len());
    if point == input.len() {
        point -= 1;
    }
    if input[point] == b'\n' {
        if point == 0 {
            return Some((0, 0));
        }
        point -= 1;
    }
    if input[point] == b'\n' {
        return Some((point, point));
    }
    let start = input[..point]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let end = input[point..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(input.len(), |i| point + i);
    Some((start, end))
}

fn caret_indent(prefix: &[u8]) -> String {
    String::from_utf8_lossy(prefix)
        .chars()
        .map(|c| match c {
            '\t' => "\t".to_string(),
            c => " ".repeat(c.width().unwrap_or(0)),
        })
        .collect()
}
