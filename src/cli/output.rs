//! Handles all user-facing output for the CLI.
//!
//! Program text goes to stdout, errors to stderr. Color is applied only when
//! the stream is a terminal.

use crate::ast::AstNode;
use crate::cli::args::OutputFormat;
use crate::cli::CliError;
use crate::errors::{print_report, write_error_context, SyntaxError};
use crate::syntax::lexer::{read_token, Cursor};
use crate::syntax::token::{TokenKind, KEYWORDS};
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice(io::stdout().is_terminal()))
}

fn stderr() -> StandardStream {
    StandardStream::stderr(color_choice(io::stderr().is_terminal()))
}

fn color_choice(terminal: bool) -> ColorChoice {
    if terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

// ============================================================================
// PROGRAM OUTPUT
// ============================================================================

/// Prints `program` in the chosen format, always ending with a newline.
pub fn print_program(program: &AstNode, format: OutputFormat) {
    let text = match format {
        OutputFormat::Json { always_object } => program.to_json(always_object),
        OutputFormat::Sexp => program.to_sexp(),
        OutputFormat::Tree => program.to_tree(),
        OutputFormat::Source => program.to_source(),
    };
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}

pub fn print_keywords() {
    for (text, _) in KEYWORDS {
        println!("{text}");
    }
}

/// Prints one line per token: its start offset and its description.
/// Malformed tokens are highlighted.
pub fn print_tokens(input: &[u8]) {
    let mut stdout = stdout();
    let mut cursor = Cursor::new(input);
    loop {
        let token = read_token(&mut cursor);
        if token.kind.is_malformed() {
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        } else if token.kind.is_atmosphere() {
            let _ = stdout.set_color(ColorSpec::new().set_dimmed(true));
        }
        let _ = writeln!(stdout, "{:>6}  {}", token.span.start, token.describe(input));
        let _ = stdout.reset();
        if matches!(token.kind, TokenKind::Eof | TokenKind::Panic) {
            break;
        }
    }
}

// ============================================================================
// ERROR OUTPUT
// ============================================================================

pub fn print_cli_error(error: &CliError, fancy: bool) {
    match error {
        CliError::Syntax(e) if fancy => print_report(e.clone()),
        CliError::Syntax(e) => print_syntax_error(e),
        other => {
            let mut stderr = stderr();
            let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
            let _ = write!(stderr, "error");
            let _ = stderr.reset();
            let _ = writeln!(stderr, ": {other}");
        }
    }
}

/// Classic report with a colored heading.
pub fn print_syntax_error(error: &SyntaxError) {
    let mut stderr = stderr();
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = writeln!(stderr, "{error}");
    let _ = stderr.reset();
    let _ = write_error_context(&mut stderr, error);
}
