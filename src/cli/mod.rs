//! The Brace Command-Line Interface.
//!
//! Reads one program from a file or standard input, parses it and prints the
//! desugared tree. Anything after the first complete program is an error.

use crate::cli::args::BraceArgs;
use crate::config::MAX_INPUT_LEN;
use crate::errors::SyntaxError;
use crate::syntax::{read_program, Cursor};
use clap::Parser;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use thiserror::Error;

pub mod args;
pub mod output;

// ============================================================================
// CLI ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read input: {0}")]
    Io(#[from] io::Error),

    #[error("input exceeds {} bytes", MAX_INPUT_LEN)]
    InputTooLong,

    #[error("no program found in input")]
    EmptyInput,

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Unparsed input remaining: {0}")]
    Unparsed(String),
}

impl CliError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Syntax(_) => 2,
            CliError::Unparsed(_) => 3,
            CliError::EmptyInput => 4,
            CliError::Io(_) | CliError::InputTooLong => 6,
        }
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args = BraceArgs::parse();
    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_cli_error(&e, args.fancy);
            ExitCode::from(e.exit_code())
        }
    }
}

fn execute(args: &BraceArgs) -> Result<(), CliError> {
    if args.keywords {
        output::print_keywords();
        return Ok(());
    }

    let input = read_input(args.file.as_deref())?;
    if args.tokens {
        output::print_tokens(&input);
        return Ok(());
    }

    let mut cursor = Cursor::new(input);
    let program = read_program(&mut cursor)?.ok_or(CliError::EmptyInput)?;
    output::print_program(&program, args.format());

    let rest_start = cursor.position();
    match read_program(&mut cursor) {
        Ok(None) => Ok(()),
        _ => {
            let rest = String::from_utf8_lossy(&cursor.input()[rest_start..]);
            Err(CliError::Unparsed(rest.trim().to_string()))
        }
    }
}

/// Reads at most `MAX_INPUT_LEN` bytes from `path`, or from stdin when no
/// path is given.
fn read_input(path: Option<&Path>) -> Result<Vec<u8>, CliError> {
    let limit = (MAX_INPUT_LEN + 1) as u64;
    let mut buf = Vec::new();
    match path {
        Some(path) => File::open(path)?.take(limit).read_to_end(&mut buf)?,
        None => io::stdin().lock().take(limit).read_to_end(&mut buf)?,
    };
    if buf.len() > MAX_INPUT_LEN {
        return Err(CliError::InputTooLong);
    }
    Ok(buf)
}
