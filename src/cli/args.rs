//! Defines the command-line arguments for the Brace CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "brace",
    version,
    about = "Parse a Brace program and print its syntax tree (JSON by default)."
)]
pub struct BraceArgs {
    /// Read the program from FILE instead of standard input.
    pub file: Option<PathBuf>,

    /// Wrap numbers and strings in JSON objects, e.g. {"Number": 1}.
    #[arg(short = 'a', long)]
    pub always_object: bool,

    /// Print an s-expression instead of JSON.
    #[arg(short = 's', long, conflicts_with_all = ["tree", "source"])]
    pub sexp: bool,

    /// Print an ASCII tree instead of JSON.
    #[arg(short = 't', long, conflicts_with = "source")]
    pub tree: bool,

    /// Print the desugared program in Brace syntax.
    #[arg(long)]
    pub source: bool,

    /// List the keywords and exit.
    #[arg(short = 'k', long)]
    pub keywords: bool,

    /// Print every token of the input instead of parsing it.
    #[arg(long)]
    pub tokens: bool,

    /// Report syntax errors as rich diagnostics.
    #[arg(long)]
    pub fancy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json { always_object: bool },
    Sexp,
    Tree,
    Source,
}

impl BraceArgs {
    pub fn format(&self) -> OutputFormat {
        if self.sexp {
            OutputFormat::Sexp
        } else if self.tree {
            OutputFormat::Tree
        } else if self.source {
            OutputFormat::Source
        } else {
            OutputFormat::Json {
                always_object: self.always_object,
            }
        }
    }
}
