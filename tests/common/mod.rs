//! Shared helpers for the integration tests.

#![allow(dead_code)]

use brace::syntax::read_ast;
use brace::{read_program, AstNode, Cursor, ErrorKind, SyntaxError};

/// Parses and desugars a program that must be valid.
pub fn parse(input: &str) -> AstNode {
    match read_program(&mut Cursor::new(input)) {
        Ok(Some(node)) => node,
        Ok(None) => panic!("no program in {input:?}"),
        Err(e) => panic!("{input:?} failed: {e}"),
    }
}

/// Reads one expression as written.
pub fn parse_raw(input: &str) -> AstNode {
    read_ast(&mut Cursor::new(input))
        .unwrap_or_else(|e| panic!("{input:?} failed: {e}"))
        .unwrap_or_else(|| panic!("no expression in {input:?}"))
}

pub fn parse_err(input: impl Into<Vec<u8>>) -> SyntaxError {
    match read_program(&mut Cursor::new(input)) {
        Err(e) => e,
        Ok(node) => panic!("expected an error, got {node:?}"),
    }
}

/// Kind and offset of the error a program must produce.
pub fn fails(input: impl Into<Vec<u8>>) -> (ErrorKind, usize) {
    let e = parse_err(input);
    (e.kind, e.offset)
}

pub fn sexp(input: &str) -> String {
    parse(input).to_sexp()
}
