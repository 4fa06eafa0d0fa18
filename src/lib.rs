//! Brace: a byte-exact tokenizer, recursive-descent parser and AST toolkit
//! for a small brace-and-paren expression language.
//!
//! ```rust
//! use brace::{read_program, Cursor};
//!
//! let mut cursor = Cursor::new("{let a = 5; add(a, 1)}");
//! let program = read_program(&mut cursor).unwrap().unwrap();
//! assert_eq!(program.to_sexp(), "(Block (Let a 5 (Block (add a 1))))");
//! ```

pub mod ast;
pub mod cli;
pub mod config;
pub mod errors;
pub mod syntax;

pub use crate::ast::{AstNode, Expr, ListKind, Span, WithSpan};
pub use crate::errors::{ErrorKind, SyntaxError};
pub use crate::syntax::{read_program, Cursor};
