//! Brace surface syntax: byte classification, tokens, the tokenizer, the
//! recursive-descent parser and the `let` desugaring pass.

pub mod chars;
pub mod desugar;
pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::{peek_token, read_token, Cursor};
pub use parser::{read_ast, read_program};
pub use token::{Token, TokenKind};
