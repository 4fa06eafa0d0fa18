//! Compile-time limits shared by the tokenizer, parser, printers and CLI.
//!
//! Every ceiling is inclusive: a token of exactly `MAX_*` bytes is accepted,
//! one byte more is rejected with an error located at the ceiling offset.

/// Longest identifier, in bytes.
pub const MAX_IDLEN: usize = 128;

/// Longest integer token, in bytes, sign included.
pub const MAX_INTLEN: usize = 24;

/// Longest string literal content (between the quotes, escapes not yet
/// interpreted), in bytes.
pub const MAX_STRINGLEN: usize = 4096;

/// Error messages are truncated to this many bytes.
pub const MAX_MSGLEN: usize = 256;

/// Longest run of whitespace, or longest single comment, in bytes.
pub const MAX_ATMOSPHERE_LEN: usize = u16::MAX as usize;

/// Deepest nesting the parser accepts before reporting a depth error.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Deepest level the ASCII tree printer descends into.
pub const MAX_TREE_DEPTH: usize = 1024;

/// Largest input the command-line driver reads.
pub const MAX_INPUT_LEN: usize = 10 * 1024;
