//! AST module for Brace programs.
//!
//! Every node is a [`WithSpan<Expr>`]: a value plus the byte range of the
//! input it was read from. Lists carry their own subtype, so an empty block
//! and an empty parameter list stay distinguishable. Nodes own their children
//! outright; there is no sharing and no cycles.

// ============================================================================
// IMPORTS
// ============================================================================

use crate::config::MAX_STRINGLEN;
use crate::errors::{ErrorKind, SyntaxError};
use crate::syntax::lexer::{interpret_int, unescape, UnescapeError};
use crate::syntax::token::Token;
use std::sync::Arc;

pub mod list;
pub mod render;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A byte range of the input.
///
/// # Examples
///
/// ```rust
/// use brace::ast::Span;
/// let span = Span::new(3, 8);
/// assert_eq!(span.len(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span at `offset`.
    pub const fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// From the start of `self` to the end of `other`.
    pub const fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }
}

/// Wrapper for carrying source span information with any value
#[derive(Debug, Clone, PartialEq)]
pub struct WithSpan<T> {
    pub value: T,
    pub span: Span,
}

pub type AstNode = WithSpan<Expr>;

/// Subtypes of list nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// `(a, b)`: call arguments and lambda formals.
    Parameters,
    /// `{a; b}`
    Block,
    /// `[function, arg, ...]`
    Application,
    /// `[identifier, rhs]` or `[identifier, rhs, block]`
    Definition,
    /// Same shape as `Definition`; always has a block once desugared.
    Let,
    /// `[identifier, rhs]`
    Assignment,
    /// `[test, consequent]`
    Clause,
    /// `[clause, ...]`
    Cond,
    /// `[parameters, block]`
    Lambda,
}

impl ListKind {
    pub const ALL: [ListKind; 9] = [
        Self::Parameters,
        Self::Block,
        Self::Application,
        Self::Definition,
        Self::Let,
        Self::Assignment,
        Self::Clause,
        Self::Cond,
        Self::Lambda,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Parameters => "Parameters",
            Self::Block => "Block",
            Self::Application => "Application",
            Self::Definition => "Def",
            Self::Let => "Let",
            Self::Assignment => "Assignment",
            Self::Clause => "Clause",
            Self::Cond => "Cond",
            Self::Lambda => "Lambda",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    True,
    False,
    Identifier(String),
    Integer(i64),
    String(String),
    List(ListKind, Vec<AstNode>),
    Error(Box<SyntaxError>),
}

impl Expr {
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::True => "true",
            Expr::False => "false",
            Expr::Identifier(_) => "Identifier",
            Expr::Integer(_) => "INTEGER",
            Expr::String(_) => "STRING",
            Expr::List(kind, _) => kind.name(),
            Expr::Error(_) => "ERROR",
        }
    }
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl AstNode {
    pub fn new(value: Expr, span: Span) -> Self {
        Self { value, span }
    }

    pub fn boolean(value: bool, span: Span) -> Self {
        let value = if value { Expr::True } else { Expr::False };
        Self::new(value, span)
    }

    pub fn list(kind: ListKind, items: Vec<AstNode>, span: Span) -> Self {
        Self::new(Expr::List(kind, items), span)
    }

    pub fn empty(kind: ListKind, span: Span) -> Self {
        Self::list(kind, Vec::new(), span)
    }

    /// Builds an identifier from an identifier token of `source`.
    pub fn identifier(source: &Arc<Vec<u8>>, token: &Token) -> Result<Self, SyntaxError> {
        let text = token.text(source);
        match std::str::from_utf8(text) {
            Ok(name) => Ok(Self::new(Expr::Identifier(name.to_string()), token.span)),
            Err(e) => Err(SyntaxError::new(
                ErrorKind::IdSyntax,
                Arc::clone(source),
                token.span.start + e.valid_up_to(),
                Some("identifier is not valid UTF-8"),
            )),
        }
    }

    /// Builds an integer from an integer token of `source`. A value outside
    /// the `i64` range is an `IntRange` error at the token.
    pub fn integer(source: &Arc<Vec<u8>>, token: &Token) -> Result<Self, SyntaxError> {
        interpret_int(token.text(source))
            .map(|n| Self::new(Expr::Integer(n), token.span))
            .ok_or_else(|| {
                SyntaxError::new(
                    ErrorKind::IntRange,
                    Arc::clone(source),
                    token.span.start,
                    Some("integer does not fit in 64 bits"),
                )
            })
    }

    /// Builds a string from a string token of `source`, quotes included,
    /// interpreting its escapes.
    pub fn string(source: &Arc<Vec<u8>>, token: &Token) -> Result<Self, SyntaxError> {
        let content = token.span.start + 1;
        let body = token.text(source).get(1..).unwrap_or_default();
        let fail = |kind, offset, message| {
            SyntaxError::new(kind, Arc::clone(source), offset, Some(message))
        };
        let bytes = match unescape(body, MAX_STRINGLEN, |b| b == b'"') {
            Ok((bytes, _)) => bytes,
            Err(UnescapeError::BadEscape { at }) => {
                return Err(fail(ErrorKind::StrEsc, content + at, "invalid escape sequence"))
            }
            Err(UnescapeError::UnexpectedEnd { .. }) => {
                return Err(fail(ErrorKind::Eof, token.span.start, "unterminated string"))
            }
            Err(UnescapeError::LengthExceeded) => {
                return Err(fail(ErrorKind::StrLen, content + MAX_STRINGLEN, "string too long"))
            }
        };
        String::from_utf8(bytes)
            .map(|s| Self::new(Expr::String(s), token.span))
            .map_err(|_| fail(ErrorKind::StrChar, content, "string is not valid UTF-8"))
    }
}

/// The uniform error node.
impl From<SyntaxError> for AstNode {
    fn from(error: SyntaxError) -> Self {
        let span = Span::at(error.offset);
        Self::new(Expr::Error(Box::new(error)), span)
    }
}

// ============================================================================
// PREDICATES AND ACCESSORS
// ============================================================================

impl AstNode {
    pub fn is_atom(&self) -> bool {
        matches!(
            self.value,
            Expr::True | Expr::False | Expr::Identifier(_) | Expr::Integer(_) | Expr::String(_)
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self.value, Expr::List(..))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.value, Expr::Error(_))
    }

    /// Anything syntactically valid. Exactly one of `is_form` and `is_error`
    /// holds for every node.
    pub fn is_form(&self) -> bool {
        !self.is_error()
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.value, Expr::Identifier(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.value, Expr::Integer(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.value, Expr::String(_))
    }

    pub fn is_true(&self) -> bool {
        matches!(self.value, Expr::True)
    }

    pub fn is_false(&self) -> bool {
        matches!(self.value, Expr::False)
    }

    /// An empty list of any subtype.
    pub fn is_null(&self) -> bool {
        matches!(&self.value, Expr::List(_, items) if items.is_empty())
    }

    /// A non-empty list of any subtype.
    pub fn is_cons(&self) -> bool {
        matches!(&self.value, Expr::List(_, items) if !items.is_empty())
    }

    pub fn list_kind(&self) -> Option<ListKind> {
        match self.value {
            Expr::List(kind, _) => Some(kind),
            _ => None,
        }
    }

    pub fn is_kind(&self, kind: ListKind) -> bool {
        self.list_kind() == Some(kind)
    }

    pub fn is_parameters(&self) -> bool {
        self.is_kind(ListKind::Parameters)
    }

    pub fn is_block(&self) -> bool {
        self.is_kind(ListKind::Block)
    }

    pub fn is_application(&self) -> bool {
        self.is_kind(ListKind::Application)
    }

    pub fn is_definition(&self) -> bool {
        self.is_kind(ListKind::Definition)
    }

    pub fn is_let(&self) -> bool {
        self.is_kind(ListKind::Let)
    }

    pub fn is_assignment(&self) -> bool {
        self.is_kind(ListKind::Assignment)
    }

    pub fn is_clause(&self) -> bool {
        self.is_kind(ListKind::Clause)
    }

    pub fn is_cond(&self) -> bool {
        self.is_kind(ListKind::Cond)
    }

    pub fn is_lambda(&self) -> bool {
        self.is_kind(ListKind::Lambda)
    }

    pub fn items(&self) -> Option<&[AstNode]> {
        match &self.value {
            Expr::List(_, items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut Vec<AstNode>> {
        match &mut self.value {
            Expr::List(_, items) => Some(items),
            _ => None,
        }
    }

    /// First element of a non-empty list.
    ///
    /// # Panics
    ///
    /// On anything but a non-empty list.
    pub fn car(&self) -> &AstNode {
        &self.cons_items("car")[0]
    }

    /// All elements of a non-empty list but the first.
    ///
    /// # Panics
    ///
    /// On anything but a non-empty list.
    pub fn cdr(&self) -> &[AstNode] {
        &self.cons_items("cdr")[1..]
    }

    fn cons_items(&self, op: &str) -> &[AstNode] {
        match &self.value {
            Expr::List(_, items) if !items.is_empty() => items.as_slice(),
            other => panic!("{op} applied to {} node", other.type_name()),
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.value {
            Expr::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            Expr::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Expr::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&SyntaxError> {
        match &self.value {
            Expr::Error(e) => Some(&**e),
            _ => None,
        }
    }

    /// # Panics
    ///
    /// When the node is not an error node.
    pub fn error_kind(&self) -> ErrorKind {
        match &self.value {
            Expr::Error(e) => e.kind,
            other => panic!("error_kind applied to {} node", other.type_name()),
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::{read_token, Cursor};

    fn first_token(input: &str) -> (Arc<Vec<u8>>, Token) {
        let mut cursor = Cursor::new(input);
        let token = read_token(&mut cursor);
        (Arc::clone(cursor.source()), token)
    }

    #[test]
    fn atoms_from_tokens() {
        let (src, tok) = first_token("hello");
        assert_eq!(AstNode::identifier(&src, &tok).unwrap().as_identifier(), Some("hello"));

        let (src, tok) = first_token("-42");
        assert_eq!(AstNode::integer(&src, &tok).unwrap().as_integer(), Some(-42));

        let (src, tok) = first_token(r#""a\tb\"c""#);
        let node = AstNode::string(&src, &tok).unwrap();
        assert_eq!(node.as_str(), Some("a\tb\"c"));
        assert_eq!(node.span, Span::new(0, 9));
    }

    #[test]
    fn out_of_range_integer_is_an_error() {
        let mut cursor = Cursor::new("   99999999999999999999");
        read_token(&mut cursor);
        let tok = read_token(&mut cursor);
        let err = AstNode::integer(cursor.source(), &tok).unwrap_err();
        assert_eq!((err.kind, err.offset), (ErrorKind::IntRange, 3));
        let node = AstNode::from(err);
        assert!(node.is_error() && !node.is_form());
        assert_eq!(node.error_kind(), ErrorKind::IntRange);
    }

    #[test]
    fn bad_escape_reports_the_backslash() {
        let source = Arc::new(br#""ab\q""#.to_vec());
        let tok = Token::new(crate::syntax::TokenKind::String, 0, 6);
        let err = AstNode::string(&source, &tok).unwrap_err();
        assert_eq!((err.kind, err.offset), (ErrorKind::StrEsc, 3));
    }

    #[test]
    fn predicates_partition_nodes() {
        let nodes = [
            AstNode::boolean(true, Span::default()),
            AstNode::new(Expr::Integer(1), Span::default()),
            AstNode::empty(ListKind::Block, Span::default()),
            AstNode::list(
                ListKind::Parameters,
                vec![AstNode::new(Expr::Integer(1), Span::default())],
                Span::default(),
            ),
        ];
        for node in &nodes {
            assert!(node.is_form());
            assert_ne!(node.is_atom(), node.is_list());
        }
        assert!(nodes[0].is_true() && !nodes[0].is_false());
        assert!(nodes[2].is_null() && nodes[2].is_block() && !nodes[2].is_cons());
        assert!(nodes[3].is_cons() && nodes[3].is_parameters());
        assert_eq!(nodes[3].car().as_integer(), Some(1));
        assert!(nodes[3].cdr().is_empty());
    }

    #[test]
    fn empty_lists_keep_their_subtype() {
        let block = AstNode::empty(ListKind::Block, Span::default());
        let params = AstNode::empty(ListKind::Parameters, Span::default());
        assert_ne!(block.list_kind(), params.list_kind());
    }

    #[test]
    #[should_panic(expected = "car applied to INTEGER node")]
    fn car_of_atom_panics() {
        AstNode::new(Expr::Integer(7), Span::default()).car();
    }

    #[test]
    #[should_panic(expected = "cdr applied to Block node")]
    fn cdr_of_empty_list_panics() {
        AstNode::empty(ListKind::Block, Span::default()).cdr();
    }
}
