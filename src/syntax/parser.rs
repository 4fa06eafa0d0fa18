//! Brace Parser
//!
//! Recursive descent over tokens pulled on demand from a [`Cursor`]. Each
//! production returns `Result<AstNode, SyntaxError>`; the first error stops
//! the enclosing reads and is handed back unchanged, so a successful result
//! never contains an error node.

use crate::ast::{AstNode, ListKind, Span};
use crate::config::MAX_NESTING_DEPTH;
use crate::errors::{ErrorKind, SyntaxError};
use crate::syntax::desugar::fixup;
use crate::syntax::lexer::{read_token, Cursor};
use crate::syntax::token::{Token, TokenKind};
use std::sync::Arc;

type ParseResult = Result<AstNode, SyntaxError>;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Reads one program and desugars it. `Ok(None)` means only whitespace and
/// comments were left. Trailing input is not consumed; call again to check
/// for it.
pub fn read_program(cursor: &mut Cursor) -> Result<Option<AstNode>, SyntaxError> {
    let mut parser = Parser::new(cursor);
    let Some(program) = parser.read_ast()? else {
        return Ok(None);
    };
    if program.is_parameters() {
        return Err(parser.error(ErrorKind::Program, program.start(), "This is a parameter list"));
    }
    Ok(Some(fixup(&program)))
}

/// Reads one expression as written: no program-shape check, no desugaring.
pub fn read_ast(cursor: &mut Cursor) -> Result<Option<AstNode>, SyntaxError> {
    Parser::new(cursor).read_ast()
}

// ============================================================================
// SEPARATED LISTS
// ============================================================================

struct ListRule {
    kind: ListKind,
    close: TokenKind,
    separator: TokenKind,
    error: ErrorKind,
    accepts: fn(&AstNode) -> bool,
}

const PARAMETERS: ListRule = ListRule {
    kind: ListKind::Parameters,
    close: TokenKind::CloseParen,
    separator: TokenKind::Comma,
    error: ErrorKind::Parameters,
    accepts: AstNode::is_form,
};

/// Lambda formals: identifiers only.
const FORMALS: ListRule = ListRule {
    accepts: AstNode::is_identifier,
    ..PARAMETERS
};

const BLOCK: ListRule = ListRule {
    kind: ListKind::Block,
    close: TokenKind::CloseBrace,
    separator: TokenKind::Semicolon,
    error: ErrorKind::Block,
    accepts: AstNode::is_form,
};

const CLAUSE: ListRule = ListRule {
    kind: ListKind::Clause,
    close: TokenKind::CloseParen,
    separator: TokenKind::Arrow,
    error: ErrorKind::Cond,
    accepts: AstNode::is_form,
};

// ============================================================================
// PARSER
// ============================================================================

struct Parser<'c> {
    cursor: &'c mut Cursor,
    source: Arc<Vec<u8>>,
    depth: usize,
}

impl<'c> Parser<'c> {
    fn new(cursor: &'c mut Cursor) -> Self {
        let source = Arc::clone(cursor.source());
        Self {
            cursor,
            source,
            depth: 0,
        }
    }

    fn next_token(&mut self) -> Token {
        next_significant(self.cursor)
    }

    fn peek_token(&self) -> Token {
        next_significant(&mut self.cursor.clone())
    }

    fn error(&self, kind: ErrorKind, offset: usize, message: &str) -> SyntaxError {
        SyntaxError::new(kind, Arc::clone(&self.source), offset, Some(message))
    }

    /// Input ran out inside `construct`.
    fn eof(&self, construct: &str) -> SyntaxError {
        self.error(ErrorKind::Eof, self.cursor.position(), construct)
    }

    fn check_depth(&self, extra: usize, offset: usize) -> Result<(), SyntaxError> {
        if self.depth + extra > MAX_NESTING_DEPTH {
            let message = format!("nesting exceeds {MAX_NESTING_DEPTH} levels");
            return Err(self.error(ErrorKind::Depth, offset, &message));
        }
        Ok(())
    }

    /// Consumes the next token, which must be `kind`.
    fn expect(
        &mut self,
        kind: TokenKind,
        error: ErrorKind,
        construct: &str,
        message: &str,
    ) -> Result<Token, SyntaxError> {
        let token = self.next_token();
        if token.kind == kind {
            Ok(token)
        } else if token.kind == TokenKind::Eof {
            Err(self.eof(construct))
        } else {
            Err(self.error(error, token.span.start, message))
        }
    }

    /// Turns a sub-read into a value of the expected shape: errors pass
    /// through, end of input becomes an `Eof` error naming `construct`, and
    /// a value failing `accepts` becomes a `kind` error at that value.
    fn check(
        &self,
        result: Result<Option<AstNode>, SyntaxError>,
        accepts: fn(&AstNode) -> bool,
        kind: ErrorKind,
        construct: &str,
        message: &str,
    ) -> ParseResult {
        let node = result?.ok_or_else(|| self.eof(construct))?;
        if accepts(&node) {
            Ok(node)
        } else {
            Err(self.error(kind, node.start(), message))
        }
    }

    fn read_ast(&mut self) -> Result<Option<AstNode>, SyntaxError> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            return Ok(None);
        }
        self.depth += 1;
        let result = self
            .check_depth(0, token.span.start)
            .and_then(|()| self.dispatch(token));
        self.depth -= 1;
        result.map(Some)
    }

    fn dispatch(&mut self, token: Token) -> ParseResult {
        match token.kind {
            TokenKind::OpenParen => self.read_list(&PARAMETERS, token, 0),
            TokenKind::OpenBrace => {
                let block = self.read_list(&BLOCK, token, 0)?;
                self.read_applications(block)
            }
            TokenKind::Lambda | TokenKind::LambdaAlt => {
                let lambda = self.read_lambda(token)?;
                self.read_applications(lambda)
            }
            TokenKind::Cond => self.read_cond(token),
            TokenKind::Def | TokenKind::Let => self.read_definition(token),
            TokenKind::Identifier => {
                let id = AstNode::identifier(&self.source, &token)?;
                if self.peek_token().kind == TokenKind::Equals {
                    self.read_assignment(id)
                } else {
                    self.read_applications(id)
                }
            }
            TokenKind::String => AstNode::string(&self.source, &token),
            TokenKind::Integer => AstNode::integer(&self.source, &token),
            _ => Err(self.reject(token)),
        }
    }

    /// The error for a token that cannot start an expression.
    fn reject(&self, token: Token) -> SyntaxError {
        use TokenKind as T;
        let at = token.span.start;
        let (kind, offset, message) = match token.kind {
            T::Equals => (ErrorKind::BadChar, at, "spurious equals sign"),
            T::Arrow => (ErrorKind::BadChar, at, "spurious arrow"),
            T::CloseBrace => (ErrorKind::BadChar, at, "spurious closing brace"),
            T::CloseParen => (ErrorKind::BadChar, at, "spurious closing paren"),
            T::Comma => (ErrorKind::BadChar, at, "spurious comma"),
            T::Semicolon => (ErrorKind::BadChar, at, "spurious semicolon"),
            T::Eof => return self.eof("expression"),
            T::UnterminatedString => (ErrorKind::Eof, at, "unterminated string"),
            T::Panic => (ErrorKind::Lexer, at, "read position is outside the input"),
            T::BadIdChar => (ErrorKind::IdSyntax, token.error_offset(), "invalid character in identifier"),
            T::BadIdLen => (ErrorKind::IdLen, token.error_offset(), "identifier too long"),
            T::BadIntChar => (ErrorKind::IntSyntax, token.error_offset(), "invalid character in integer"),
            T::BadIntLen => (ErrorKind::IntLen, token.error_offset(), "integer too long"),
            T::BadStringChar => (ErrorKind::StrChar, token.error_offset(), "invalid character in string"),
            T::BadStringEscape => (ErrorKind::StrEsc, token.error_offset(), "invalid escape sequence"),
            T::BadStringLen => (ErrorKind::StrLen, token.error_offset(), "string too long"),
            T::BadChar => (ErrorKind::BadChar, token.error_offset(), "illegal character"),
            T::BadWhitespace => (ErrorKind::BadChar, token.error_offset(), "whitespace run too long"),
            T::BadComment => (ErrorKind::BadChar, token.error_offset(), "comment too long"),
            T::Whitespace | T::Comment => unreachable!("whitespace and comments are skipped"),
            T::OpenParen
            | T::OpenBrace
            | T::Lambda
            | T::LambdaAlt
            | T::Cond
            | T::Def
            | T::Let
            | T::Identifier
            | T::String
            | T::Integer => unreachable!("{} starts an expression", token.kind.name()),
        };
        self.error(kind, offset, message)
    }

    /// `nested` counts the levels between the node being read and this list:
    /// lambda formals, lambda bodies and cond clauses sit one level below.
    fn read_list(&mut self, rule: &ListRule, open: Token, nested: usize) -> ParseResult {
        let (items, span) = self.read_delimited(rule, open, nested)?;
        Ok(AstNode::list(rule.kind, items, span))
    }

    /// Reads the elements up to and including the closer, given the opener.
    fn read_delimited(
        &mut self,
        rule: &ListRule,
        open: Token,
        nested: usize,
    ) -> Result<(Vec<AstNode>, Span), SyntaxError> {
        if self.peek_token().kind == rule.close {
            let close = self.next_token();
            return Ok((Vec::new(), open.span.to(close.span)));
        }
        let mut items = Vec::new();
        let depth = self.depth;
        self.depth += nested;
        let result = self.read_items(rule, &mut items);
        self.depth = depth;
        let close = result?;
        Ok((items, open.span.to(close.span)))
    }

    fn read_items(&mut self, rule: &ListRule, items: &mut Vec<AstNode>) -> Result<Token, SyntaxError> {
        loop {
            let item = self.read_ast()?.ok_or_else(|| self.eof(rule.kind.name()))?;
            if rule.kind == ListKind::Parameters && item.is_parameters() {
                return Err(self.error(ErrorKind::Parameters, item.start(), "parameters not allowed here"));
            }
            if !(rule.accepts)(&item) {
                return Err(self.error(rule.error, item.start(), "syntax error here"));
            }
            // The rest of the block ends up in a block inside this let.
            if rule.kind == ListKind::Block && item.is_let() && item.length() == 2 {
                self.depth += 2;
                self.check_depth(0, item.start())?;
            }
            items.push(item);

            let token = self.next_token();
            if token.kind == rule.close {
                return Ok(token);
            }
            if token.kind == rule.separator {
                let next = self.peek_token();
                if next.kind == rule.close {
                    return Err(self.error(
                        ErrorKind::BadChar,
                        next.span.start,
                        "spurious separator (or missing item) here",
                    ));
                }
                continue;
            }
            if token.kind == TokenKind::Eof {
                return Err(self.eof(rule.kind.name()));
            }
            return Err(self.error(rule.error, token.span.start, "expected separator here"));
        }
    }

    /// `f(a)(b)` applies `f(a)` to `(b)`.
    ///
    /// Each fold pushes everything read so far one level down, including
    /// the arguments of earlier folds, so the chain is checked against the
    /// height of the tree it builds rather than the depth it was read at.
    fn read_applications(&mut self, function: AstNode) -> ParseResult {
        if self.peek_token().kind != TokenKind::OpenParen {
            return Ok(function);
        }
        let mut height = desugared_height(&function);
        let mut application = function;
        while self.peek_token().kind == TokenKind::OpenParen {
            let open = self.next_token();
            let (args, args_span) = self.read_delimited(&PARAMETERS, open, 0)?;
            let args_height = args.iter().map(desugared_height).max().unwrap_or(0);
            height = 1 + height.max(args_height);
            self.check_depth(height - 1, application.start())?;
            let span = application.span.to(args_span);
            let mut items = Vec::with_capacity(args.len() + 1);
            items.push(application);
            items.extend(args);
            application = AstNode::list(ListKind::Application, items, span);
        }
        Ok(application)
    }

    fn read_assignment(&mut self, id: AstNode) -> ParseResult {
        self.next_token();
        let rhs = self.read_ast();
        let rhs = self.check(
            rhs,
            AstNode::is_form,
            ErrorKind::Assignment,
            "assignment",
            "expected expression",
        )?;
        let span = id.span.to(rhs.span);
        Ok(AstNode::list(ListKind::Assignment, vec![id, rhs], span))
    }

    fn read_definition(&mut self, binder: Token) -> ParseResult {
        let (kind, construct) = match binder.kind {
            TokenKind::Let => (ListKind::Let, "let"),
            _ => (ListKind::Definition, "def"),
        };
        let name = self.expect(
            TokenKind::Identifier,
            ErrorKind::Definition,
            construct,
            "expected identifier",
        )?;
        let id = AstNode::identifier(&self.source, &name)?;
        self.expect(
            TokenKind::Equals,
            ErrorKind::Definition,
            construct,
            "expected equals sign following identifier",
        )?;
        let rhs = self.read_ast();
        let rhs = self.check(
            rhs,
            AstNode::is_form,
            ErrorKind::Definition,
            construct,
            "expected expression",
        )?;
        let mut end = rhs.span;
        let mut items = vec![id, rhs];
        if self.peek_token().kind == TokenKind::OpenBrace {
            let block = self.read_ast();
            let block = self.check(
                block,
                AstNode::is_block,
                ErrorKind::Definition,
                construct,
                "expected code block",
            )?;
            end = block.span;
            items.push(block);
        }
        Ok(AstNode::list(kind, items, binder.span.to(end)))
    }

    fn read_lambda(&mut self, keyword: Token) -> ParseResult {
        let open = self.expect(
            TokenKind::OpenParen,
            ErrorKind::Parameters,
            "lambda",
            "missing parameter list for lambda",
        )?;
        let params = self.read_list(&FORMALS, open, 1)?;
        let open = self.expect(
            TokenKind::OpenBrace,
            ErrorKind::Lambda,
            "lambda",
            "missing function body for lambda",
        )?;
        let body = self.read_list(&BLOCK, open, 1)?;
        let span = keyword.span.to(body.span);
        Ok(AstNode::list(ListKind::Lambda, vec![params, body], span))
    }

    fn read_cond(&mut self, keyword: Token) -> ParseResult {
        let mut clauses = Vec::new();
        let mut end = keyword.span;
        loop {
            let open = self.expect(TokenKind::OpenParen, ErrorKind::Cond, "cond", "expected cond clause")?;
            let (items, span) = self.read_delimited(&CLAUSE, open, 1)?;
            if items.len() != 2 {
                return Err(self.error(
                    ErrorKind::Cond,
                    span.start,
                    "improper cond clause: should be (test => consequent)",
                ));
            }
            clauses.push(AstNode::list(ListKind::Clause, items, span));
            end = span;
            if self.peek_token().kind != TokenKind::OpenParen {
                break;
            }
        }
        Ok(AstNode::list(ListKind::Cond, clauses, keyword.span.to(end)))
    }
}

/// Height of `node` once desugared: each unscoped `let` in a block moves the
/// statements after it two levels down.
fn desugared_height(node: &AstNode) -> usize {
    let Some(items) = node.items() else {
        return 1;
    };
    let mut shift = 0;
    let mut height = 0;
    for item in items {
        height = height.max(shift + desugared_height(item));
        if node.is_block() && item.is_let() && item.length() == 2 {
            shift += 2;
        }
    }
    1 + height
}

fn next_significant(cursor: &mut Cursor) -> Token {
    loop {
        let token = read_token(cursor);
        if !token.kind.is_atmosphere() {
            return token;
        }
    }
}
