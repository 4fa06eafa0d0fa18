//! `let` desugaring.
//!
//! A `let` without a block scopes over the rest of its enclosing block:
//!
//! ```text
//! {123; let a = 5; add(a, 1); 456}  =>  {123; let a = 5 {add(a, 1); 456}}
//! ```
//!
//! and a `let` anywhere else without a block gets an empty one. After this
//! pass every `let` node has exactly three elements.

use crate::ast::{AstNode, Expr, ListKind, Span};

/// Returns the desugared copy of `node`.
pub fn fixup(node: &AstNode) -> AstNode {
    match &node.value {
        Expr::List(ListKind::Let, items) => fixup_let(items, node.span),
        Expr::List(ListKind::Block, items) => fixup_block(items, node.span),
        Expr::List(..) => node.map(fixup),
        _ => node.clone(),
    }
}

fn fixup_let(items: &[AstNode], span: Span) -> AstNode {
    let (id, rhs, block) = match items {
        [id, rhs] => (id, rhs, AstNode::empty(ListKind::Block, Span::at(span.end))),
        [id, rhs, block] => (id, rhs, fixup(block)),
        _ => panic!("let node with {} elements", items.len()),
    };
    AstNode::list(ListKind::Let, vec![id.clone(), fixup(rhs), block], span)
}

fn fixup_block(statements: &[AstNode], span: Span) -> AstNode {
    let mut out = Vec::with_capacity(statements.len());
    for (i, statement) in statements.iter().enumerate() {
        let Expr::List(ListKind::Let, parts) = &statement.value else {
            out.push(fixup(statement));
            continue;
        };
        let [id, rhs] = parts.as_slice() else {
            out.push(fixup(statement));
            continue;
        };
        let rest = &statements[i + 1..];
        let scope_start = rest.first().map_or(statement.span.end, AstNode::start);
        let scope = fixup_block(rest, Span::new(scope_start, span.end));
        let scoped = AstNode::list(
            ListKind::Let,
            vec![id.clone(), fixup(rhs), scope],
            Span::new(statement.span.start, span.end),
        );
        out.push(scoped);
        break;
    }
    AstNode::list(ListKind::Block, out, span)
}
