//! Generic list operations over AST nodes.
//!
//! These work on any list subtype and never inspect what a subtype means.

use super::{AstNode, Expr};

impl AstNode {
    /// A new list of the same subtype holding `f` of every element.
    ///
    /// # Panics
    ///
    /// When the node is not a list.
    pub fn map(&self, mut f: impl FnMut(&AstNode) -> AstNode) -> AstNode {
        match &self.value {
            Expr::List(kind, items) => {
                AstNode::list(*kind, items.iter().map(|item| f(item)).collect(), self.span)
            }
            other => panic!("map applied to {} node", other.type_name()),
        }
    }

    /// Left fold over the elements.
    ///
    /// # Panics
    ///
    /// When the node is not a list.
    pub fn reduce<R>(&self, init: R, f: impl FnMut(R, &AstNode) -> R) -> R {
        match &self.value {
            Expr::List(_, items) => items.iter().fold(init, f),
            other => panic!("reduce applied to {} node", other.type_name()),
        }
    }

    /// Number of elements; zero for anything that is not a list.
    pub fn length(&self) -> usize {
        self.items().map_or(0, <[AstNode]>::len)
    }

    /// Reverses the elements in place. Returns `false`, leaving the node
    /// alone, when it is not a list.
    pub fn nreverse(&mut self) -> bool {
        match self.items_mut() {
            Some(items) if items.len() < 2 => true,
            Some(items) => {
                items.reverse();
                true
            }
            None => false,
        }
    }

    /// Copy of the whole tree.
    pub fn deep_copy(&self) -> AstNode {
        self.clone()
    }

    /// Copy of this node alone: same variant and subtype, lists without
    /// their elements.
    pub fn node_copy(&self) -> AstNode {
        match &self.value {
            Expr::List(kind, _) => AstNode::empty(*kind, self.span),
            _ => self.clone(),
        }
    }

    /// Shallow equality: variant, list subtype, atom payload, and error kind
    /// and message. Children and spans are not compared.
    pub fn node_equal(&self, other: &AstNode) -> bool {
        match (&self.value, &other.value) {
            (Expr::True, Expr::True) | (Expr::False, Expr::False) => true,
            (Expr::Identifier(a), Expr::Identifier(b)) => a == b,
            (Expr::Integer(a), Expr::Integer(b)) => a == b,
            (Expr::String(a), Expr::String(b)) => a == b,
            (Expr::List(a, _), Expr::List(b, _)) => a == b,
            (Expr::Error(a), Expr::Error(b)) => a.kind == b.kind && a.message == b.message,
            _ => false,
        }
    }

    /// Deep structural equality, ignoring spans.
    pub fn equal(&self, other: &AstNode) -> bool {
        if !self.node_equal(other) {
            return false;
        }
        match (self.items(), other.items()) {
            (Some(a), Some(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equal(y)),
            _ => true,
        }
    }

    /// Number of levels in the tree rooted here; an atom is 1.
    pub fn height(&self) -> usize {
        1 + self
            .items()
            .unwrap_or_default()
            .iter()
            .map(AstNode::height)
            .max()
            .unwrap_or(0)
    }

    /// A list whose elements are all atoms or proper lists. An error
    /// anywhere inside disqualifies it.
    pub fn is_proper_list(&self) -> bool {
        match &self.value {
            Expr::List(_, items) => items.iter().all(|item| item.is_atom() || item.is_proper_list()),
            _ => false,
        }
    }
}
