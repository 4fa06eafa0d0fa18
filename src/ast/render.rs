//! Renderers: s-expression, JSON, ASCII tree and surface syntax.

use super::{AstNode, Expr, ListKind};
use crate::config::MAX_TREE_DEPTH;
use crate::syntax::lexer::escape;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt::{self, Write};

impl AstNode {
    /// `(Block 1 (f x))`. Parameters, Application and Clause lists print
    /// without their subtype name.
    pub fn to_sexp(&self) -> String {
        Sexp(self).to_string()
    }

    /// JSON text; see [`Json`].
    pub fn to_json(&self, always_object: bool) -> String {
        self.json(always_object).to_string()
    }

    pub fn json(&self, always_object: bool) -> Json<'_> {
        Json {
            node: self,
            always_object,
        }
    }

    /// One node per line, children hung off `├──`/`└──` connectors.
    pub fn to_tree(&self) -> String {
        Tree(self).to_string()
    }

    /// The node written back in Brace syntax. For a tree as read by
    /// `read_ast`, reading the result again gives a structurally equal tree.
    /// A desugared tree may not survive: in `let a = def b = 1 {c}` the block
    /// given to the `let` reads back as the `def`'s.
    pub fn to_source(&self) -> String {
        Source(self).to_string()
    }
}

// ============================================================================
// S-EXPRESSIONS
// ============================================================================

pub struct Sexp<'a>(pub &'a AstNode);

impl fmt::Display for Sexp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.value {
            Expr::List(kind, items) => {
                f.write_char('(')?;
                if items.is_empty() {
                    if *kind != ListKind::Parameters {
                        f.write_str(kind.name())?;
                    }
                } else {
                    if !matches!(
                        kind,
                        ListKind::Parameters | ListKind::Application | ListKind::Clause
                    ) {
                        write!(f, "{} ", kind.name())?;
                    }
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            f.write_char(' ')?;
                        }
                        write!(f, "{}", Sexp(item))?;
                    }
                }
                f.write_char(')')
            }
            Expr::Error(e) => write!(f, "(ERROR {})", escape(e.kind.name().as_bytes())),
            _ => write_atom(self.0, f),
        }
    }
}

fn write_atom(node: &AstNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &node.value {
        Expr::True => f.write_str("true"),
        Expr::False => f.write_str("false"),
        Expr::Identifier(name) => f.write_str(name),
        Expr::Integer(n) => write!(f, "{n}"),
        Expr::String(s) => f.write_str(&escape(s.as_bytes())),
        Expr::List(kind, _) => f.write_str(kind.name()),
        Expr::Error(e) => f.write_str(e.kind.name()),
    }
}

// ============================================================================
// JSON
// ============================================================================

/// JSON view of a node.
///
/// Lists become `{"Block": [...]}`, identifiers `{"Identifier": "x"}`,
/// errors `{"Error": "<kind name>"}`. Integers, strings and booleans are
/// bare unless `always_object` is set, in which case they are wrapped as
/// `{"Number": 1}`, `{"String": "s"}` and `{"Boolean": true}`.
pub struct Json<'a> {
    node: &'a AstNode,
    always_object: bool,
}

struct JsonItems<'a> {
    items: &'a [AstNode],
    always_object: bool,
}

impl Serialize for Json<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wrap = self.always_object;
        match &self.node.value {
            Expr::Integer(n) if wrap => single_entry(serializer, "Number", n),
            Expr::Integer(n) => serializer.serialize_i64(*n),
            Expr::String(s) if wrap => single_entry(serializer, "String", s),
            Expr::String(s) => serializer.serialize_str(s),
            Expr::True | Expr::False if wrap => {
                single_entry(serializer, "Boolean", &self.node.is_true())
            }
            Expr::True | Expr::False => serializer.serialize_bool(self.node.is_true()),
            Expr::Identifier(name) => single_entry(serializer, "Identifier", name),
            Expr::List(kind, items) => {
                let items = JsonItems {
                    items,
                    always_object: wrap,
                };
                single_entry(serializer, kind.name(), &items)
            }
            Expr::Error(e) => single_entry(serializer, "Error", e.kind.name()),
        }
    }
}

impl Serialize for JsonItems<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for node in self.items {
            seq.serialize_element(&node.json(self.always_object))?;
        }
        seq.end()
    }
}

fn single_entry<S, V>(serializer: S, key: &str, value: &V) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

impl fmt::Display for Json<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

// ============================================================================
// ASCII TREE
// ============================================================================

pub struct Tree<'a>(pub &'a AstNode);

impl fmt::Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(self.0, &mut String::new(), None, 0, f)
    }
}

/// `last` is `None` for the root, otherwise whether the node is the last of
/// its siblings. `rails` holds the indentation contributed by ancestors.
fn write_tree(
    node: &AstNode,
    rails: &mut String,
    last: Option<bool>,
    depth: usize,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.write_str(rails)?;
    if let Some(last) = last {
        f.write_str(if last { "└── " } else { "├── " })?;
    }
    match &node.value {
        Expr::List(kind, items) if items.is_empty() => writeln!(f, "NULL {}", kind.name()),
        Expr::List(kind, items) => {
            writeln!(f, "{}", kind.name())?;
            let mark = rails.len();
            if let Some(last) = last {
                rails.push_str(if last { "    " } else { "│   " });
            }
            if depth >= MAX_TREE_DEPTH {
                writeln!(f, "{rails}MAX TREE DEPTH EXCEEDED")?;
            } else {
                for (i, child) in items.iter().enumerate() {
                    write_tree(child, rails, Some(i + 1 == items.len()), depth + 1, f)?;
                }
            }
            rails.truncate(mark);
            Ok(())
        }
        Expr::Error(e) => writeln!(f, "ERROR: {}", e.kind.name()),
        _ => {
            write_atom(node, f)?;
            f.write_char('\n')
        }
    }
}

// ============================================================================
// SURFACE SYNTAX
// ============================================================================

pub struct Source<'a>(pub &'a AstNode);

impl fmt::Display for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Expr::List(kind, items) = &self.0.value else {
            return match &self.0.value {
                Expr::Error(e) => write!(f, "<error: {}>", e.kind.name()),
                _ => write_atom(self.0, f),
            };
        };
        match (kind, items.as_slice()) {
            (ListKind::Parameters, items) => {
                f.write_char('(')?;
                join(f, items, ", ")?;
                f.write_char(')')
            }
            (ListKind::Block, items) => {
                f.write_char('{')?;
                join(f, items, "; ")?;
                f.write_char('}')
            }
            (ListKind::Application, [function, args @ ..]) => {
                write!(f, "{}(", Source(function))?;
                join(f, args, ", ")?;
                f.write_char(')')
            }
            (ListKind::Definition | ListKind::Let, [id, rhs, block @ ..]) => {
                let binder = if *kind == ListKind::Let { "let" } else { "def" };
                write!(f, "{binder} {} = {}", Source(id), Source(rhs))?;
                for b in block {
                    write!(f, " {}", Source(b))?;
                }
                Ok(())
            }
            (ListKind::Assignment, [id, rhs]) => write!(f, "{} = {}", Source(id), Source(rhs)),
            (ListKind::Clause, [test, consequent]) => {
                write!(f, "({} => {})", Source(test), Source(consequent))
            }
            (ListKind::Cond, clauses) => {
                f.write_str("cond")?;
                for clause in clauses {
                    write!(f, " {}", Source(clause))?;
                }
                Ok(())
            }
            (ListKind::Lambda, [params, body]) => {
                write!(f, "lambda{} {}", Source(params), Source(body))
            }
            _ => write!(f, "{}", Sexp(self.0)),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, items: &[AstNode], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", Source(item))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::Cursor;
    use crate::syntax::desugar::fixup;
    use crate::syntax::parser::{read_ast, read_program};

    fn parse(input: &str) -> AstNode {
        read_program(&mut Cursor::new(input)).unwrap().unwrap()
    }

    #[test]
    fn sexp_output() {
        assert_eq!(parse("f(x, {1; 2})").to_sexp(), "(f x (Block 1 2))");
        assert_eq!(parse("f()").to_sexp(), "(f)");
        assert_eq!(parse("{}").to_sexp(), "(Block)");
        assert_eq!(parse("lambda() {}").to_sexp(), "(Lambda () (Block))");
        assert_eq!(
            parse("cond (a => \"yes\\n\")").to_sexp(),
            "(Cond (a \"yes\\n\"))"
        );
        assert_eq!(parse("let x = -5").to_sexp(), "(Let x -5 (Block))");
    }

    #[test]
    fn json_output() {
        let tree = parse("f(x, {1; \"s\"})");
        assert_eq!(
            tree.to_json(false),
            r#"{"Application":[{"Identifier":"f"},{"Identifier":"x"},{"Block":[1,"s"]}]}"#
        );
        assert_eq!(
            tree.to_json(true),
            r#"{"Application":[{"Identifier":"f"},{"Identifier":"x"},{"Block":[{"Number":1},{"String":"s"}]}]}"#
        );
        assert_eq!(parse("{}").to_json(false), r#"{"Block":[]}"#);
    }

    #[test]
    fn json_for_booleans_and_errors() {
        use crate::ast::Span;
        let t = AstNode::boolean(true, Span::default());
        assert_eq!(t.to_json(false), "true");
        assert_eq!(t.to_json(true), r#"{"Boolean":true}"#);
        let err = read_program(&mut Cursor::new(")")).unwrap_err();
        assert_eq!(AstNode::from(err).to_json(false), r#"{"Error":"Illegal character"}"#);
    }

    #[test]
    fn tree_output() {
        let expected = "\
Application
├── f
├── x
└── Block
    ├── 1
    └── Parameters
        └── \"s\"
";
        assert_eq!(parse("f(x, {1; (\"s\")})").to_tree(), expected);
        assert_eq!(parse("{}").to_tree(), "NULL Block\n");
        assert_eq!(parse("f(g(), 1)").to_tree(), "Application\n├── f\n├── Application\n│   └── g\n└── 1\n");
    }

    #[test]
    fn tree_depth_is_capped() {
        use crate::ast::Span;
        let mut node = AstNode::new(Expr::Integer(0), Span::default());
        for _ in 0..MAX_TREE_DEPTH + 5 {
            node = AstNode::list(ListKind::Block, vec![node], Span::default());
        }
        let text = node.to_tree();
        assert!(text.ends_with("MAX TREE DEPTH EXCEEDED\n"));
        assert_eq!(text.lines().count(), MAX_TREE_DEPTH + 2);
    }

    #[test]
    fn source_output_reads_back() {
        for input in [
            "{let a = def b = 1; c}",
            "{let a = x = def b = 1; c}",
            "let a = let b = 1 {b}",
            "f(a, b)(c)",
            "{a; b = 1; \"s\\t\"}",
            "lambda(x, y) {add(x, y)}(1, 2)",
            "cond (eq(a, 1) => \"one\") (true => {a})",
            "{let a = 5; add(a, 1)}",
            "def f = lambda() {1} {f()}",
            "{a}(-7)",
        ] {
            let tree = read_ast(&mut Cursor::new(input)).unwrap().unwrap();
            let source = tree.to_source();
            let again = read_ast(&mut Cursor::new(source.as_str())).unwrap().unwrap();
            assert!(again.equal(&tree), "{input} -> {source}");
            assert!(fixup(&again).equal(&parse(input)), "{input} -> {source}");
        }
        assert_eq!(parse("{let a = 5; add(a,1)}").to_source(), "{let a = 5 {add(a, 1)}}");
    }
}
