//! Randomized tests: generated programs must survive a trip through the
//! source renderer, and arbitrary bytes must never crash the reader.

use brace::syntax::desugar::fixup;
use brace::syntax::read_ast;
use brace::{read_program, AstNode, Cursor};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const ROUNDS: usize = 500;

// ============================================================================
// PROGRAM GENERATOR
// ============================================================================

struct Gen {
    rng: Xoshiro256PlusPlus,
}

impl Gen {
    fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    fn identifier(&mut self) -> String {
        let len = self.rng.gen_range(0..6);
        let tail: String = (0..len)
            .map(|_| char::from(self.rng.gen_range(b'a'..=b'z')))
            .collect();
        format!("v{tail}")
    }

    fn integer(&mut self) -> String {
        match self.rng.gen_range(0..4) {
            0 => i64::MIN.to_string(),
            1 => i64::MAX.to_string(),
            _ => self.rng.gen_range(-1000i64..1000).to_string(),
        }
    }

    fn string(&mut self) -> String {
        const PIECES: [&str; 8] = ["a", "Z", " ", "\\n", "\\t", "\\\"", "\\\\", "é"];
        let len = self.rng.gen_range(0..8);
        let body: String = (0..len)
            .map(|_| PIECES[self.rng.gen_range(0..PIECES.len())])
            .collect();
        format!("\"{body}\"")
    }

    fn list(&mut self, depth: usize, sep: &str) -> String {
        let len = self.rng.gen_range(0..4);
        (0..len)
            .map(|_| self.expr(depth + 1))
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn block(&mut self, depth: usize) -> String {
        format!("{{{}}}", self.list(depth, "; "))
    }

    fn lambda(&mut self, depth: usize) -> String {
        let arity = self.rng.gen_range(0..3);
        let params: Vec<String> = (0..arity).map(|_| self.identifier()).collect();
        format!("lambda({}) {}", params.join(", "), self.block(depth))
    }

    fn expr(&mut self, depth: usize) -> String {
        let choices = if depth > 4 { 3 } else { 10 };
        match self.rng.gen_range(0..choices) {
            0 => self.identifier(),
            1 => self.integer(),
            2 => self.string(),
            3 => self.block(depth),
            4 => self.lambda(depth),
            5 => {
                let function = match self.rng.gen_range(0..3) {
                    0 => self.block(depth),
                    1 => self.lambda(depth),
                    _ => self.identifier(),
                };
                let calls = self.rng.gen_range(1..3);
                let args: String = (0..calls)
                    .map(|_| format!("({})", self.list(depth, ", ")))
                    .collect();
                format!("{function}{args}")
            }
            6 => {
                let binder = if self.rng.gen_bool(0.5) { "let" } else { "def" };
                let id = self.identifier();
                let rhs = self.expr(depth + 1);
                if self.rng.gen_bool(0.5) {
                    format!("{binder} {id} = {rhs} {}", self.block(depth))
                } else {
                    format!("{binder} {id} = {rhs}")
                }
            }
            7 => format!("{} = {}", self.identifier(), self.expr(depth + 1)),
            8 => {
                let clauses = self.rng.gen_range(1..3);
                let clauses: Vec<String> = (0..clauses)
                    .map(|_| format!("({} => {})", self.expr(depth + 1), self.expr(depth + 1)))
                    .collect();
                format!("cond {}", clauses.join(" "))
            }
            _ => {
                // Unscoped lets inside a block.
                let lets: String = (0..self.rng.gen_range(1..3))
                    .map(|_| format!("let {} = {}; ", self.identifier(), self.expr(depth + 1)))
                    .collect();
                format!("{{{lets}{}}}", self.expr(depth + 1))
            }
        }
    }
}

fn parse(input: &str) -> AstNode {
    match read_program(&mut Cursor::new(input)) {
        Ok(Some(node)) => node,
        other => panic!("{input:?}: {other:?}"),
    }
}

fn parse_raw(input: &str) -> AstNode {
    match read_ast(&mut Cursor::new(input)) {
        Ok(Some(node)) => node,
        other => panic!("{input:?}: {other:?}"),
    }
}

fn every_let_has_a_block(node: &AstNode) -> bool {
    (!node.is_let() || node.length() == 3)
        && node.items().unwrap_or_default().iter().all(every_let_has_a_block)
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn generated_programs_parse_and_read_back() {
    let mut gen = Gen::new(0x5EED);
    for _ in 0..ROUNDS {
        let input = gen.expr(0);
        let program = parse(&input);
        assert!(every_let_has_a_block(&program), "{input}");

        let written = parse_raw(&input);
        let rendered = written.to_source();
        let again = parse_raw(&rendered);
        assert!(again.equal(&written), "{input}\n -> {rendered}");
        assert_eq!(again.to_source(), rendered);
        assert!(fixup(&again).equal(&program), "{input}\n -> {rendered}");
        assert!(fixup(&program).equal(&program), "{input}");
    }
}

#[test]
fn generated_programs_render_in_every_format() {
    let mut gen = Gen::new(7);
    for _ in 0..ROUNDS {
        let program = parse(&gen.expr(0));
        let json: serde_json::Value = serde_json::from_str(&program.to_json(false)).unwrap();
        assert!(json.is_object() || !program.is_list());
        assert!(serde_json::from_str::<serde_json::Value>(&program.to_json(true)).is_ok());
        assert!(!program.to_sexp().is_empty());
        assert!(program.to_tree().ends_with('\n'));
    }
}

#[test]
fn copies_and_reversals_preserve_structure() {
    let mut gen = Gen::new(42);
    for _ in 0..ROUNDS {
        let program = parse(&gen.expr(0));
        let copy = program.deep_copy();
        assert!(copy.equal(&program));
        assert!(program.node_copy().node_equal(&program));

        let mut reversed = program.deep_copy();
        assert_eq!(reversed.nreverse(), program.is_list());
        assert_eq!(reversed.length(), program.length());
        reversed.nreverse();
        assert!(reversed.equal(&program));
    }
}

#[test]
fn random_bytes_never_panic() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1234);
    const ALPHABET: &[u8] = b"(){},;=> \t\n\"\\/abc019-+\x01\x7f\xc3\xa9\xf6";
    for _ in 0..ROUNDS * 4 {
        let len = rng.gen_range(0..40);
        let bytes: Vec<u8> = (0..len)
            .map(|_| {
                if rng.gen_bool(0.9) {
                    ALPHABET[rng.gen_range(0..ALPHABET.len())]
                } else {
                    rng.gen()
                }
            })
            .collect();
        let mut cursor = Cursor::new(bytes.clone());
        loop {
            match read_program(&mut cursor) {
                Ok(Some(node)) => {
                    let _ = (node.to_sexp(), node.to_json(true), node.to_tree(), node.to_source());
                }
                Ok(None) => break,
                Err(e) => {
                    assert!(e.offset <= bytes.len(), "{bytes:?}: {e}");
                    let mut out = Vec::new();
                    brace::errors::write_error(&mut out, &e).unwrap();
                    break;
                }
            }
        }
    }
}

#[test]
fn random_token_soup_never_panics() {
    const WORDS: [&str; 16] = [
        "(", ")", "{", "}", ",", ";", "=", "=>", "lambda", "cond", "let", "def", "x", "1", "\"s\"", " ",
    ];
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
    for _ in 0..ROUNDS * 4 {
        let len = rng.gen_range(0..30);
        let input: String = (0..len)
            .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
            .collect::<Vec<_>>()
            .join(" ");
        let mut cursor = Cursor::new(input.as_str());
        while let Ok(Some(_)) = read_program(&mut cursor) {}
    }
}
