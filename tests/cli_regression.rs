// Regression tests for the `brace` binary: output formats, error reports and
// exit codes.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn brace() -> Command {
    let mut cmd = Command::cargo_bin("brace").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_prints_json_by_default() {
    brace()
        .write_stdin("f(1, \"s\")")
        .assert()
        .success()
        .stdout("{\"Application\":[{\"Identifier\":\"f\"},1,\"s\"]}\n");
}

#[test]
fn cli_wraps_atoms_with_always_object() {
    brace()
        .arg("-a")
        .write_stdin("f(1)")
        .assert()
        .success()
        .stdout("{\"Application\":[{\"Identifier\":\"f\"},{\"Number\":1}]}\n");
}

#[test]
fn cli_prints_sexp_tree_and_source() {
    brace()
        .arg("--sexp")
        .write_stdin("{let a = 5; add(a, 1)}")
        .assert()
        .success()
        .stdout("(Block (Let a 5 (Block (add a 1))))\n");
    brace()
        .arg("-t")
        .write_stdin("f(1)")
        .assert()
        .success()
        .stdout("Application\n├── f\n└── 1\n");
    brace()
        .arg("--source")
        .write_stdin("{let a = 5; a}")
        .assert()
        .success()
        .stdout("{let a = 5 {a}}\n");
}

#[test]
fn cli_reads_program_from_file() {
    let path = std::env::temp_dir().join(format!("brace-cli-{}.br", std::process::id()));
    fs::write(&path, "// comment\ncond (a => 1)\n").unwrap();
    brace()
        .arg("-s")
        .arg(&path)
        .assert()
        .success()
        .stdout("(Cond (a 1))\n");
    let _ = fs::remove_file(&path);
}

#[test]
fn cli_lists_keywords() {
    brace()
        .arg("-k")
        .assert()
        .success()
        .stdout(contains("lambda").and(contains("cond")).and(contains("let")));
}

#[test]
fn cli_traces_tokens() {
    brace()
        .arg("--tokens")
        .write_stdin("f(1) `\x01")
        .assert()
        .success()
        .stdout(
            contains("[ID \"f\"]")
                .and(contains("[OPEN_PAREN]"))
                .and(contains("[INTEGER \"1\"]"))
                .and(contains("[INVALID_ID_CHAR"))
                .and(contains("[EOF]")),
        );
}

#[test]
fn cli_reports_syntax_errors_with_caret() {
    brace()
        .write_stdin("(1, 2, (3))")
        .assert()
        .code(2)
        .stdout("")
        .stderr(
            contains("Syntax error [Improper parameter list]")
                .and(contains("  (1, 2, (3))\n         ^\n")),
        );
}

#[test]
fn cli_reports_miette_diagnostics_with_fancy() {
    brace()
        .arg("--fancy")
        .write_stdin("cond (a)")
        .assert()
        .code(2)
        .stderr(contains("brace::syntax::").and(contains("help:").or(contains("cond"))));
}

#[test]
fn cli_rejects_unparsed_input() {
    brace()
        .arg("-s")
        .write_stdin("f(1) g(2)")
        .assert()
        .code(3)
        .stdout("(f 1)\n")
        .stderr(contains("Unparsed input remaining: g(2)"));
    brace().write_stdin("1 )").assert().code(3);
}

#[test]
fn cli_exit_codes_for_input_problems() {
    brace().write_stdin("  // nothing\n").assert().code(4);
    brace()
        .write_stdin(" ".repeat(brace::config::MAX_INPUT_LEN + 1))
        .assert()
        .code(6)
        .stderr(contains("exceeds"));
    brace()
        .arg("/nonexistent/brace/input.br")
        .assert()
        .code(6)
        .stderr(contains("cannot read input"));
}
