//! Integration tests for the Scribble CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn scribble() -> Command {
    Command::cargo_bin("scribble").unwrap()
}

#[test]
fn test_cli_help() {
    scribble()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scribble"));
}

#[test]
fn test_cli_version() {
    scribble()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn eval_prints_the_result() {
    scribble()
        .args(["eval", "--expr", "1 + 2 * 3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: 7"));
}

#[test]
fn eval_reports_syntax_errors() {
    scribble()
        .args(["eval", "--expr", "var a = ;"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnexpectedToken"));
}

#[test]
fn eval_requires_input() {
    scribble().arg("eval").assert().failure();
}

#[test]
fn run_resolves_imports_next_to_the_script() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("lib.scribble"), "const greeting = \"hello\";").unwrap();
    fs::write(
        dir.path().join("main.scribble"),
        "import lib;\nprint(lib.greeting + \" world\");\n",
    )
    .unwrap();

    scribble()
        .arg("run")
        .arg(dir.path().join("main.scribble"))
        .assert()
        .success()
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn run_reports_missing_modules() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.scribble"), "import absent;\n").unwrap();

    scribble()
        .arg("-C")
        .arg(dir.path())
        .args(["run", "main.scribble"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ModuleNotFound"));
}

#[test]
fn run_reads_search_paths_from_config() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("shared")).unwrap();
    fs::write(dir.path().join("shared").join("math.scribble"), "func sq(x) x * x;").unwrap();
    fs::create_dir(dir.path().join("app")).unwrap();
    fs::write(dir.path().join("app").join("main.scribble"), "import math;\nsq(9);\n").unwrap();
    fs::write(
        dir.path().join("scribble.toml"),
        "[resolver]\nsearch_paths = [\"shared\"]\n",
    )
    .unwrap();

    scribble()
        .arg("-C")
        .arg(dir.path())
        .args(["run", "app/main.scribble", "--print-result"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: 81"));
}

#[test]
fn runtime_errors_fail_the_run() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("main.scribble");
    fs::write(&script, "var x = 1;\nx / 0;\n").unwrap();

    scribble()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("DivisionByZero"));
}

#[test]
fn parse_prints_parenthesised_expressions() {
    scribble()
        .args(["parse", "--expr", "1 - 2 - 3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("((1 - 2) - 3)"));
}

#[test]
fn repl_evaluates_lines_from_stdin() {
    scribble()
        .arg("repl")
        .write_stdin("var x = 20;\nfunc twice(v) {\n  return v * 2;\n}\ntwice(x + 1);\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));
}
