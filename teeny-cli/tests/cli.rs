use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn teeny() -> Command {
    Command::cargo_bin("teeny").expect("binary exists")
}

#[test]
fn compiles_to_default_output_name() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("prog.teeny"), "LET x = 1\nPRINT x\n").expect("write input");

    teeny()
        .current_dir(dir.path())
        .arg("prog.teeny")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiling completed."));

    let c = fs::read_to_string(dir.path().join("out.c")).expect("read output");
    assert!(c.starts_with("#include <stdio.h>\nint main(void){\nfloat x;\n"));
    assert!(c.contains("printf(\"%.2f\\n\", (float)(x));"));
}

#[test]
fn writes_to_requested_output_path() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("loop.teeny");
    fs::write(&input_path, "LABEL loop\nGOTO loop\n").expect("write input");
    let output_path = dir.path().join("build/nested/loop.c");

    teeny()
        .arg(&input_path)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success();

    let c = fs::read_to_string(&output_path).expect("read output");
    assert!(c.contains("loop:;\ngoto loop;\n"));
}

#[test]
fn reports_undeclared_label() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("bad.teeny");
    fs::write(&input_path, "GOTO missing\n").expect("write input");
    let output_path = dir.path().join("out.c");

    teeny()
        .arg(&input_path)
        .arg("-o")
        .arg(&output_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("undeclared label: missing"));

    assert!(!output_path.exists(), "no output on failure");
}

#[test]
fn reports_lex_errors_with_line() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("bad.teeny");
    fs::write(&input_path, "PRINT 1\nLET a = 1.\n").expect("write input");

    teeny()
        .current_dir(dir.path())
        .arg(&input_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("lex error on line 2"));
}

#[test]
fn dumps_tokens() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("tokens.teeny");
    fs::write(&input_path, "WHILE n != 1").expect("write input");

    teeny()
        .arg(&input_path)
        .arg("--tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("WHILE WHILE\nIDENT n\nNOTEQ !=\nNUMBER 1\nNEWLINE \\n\nEOF"));

    assert!(!dir.path().join("out.c").exists());
}

#[test]
fn reports_missing_input_file() {
    let dir = tempdir().expect("tempdir");

    teeny()
        .arg(dir.path().join("absent.teeny"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input file"));
}

#[test]
fn requires_exactly_one_source_argument() {
    teeny()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    teeny()
        .args(["a.teeny", "b.teeny"])
        .assert()
        .failure();
}
