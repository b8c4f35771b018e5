//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("quizgen").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("collection"))
        .stdout(predicate::str::contains("register"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("quizgen").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizgen"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("quizgen").unwrap();
    cmd.arg("frobnicate").assert().failure();
}

#[test]
fn test_generate_requires_arguments() {
    let mut cmd = Command::cargo_bin("quizgen").unwrap();
    cmd.arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PDF_URL"));
}

#[test]
fn test_register_rejects_invalid_id() {
    let mut cmd = Command::cargo_bin("quizgen").unwrap();
    cmd.args(["register", "bad_id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid character"));
}
