//! End-to-end runs of the `pliant` binary.

use std::process::{Command, Output};

fn pliant(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pliant"))
        .args(args)
        .env_remove("PLIANT_SEPARATOR")
        .env_remove("PLIANT_LOG")
        .output()
        .expect("failed to run pliant")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn prints_json_result() {
    let out = pliant(&["u16", "\"8080\""]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "8080");
}

#[test]
fn reports_errors_on_stderr() {
    let out = pliant(&["u8", "-1"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("negative value not allowed"), "{stderr}");
}

#[test]
fn separator_comes_from_environment() {
    let out = Command::new(env!("CARGO_BIN_EXE_pliant"))
        .args(["ints", "4|5"])
        .env("PLIANT_SEPARATOR", "|")
        .output()
        .expect("failed to run pliant");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "[4,5]");
}

#[test]
fn nested_lookup() {
    let out = pliant(&["--path", "db.port", "get", r#"{"db": {"port": 5432}}"#]);
    assert_eq!(stdout(&out), "5432");
}

#[test]
fn rejects_unknown_targets() {
    let out = pliant(&["decimal", "1"]);
    assert!(!out.status.success());
}
