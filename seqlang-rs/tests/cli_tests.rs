/// Binary tests: run the `seqlang` executable the way hosts do (`-c code`, a
/// source file, or a piped program) and check stdout, stderr and exit status.

use std::io::Write;
use std::process::{Command, Output, Stdio};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_seqlang"))
}

fn run(args: &[&str]) -> Output {
    Command::new(binary())
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to spawn seqlang")
}

fn run_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(binary())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn seqlang");
    child
        .stdin
        .take()
        .expect("stdin not open")
        .write_all(input.as_bytes())
        .expect("write to stdin");
    child.wait_with_output().expect("wait failed")
}

fn stdout(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ── Test cases ────────────────────────────────────────────────────────────────

#[test]
fn code_flag() {
    let out = run(&["-c", "var n=500\nout n"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), ["500"]);
}

#[test]
fn code_flag_embedded() {
    let out = run(&["-cprint \"hi\""]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), ["hi"]);
}

#[test]
fn source_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "var s = {{1, 4}}").unwrap();
    writeln!(file, "out reduce(s, 0, a b -> a + b)").unwrap();
    let path = file.path().to_str().expect("utf-8 path");

    let out = run(&[path]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), ["10"]);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nope.sq");
    let out = run(&[path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("nope.sq"));
}

#[test]
fn piped_program() {
    let out = run_stdin(&[], "out {1, 3}\nout 2 ^ 3\n");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), ["[1, 2, 3]", "8.0"]);
}

#[test]
fn type_error_exit_status() {
    let out = run(&["-c", "out undeclaredVar out 1"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    let err = stderr(&out);
    assert!(err.starts_with("error: "), "{err}");
    assert!(err.contains("undeclaredVar"), "{err}");
}

#[test]
fn runtime_error_keeps_earlier_output() {
    let out = run(&["-c", "out 1 out 1 / 0 out 2"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), ["1"]);
    assert!(stderr(&out).contains("division by zero"));
}

#[test]
fn debug_dump_goes_to_stderr() {
    let out = run(&["-d", "-c", "out 1 + 2"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), ["3"]);
    let err = stderr(&out);
    assert!(err.contains("OutExpr"), "{err}");
    assert!(err.contains("BinOp"), "{err}");
}

#[test]
fn bad_arguments() {
    let out = run(&["-z"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Usage"));

    let out = run(&["-c"]);
    assert_eq!(out.status.code(), Some(2));
}
