//! Integration tests for the pm0 CLI.
//!
//! These tests invoke the `pm0` binary as a subprocess and check exit
//! codes, stdout, stderr, and trace-file contents.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn pm0() -> Command {
    Command::cargo_bin("pm0").unwrap()
}

/// Return the workspace root (parent of pm0-cli/).
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Return the absolute path to a test program file.
fn test_program(name: &str) -> PathBuf {
    workspace_root().join("tests/programs").join(name)
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    pm0()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: pm0"));
}

#[test]
fn help_flag_exits_0() {
    pm0()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    pm0()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown command"));
}

// ---- Run ----

#[test]
fn run_add_program_prints_sum() {
    pm0()
        .args(["run", test_program("add.pm0").to_str().unwrap()])
        .assert()
        .success()
        .stdout("8 ");
}

#[test]
fn run_scope_program_reads_outer_frame() {
    pm0()
        .args(["run", test_program("scope.pm0").to_str().unwrap()])
        .assert()
        .success()
        .stdout("42 ");
}

#[test]
fn run_echo_program_reads_stdin() {
    pm0()
        .args(["run", test_program("echo.pm0").to_str().unwrap()])
        .write_stdin("21\n")
        .assert()
        .success()
        .stdout("42 ");
}

#[test]
fn run_echo_program_reads_input_file() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data.txt");
    fs::write(&data, "21\n").unwrap();

    pm0()
        .args([
            "run",
            test_program("echo.pm0").to_str().unwrap(),
            "--input",
            data.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("42 ");
}

#[test]
fn run_without_file_exits_1() {
    pm0()
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requires a program file"));
}

#[test]
fn run_missing_file_exits_1() {
    pm0()
        .args(["run", "no-such-file.pm0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn run_invalid_opcode_exits_1() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.pm0");
    fs::write(&bad, "25 0 0 0\n").unwrap();

    pm0()
        .args(["run", bad.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: instruction 0"));
}

#[test]
fn run_division_by_zero_exits_2() {
    pm0()
        .args(["run", test_program("divzero.pm0").to_str().unwrap()])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("runtime error:"));
}

#[test]
fn run_exhausted_input_exits_2() {
    pm0()
        .args(["run", test_program("echo.pm0").to_str().unwrap()])
        .write_stdin("")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("runtime error:"));
}

#[test]
fn run_unknown_flag_exits_1() {
    pm0()
        .args([
            "run",
            test_program("add.pm0").to_str().unwrap(),
            "--frobnicate",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown argument"));
}

// ---- Tracing ----

#[test]
fn run_with_trace_writes_listing_and_execution() {
    let dir = TempDir::new().unwrap();
    let trace = dir.path().join("trace.out");

    pm0()
        .args([
            "run",
            test_program("nested.pm0").to_str().unwrap(),
            "-o",
            trace.to_str().unwrap(),
        ])
        .assert()
        .success();

    let text = fs::read_to_string(&trace).unwrap();
    assert!(text.starts_with("***Code Memory***\n"), "{text}");
    assert!(text.contains("  0 jmp   0   0   3 \n"), "{text}");
    assert!(text.contains("***Execution***"), "{text}");
    assert!(text.contains("  #  OP   R   L   M  PC  BP  SP STK"), "{text}");
    assert!(text.ends_with("HLT\n"), "{text}");
}

#[test]
fn trace_shows_nested_activation_records() {
    let dir = TempDir::new().unwrap();
    let trace = dir.path().join("trace.out");

    pm0()
        .args([
            "run",
            test_program("nested.pm0").to_str().unwrap(),
            "-o",
            trace.to_str().unwrap(),
        ])
        .assert()
        .success();

    let text = fs::read_to_string(&trace).unwrap();
    // Both frames are live after the callee's INC, oldest first.
    assert!(
        text.contains("  1 inc   0   0   4   2   5   8   0 |   0   0   0   0 |   0   1   1   5 "),
        "{text}"
    );
    // After RTN only the caller's frame remains.
    assert!(
        text.contains("  2 rtn   0   0   0   5   1   4   0 |   0   0   0   0 "),
        "{text}"
    );
}

#[test]
fn trace_flag_without_value_exits_1() {
    pm0()
        .args(["run", test_program("add.pm0").to_str().unwrap(), "-o"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("-o requires a file name"));
}

// ---- List ----

#[test]
fn list_prints_code_memory() {
    pm0()
        .args(["list", test_program("add.pm0").to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("***Code Memory***\n"))
        .stdout(predicate::str::contains("  0 lit   0   0   5 \n"))
        .stdout(predicate::str::contains("  2 add   2   0   1 \n"))
        .stdout(predicate::str::contains("  4 sio   0   0   0 \n"));
}

#[test]
fn list_without_file_exits_1() {
    pm0()
        .arg("list")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requires a program file"));
}
