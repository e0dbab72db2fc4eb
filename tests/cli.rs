//! Binary-level behavior: argument handling, file runs, and stdin mode.
//! The interactive prompt (zero arguments) isn't exercised here since it
//! reads from a real terminal; it's covered in spirit by `Glint::run_line`
//! being driven directly in the other integration tests.
use assert_cmd::Command;

#[test]
fn running_a_file_prints_its_output() {
    Command::cargo_bin("glint")
        .unwrap()
        .arg("tests/fixtures/hello.glint")
        .assert()
        .success()
        .stdout("hello from a file\n");
}

#[test]
fn a_runtime_error_in_a_file_exits_70() {
    Command::cargo_bin("glint")
        .unwrap()
        .arg("tests/fixtures/runtime_error.glint")
        .assert()
        .code(70)
        .stderr("[line 1] Error: Undefined variable 'nope'.\n");
}

#[test]
fn more_than_one_argument_is_a_usage_error() {
    Command::cargo_bin("glint")
        .unwrap()
        .args(["a.glint", "b.glint"])
        .assert()
        .code(64)
        .stderr("Usage: glint [script | --]\n");
}

#[test]
fn a_missing_file_is_an_io_error() {
    Command::cargo_bin("glint")
        .unwrap()
        .arg("tests/fixtures/does_not_exist.glint")
        .assert()
        .code(74);
}

#[test]
fn double_dash_runs_the_program_piped_on_stdin() {
    Command::cargo_bin("glint")
        .unwrap()
        .arg("--")
        .write_stdin("print \"from stdin\";")
        .assert()
        .success()
        .stdout("from stdin\n");
}
