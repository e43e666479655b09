//! Smoke tests for the `gherkin-scaffold` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::str;

use assert_cmd::Command;
use rstest::rstest;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
fn scaffold() -> Command {
    let mut cmd = Command::cargo_bin("gherkin-scaffold").expect("binary exists");
    for var in [
        "GHERKIN_SCAFFOLD_LOG_LEVEL",
        "GHERKIN_SCAFFOLD_SUITE_NAME",
        "GHERKIN_SCAFFOLD_RUNNER_NAME",
        "GHERKIN_SCAFFOLD_STRICT",
        "GHERKIN_SCAFFOLD_OUT_DIR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[test]
fn writes_artifacts_into_the_output_directory() {
    let out = tempfile::tempdir().expect("temp dir");
    let output = scaffold()
        .arg(fixture("login.feature"))
        .arg("--out-dir")
        .arg(out.path())
        .output()
        .expect("runs");

    assert!(output.status.success(), "{output:?}");
    let suite = fs::read_to_string(out.path().join("suite.ts")).expect("suite written");
    let runner = fs::read_to_string(out.path().join("runner.ts")).expect("runner written");
    assert!(suite.contains("export namespace validLogin {"));
    assert!(runner.contains("export function* GetSuite(env) {"));
    assert!(output.stdout.is_empty());
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[test]
fn honours_environment_names_and_flag_overrides() {
    let out = tempfile::tempdir().expect("temp dir");
    let output = scaffold()
        .env("GHERKIN_SCAFFOLD_SUITE_NAME", "steps.ts")
        .env("GHERKIN_SCAFFOLD_RUNNER_NAME", "ignored.ts")
        .env("GHERKIN_SCAFFOLD_OUT_DIR", out.path())
        .arg(fixture("login.feature"))
        .args(["--runner-name", "login.spec.ts"])
        .output()
        .expect("runs");

    assert!(output.status.success(), "{output:?}");
    assert!(out.path().join("steps.ts").exists());
    assert!(out.path().join("login.spec.ts").exists());
    assert!(!out.path().join("ignored.ts").exists());
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[test]
fn prints_both_artifacts_with_stdout_flag() {
    let output = scaffold()
        .arg(fixture("login.feature"))
        .arg("--stdout")
        .output()
        .expect("runs");

    assert!(output.status.success(), "{output:?}");
    let stdout = str::from_utf8(&output.stdout).expect("utf8");
    assert!(stdout.starts_with("// suite.ts\ndeclare const world;\n"));
    assert!(stdout.contains("// runner.ts\n"));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[test]
fn emits_json_diagnostics() {
    let out = tempfile::tempdir().expect("temp dir");
    let output = scaffold()
        .arg(fixture("login.feature"))
        .arg("--out-dir")
        .arg(out.path())
        .args(["--diagnostics", "json"])
        .output()
        .expect("runs");

    assert!(output.status.success(), "{output:?}");
    let diagnostics: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(diagnostics.as_array().map(Vec::len), Some(2));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[test]
fn colliding_identifiers_fail_without_writing() {
    let out = tempfile::tempdir().expect("temp dir");
    let output = scaffold()
        .arg(fixture("colliding.feature"))
        .arg("--out-dir")
        .arg(out.path())
        .output()
        .expect("runs");

    assert_eq!(output.status.code(), Some(1));
    let stderr = str::from_utf8(&output.stderr).expect("utf8");
    assert!(stderr.contains("both derive `logIn`"), "{stderr}");
    assert_eq!(fs::read_dir(out.path()).expect("read dir").count(), 0);
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
#[case(&["--log-level", "shouty"])]
#[case(&["--suite-name", "runner.ts"])]
#[case(&["--suite-name", "../escape.ts"])]
fn rejects_invalid_configuration(#[case] args: &[&str]) {
    let output = scaffold()
        .arg(fixture("login.feature"))
        .arg("--stdout")
        .args(args)
        .output()
        .expect("runs");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}
