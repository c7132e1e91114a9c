//! CLI smoke tests for modbuild.
//!
//! These tests verify that the CLI commands run without panicking and
//! return appropriate exit codes.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn modbuild_cmd() -> Command {
  cargo_bin_cmd!("modbuild")
}

/// Create a temp directory holding a `modbuild.toml`.
fn temp_project(content: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("modbuild.toml"), content).unwrap();
  temp
}

const EMPTY_PROJECT: &str = "";

const PROJECT: &str = r#"
concurrency = 2

[task]
command = "mkdir -p \"$MODBUILD_OUT_DIR\" && printf '%s' \"$MODBUILD_FORMAT\" > \"$MODBUILD_OUT_DIR/index.js\""

[platform]
command = "printf '%s' \"$MODBUILD_PLATFORM\" > platform.txt"

[hooks]
after_build = "printf '%s' \"$MODBUILD_TASK_COUNT\" > done.txt"

[[build]]
format = "cjs"
out_dir = "dist/cjs"

[[build]]
format = "esm"
out_dir = "dist/esm"
"#;

#[test]
fn help_works() {
  modbuild_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("build"));
}

#[test]
fn version_works() {
  modbuild_cmd().arg("--version").assert().success();
}

#[test]
fn build_missing_config_fails() {
  let temp = TempDir::new().unwrap();

  modbuild_cmd()
    .current_dir(temp.path())
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn build_rejects_unknown_keys() {
  let temp = temp_project("colour = \"blue\"\n");

  modbuild_cmd()
    .current_dir(temp.path())
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn build_with_no_configs_succeeds() {
  let temp = temp_project(EMPTY_PROJECT);

  modbuild_cmd()
    .current_dir(temp.path())
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("nothing to build"));
}

#[test]
fn build_json_reports_summary() {
  let temp = temp_project(EMPTY_PROJECT);

  modbuild_cmd()
    .current_dir(temp.path())
    .args(["build", "--output", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"kind\": \"module\""))
    .stdout(predicate::str::contains("\"status\": \"success\""));
}

#[cfg(unix)]
#[test]
fn build_runs_every_config() {
  let temp = temp_project(PROJECT);

  modbuild_cmd()
    .current_dir(temp.path())
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Built 2 target(s)"));

  assert_eq!(std::fs::read_to_string(temp.path().join("dist/cjs/index.js")).unwrap(), "cjs");
  assert_eq!(std::fs::read_to_string(temp.path().join("dist/esm/index.js")).unwrap(), "esm");
  assert_eq!(std::fs::read_to_string(temp.path().join("done.txt")).unwrap(), "2");
}

#[cfg(unix)]
#[test]
fn build_uses_config_file_directory() {
  let temp = temp_project(PROJECT);
  let elsewhere = TempDir::new().unwrap();

  modbuild_cmd()
    .current_dir(elsewhere.path())
    .arg("build")
    .arg("--config")
    .arg(temp.path().join("modbuild.toml"))
    .assert()
    .success();

  assert!(temp.path().join("dist/esm/index.js").exists());
}

#[cfg(unix)]
#[test]
fn paths_resolve_against_project_directory() {
  let temp = temp_project(
    r#"
[task]
command = "printf '%s|%s' \"$MODBUILD_TSCONFIG\" \"$MODBUILD_CONFIG_FILE\" > paths.txt"

[[build]]
format = "esm"
"#,
  );
  let elsewhere = TempDir::new().unwrap();

  modbuild_cmd()
    .current_dir(elsewhere.path())
    .arg("build")
    .arg("--config")
    .arg(temp.path().join("modbuild.toml"))
    .args(["--tsconfig", "tsconfig.build.json"])
    .assert()
    .success();

  let paths = std::fs::read_to_string(temp.path().join("paths.txt")).unwrap();
  assert_eq!(
    paths,
    format!(
      "{}|{}",
      temp.path().join("tsconfig.build.json").display(),
      temp.path().join("modbuild.toml").display()
    )
  );
}

#[cfg(unix)]
#[test]
fn platform_build_runs_platform_command() {
  let temp = temp_project(PROJECT);

  modbuild_cmd()
    .current_dir(temp.path())
    .args(["build", "--platform", "ios", "android"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Built platform ios,android"));

  assert_eq!(std::fs::read_to_string(temp.path().join("platform.txt")).unwrap(), "ios,android");
  assert!(!temp.path().join("dist").exists());
  assert!(!temp.path().join("done.txt").exists());
}

#[cfg(unix)]
#[test]
fn failing_task_exits_nonzero() {
  let temp = temp_project(
    r#"
[task]
command = "exit 3"

[[build]]
name = "broken"
"#,
  );

  modbuild_cmd()
    .current_dir(temp.path())
    .arg("build")
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("broken"));
}

#[cfg(unix)]
#[test]
fn task_failure_reports_cause_once() {
  let temp = temp_project(
    r#"
[task]
command = "kind=syntax; echo \"$kind-error\" >&2; exit 3"

[[build]]
name = "broken"
"#,
  );

  modbuild_cmd()
    .current_dir(temp.path())
    .env("RUST_LOG", "off")
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "build task #0 (broken) failed: command failed with exit code 3",
    ))
    .stderr(predicate::function(|stderr: &str| stderr.matches("syntax-error").count() == 1))
    .stderr(predicate::function(|stderr: &str| {
      stderr.matches("command failed with").count() == 1
    }))
    .stderr(predicate::str::contains("Some(").not());
}

#[test]
fn build_without_task_command_fails() {
  let temp = temp_project("[[build]]\nformat = \"esm\"\n");

  modbuild_cmd()
    .current_dir(temp.path())
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("no task command is configured"));
}

#[test]
fn platform_without_command_fails() {
  let temp = temp_project(EMPTY_PROJECT);

  modbuild_cmd()
    .current_dir(temp.path())
    .args(["build", "--platform"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no platform build is configured"));
}

#[test]
fn info_lists_builds() {
  let temp = temp_project(PROJECT);

  modbuild_cmd()
    .current_dir(temp.path())
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("Builds: 2"))
    .stdout(predicate::str::contains("bundle-esm"));
}

#[test]
fn info_json_output() {
  let temp = temp_project(PROJECT);

  modbuild_cmd()
    .current_dir(temp.path())
    .args(["info", "--output", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"concurrency\": 2"))
    .stdout(predicate::str::contains("\"format\": \"esm\""));
}
