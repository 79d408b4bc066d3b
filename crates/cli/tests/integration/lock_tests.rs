//! `poetry2nix lock` integration tests.

use predicates::prelude::*;
use serial_test::serial;

use super::common::{TestEnv, fixture_content};

const EMPTY_OVERLAY: &str = "{ pkgs }:\nself: super: {\n\n}\n";

#[test]
#[serial]
fn pins_git_sources_in_lockfile_order() {
  let env = TestEnv::from_fixture("git_sources.lock");

  env
    .poetry2nix_cmd()
    .arg("lock")
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote poetry-git-overlay.nix"))
    .stdout(predicate::str::contains("3 git source(s)"));

  assert_eq!(env.overlay(), fixture_content("git_sources.expected.nix"));
}

#[test]
#[serial]
fn parallel_run_matches_serial_run() {
  let env = TestEnv::from_fixture("git_sources.lock");

  env
    .poetry2nix_cmd()
    .args(["lock", "--jobs", "1", "--out", "serial.nix"])
    .assert()
    .success();
  env
    .poetry2nix_cmd()
    .args(["lock", "--jobs", "8", "--out", "parallel.nix"])
    .assert()
    .success();

  let serial = std::fs::read_to_string(env.path("serial.nix")).unwrap();
  let parallel = std::fs::read_to_string(env.path("parallel.nix")).unwrap();
  assert_eq!(serial, parallel);
}

#[test]
#[serial]
fn registry_only_lock_renders_empty_overlay() {
  let env = TestEnv::from_fixture("registry_only.lock");

  env.poetry2nix_cmd().arg("lock").assert().success();

  assert_eq!(env.overlay(), EMPTY_OVERLAY);
}

#[test]
#[serial]
fn custom_paths_are_honoured() {
  let env = TestEnv::empty();
  env.write_file("nested/custom.lock", &fixture_content("git_sources.lock"));

  env
    .poetry2nix_cmd()
    .args(["lock", "--lock", "nested/custom.lock", "--out", "nested/overlay.nix"])
    .assert()
    .success();

  let overlay = std::fs::read_to_string(env.path("nested/overlay.nix")).unwrap();
  assert_eq!(overlay, fixture_content("git_sources.expected.nix"));
  assert!(!env.path("poetry-git-overlay.nix").exists());
}

#[test]
#[serial]
fn prefetch_flag_overrides_environment() {
  let env = TestEnv::from_fixture("git_sources.lock");

  env
    .poetry2nix_cmd()
    .env("POETRY2NIX_PREFETCH_GIT", "/nonexistent/prefetch")
    .arg("lock")
    .arg("--prefetch")
    .arg(&env.helper)
    .assert()
    .success();

  assert_eq!(env.overlay(), fixture_content("git_sources.expected.nix"));
}

#[test]
#[serial]
fn helper_failure_forwards_stderr_and_exit_code() {
  let env = TestEnv::empty();
  let lock = fixture_content("git_sources.lock").replace("example/beta.git", "example/fail/beta.git");
  env.write_file("poetry.lock", &lock);

  env
    .poetry2nix_cmd()
    .arg("lock")
    .assert()
    .code(3)
    .stderr("boom\n")
    .stdout(predicate::str::is_empty());

  assert!(!env.path("poetry-git-overlay.nix").exists());
}

#[test]
#[serial]
fn helper_failure_keeps_previous_overlay() {
  let env = TestEnv::empty();
  let lock = fixture_content("git_sources.lock").replace("zopefoundation/zope.interface.git", "fail/zope.git");
  env.write_file("poetry.lock", &lock);
  env.write_file("poetry-git-overlay.nix", "# previous\n");

  env.poetry2nix_cmd().arg("lock").assert().code(3);

  assert_eq!(env.overlay(), "# previous\n");
}

#[test]
#[serial]
fn missing_helper_fails_cleanly() {
  let env = TestEnv::from_fixture("git_sources.lock");

  env
    .poetry2nix_cmd()
    .env("POETRY2NIX_PREFETCH_GIT", "/nonexistent/prefetch")
    .arg("lock")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to run '/nonexistent/prefetch'"));

  assert!(!env.path("poetry-git-overlay.nix").exists());
}

#[test]
#[serial]
fn source_without_revision_is_rejected() {
  let env = TestEnv::empty();
  env.write_file(
    "poetry.lock",
    r#"
[[package]]
name = "floating"
version = "0.1.0"

[package.source]
type = "git"
url = "https://github.com/example/floating.git"
"#,
  );

  env
    .poetry2nix_cmd()
    .arg("lock")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("package 'floating' has a source without a reference"));

  assert!(!env.path("poetry-git-overlay.nix").exists());
}

#[test]
#[serial]
fn missing_lockfile_is_reported() {
  let env = TestEnv::empty();

  env
    .poetry2nix_cmd()
    .arg("lock")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to read lockfile 'poetry.lock'"));
}
