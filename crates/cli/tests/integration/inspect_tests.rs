use predicates::prelude::*;

use super::common::TestEnv;

fn added(env: &TestEnv) {
  env.write_file("main.c", "X");
  env.write_file("out.bin", "built");
  env
    .ne_cmd()
    .args(["add", "out.bin", "-d", "src:main.c", "-d", "v:1", "--link", "latest"])
    .assert()
    .success();
}

#[test]
fn info_lists_recorded_inputs() {
  let env = TestEnv::with_store();
  added(&env);

  env
    .ne_cmd()
    .args(["info", "latest"])
    .assert()
    .success()
    .stdout(predicate::str::contains("180eb362850e798cd8a742cf81ece8432fc22dee"))
    .stdout(predicate::str::contains("main.c"));
}

#[test]
fn info_json_output() {
  let env = TestEnv::with_store();
  added(&env);

  let output = env.ne_cmd().args(["info", "latest", "--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["hash"], "180eb362850e798cd8a742cf81ece8432fc22dee");
  assert_eq!(value["inputs"]["v"], "1");
}

#[test]
fn check_exit_code_follows_freshness() {
  let env = TestEnv::with_store();
  added(&env);

  env
    .ne_cmd()
    .args(["check", "latest"])
    .assert()
    .success()
    .stdout(predicate::str::contains("up to date"));

  env.write_file("main.c", "Y");
  env
    .ne_cmd()
    .args(["check", "latest"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("stale"));
}

#[test]
fn check_json_reports_status() {
  let env = TestEnv::with_store();
  added(&env);
  env.write_file("main.c", "Y");

  let output = env.ne_cmd().args(["check", "latest", "-o", "json"]).output().unwrap();
  assert_eq!(output.status.code(), Some(1));

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["status"], "stale");
  assert_eq!(value["recorded"], "180eb362850e798cd8a742cf81ece8432fc22dee");
}

#[test]
fn get_replaces_link_with_copy() {
  let env = TestEnv::with_store();
  added(&env);

  env.ne_cmd().args(["get", "latest"]).assert().success();

  assert!(!env.is_symlink("latest"));
  assert_eq!(env.read_file("latest"), "built");
  std::fs::write(env.root.join("latest"), "edited").unwrap();
  assert_eq!(env.entries().len(), 1);
}
