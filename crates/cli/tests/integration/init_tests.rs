use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn init_creates_store() {
  let env = TestEnv::empty();

  env
    .ne_cmd()
    .arg("init")
    .assert()
    .success()
    .stdout(predicate::str::contains("Initialized store"));

  assert!(env.store_path().is_dir());
}

#[test]
fn init_twice_is_harmless() {
  let env = TestEnv::with_store();
  env.write_file(".ne/store/keep", "x");

  env
    .ne_cmd()
    .arg("init")
    .assert()
    .success()
    .stdout(predicate::str::contains("already initialized"));

  assert_eq!(env.read_file(".ne/store/keep"), "x");
}

#[test]
fn init_at_path() {
  let env = TestEnv::empty();

  env.ne_cmd().args(["init", "project"]).assert().success();

  assert!(env.root.join("project/.ne/store").is_dir());
}
