use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn update_creates_new_entry_and_moves_link() {
  let env = TestEnv::with_store();
  env.write_file("main.c", "X");
  env.write_file("out.bin", "built");
  env
    .ne_cmd()
    .args(["add", "out.bin", "-d", "src:main.c", "-d", "v:1"])
    .assert()
    .success();
  let before = env.entries();

  env
    .ne_cmd()
    .args(["update", "out.bin", "-d", "v:2"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Stored as"));

  let after = env.entries();
  assert_eq!(after.len(), 2);
  assert!(after.contains(&before[0]));
  assert!(env.is_symlink("out.bin"));
  assert_eq!(env.read_file("out.bin"), "built");

  let new_entry = after.iter().find(|e| **e != before[0]).unwrap();
  assert_eq!(
    env.read_file(&format!(".ne/store/{}/nestor.json", new_entry)),
    r#"{"src": "main.c", "v": "2"}"#
  );
}

#[test]
fn update_with_same_inputs_is_already_stored() {
  let env = TestEnv::with_store();
  env.write_file("out.bin", "built");
  env.ne_cmd().args(["add", "out.bin", "-d", "v:1"]).assert().success();

  env
    .ne_cmd()
    .args(["update", "out.bin", "-d", "v:1"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Already stored"));

  assert_eq!(env.entries().len(), 1);
}

#[test]
fn update_on_regular_file_fails() {
  let env = TestEnv::with_store();
  env.write_file("plain", "p");

  env
    .ne_cmd()
    .args(["update", "plain", "-d", "v:2"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a symlink"));
}
