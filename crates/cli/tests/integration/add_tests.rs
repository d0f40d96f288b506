use predicates::prelude::*;

use super::common::TestEnv;

const V1_HASH: &str = "02c8dbc40d6adb6b0796d9e750b903be54a5ef47";

#[test]
fn add_moves_result_and_links_it_back() {
  let env = TestEnv::with_store();
  env.write_file("out.bin", "built");

  env
    .ne_cmd()
    .args(["add", "out.bin", "-d", "v:1"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Stored as 02c8dbc40d6a"));

  assert_eq!(env.entries(), vec![format!("{}-out.bin", V1_HASH)]);
  assert!(env.is_symlink("out.bin"));
  assert_eq!(env.read_file("out.bin"), "built");
  assert_eq!(
    env.read_file(&format!(".ne/store/{}-out.bin/nestor.json", V1_HASH)),
    r#"{"v": "1"}"#
  );
}

#[test]
fn add_with_file_input_and_separate_link() {
  let env = TestEnv::with_store();
  env.write_file("main.c", "X");
  env.write_file("out.bin", "built");

  env
    .ne_cmd()
    .args(["add", "out.bin", "-d", "src:main.c", "-d", "v:1", "--link", "latest"])
    .assert()
    .success();

  assert_eq!(
    env.entries(),
    vec!["180eb362850e798cd8a742cf81ece8432fc22dee-out.bin".to_string()]
  );
  assert!(!env.root.join("out.bin").exists());
  assert!(env.is_symlink("latest"));
  assert_eq!(env.read_file("latest"), "built");
}

#[test]
fn add_copy_keeps_result() {
  let env = TestEnv::with_store();
  env.write_file("out.bin", "built");

  env
    .ne_cmd()
    .args(["add", "out.bin", "-d", "v:1", "--link", "latest", "--copy"])
    .assert()
    .success();

  assert!(!env.is_symlink("out.bin"));
  assert_eq!(env.read_file("out.bin"), "built");
  assert_eq!(env.read_file("latest"), "built");
}

#[test]
fn add_again_reports_already_stored() {
  let env = TestEnv::with_store();
  env.write_file("out.bin", "built");

  env.ne_cmd().args(["add", "out.bin", "-d", "v:1"]).assert().success();
  env
    .ne_cmd()
    .args(["add", "out.bin", "-d", "v:1"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Already stored"));

  assert_eq!(env.entries().len(), 1);
  assert_eq!(env.read_file("out.bin"), "built");
}

#[test]
fn add_finds_store_from_subdirectory() {
  let env = TestEnv::with_store();
  env.write_file("sub/dir/out.bin", "built");

  env
    .ne_cmd_in(&env.root.join("sub/dir"))
    .args(["add", "out.bin", "-d", "v:1"])
    .assert()
    .success();

  assert_eq!(env.entries().len(), 1);
  assert!(env.is_symlink("sub/dir/out.bin"));
}

#[test]
fn add_with_directory_flag() {
  let env = TestEnv::with_store();
  env.write_file("sub/out.bin", "built");

  env
    .ne_cmd()
    .args(["-C", "sub", "add", "out.bin", "-d", "v:1"])
    .assert()
    .success();

  assert!(env.is_symlink("sub/out.bin"));
}

#[test]
fn add_refuses_to_overwrite_file_without_force() {
  let env = TestEnv::with_store();
  env.write_file("out.bin", "built");
  env.write_file("latest", "precious");

  env
    .ne_cmd()
    .args(["add", "out.bin", "-d", "v:1", "--link", "latest"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("latest"));

  assert_eq!(env.read_file("latest"), "precious");
  assert_eq!(env.read_file("out.bin"), "built");
  assert!(env.entries().is_empty());

  env
    .ne_cmd()
    .args(["add", "out.bin", "-d", "v:1", "--link", "latest", "--force"])
    .assert()
    .success();

  assert!(env.is_symlink("latest"));
}

#[test]
fn add_missing_result_fails() {
  let env = TestEnv::with_store();

  env
    .ne_cmd()
    .args(["add", "absent.bin", "-d", "v:1"])
    .assert()
    .failure();

  assert!(env.entries().is_empty());
}

#[test]
fn add_uses_store_from_environment() {
  let env = TestEnv::empty();
  std::fs::create_dir_all(env.root.join("elsewhere")).unwrap();
  env.write_file("out.bin", "built");

  env
    .ne_cmd()
    .env("NESTOR_STORE", env.root.join("elsewhere"))
    .args(["add", "out.bin", "-d", "v:1"])
    .assert()
    .success();

  assert_eq!(
    std::fs::read_dir(env.root.join("elsewhere")).unwrap().count(),
    1
  );
}
