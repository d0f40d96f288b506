//! Shared test helpers for CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated project directory.
///
/// Each test gets its own temporary directory, optionally with an initialized
/// store, and runs `ne` from inside it.
pub struct TestEnv {
  pub temp: TempDir,
  pub root: PathBuf,
}

impl TestEnv {
  /// Create an empty project without a store.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    Self { temp, root }
  }

  /// Create a project with `.ne/store` in place.
  pub fn with_store() -> Self {
    let env = Self::empty();
    fs::create_dir_all(env.store_path()).unwrap();
    env
  }

  pub fn store_path(&self) -> PathBuf {
    self.root.join(".ne").join("store")
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.root.join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    fs::read_to_string(self.root.join(relative_path)).unwrap()
  }

  pub fn is_symlink(&self, relative_path: &str) -> bool {
    fs::symlink_metadata(self.root.join(relative_path))
      .map(|m| m.file_type().is_symlink())
      .unwrap_or(false)
  }

  /// Names of the entries in the store, sorted.
  pub fn entries(&self) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(self.store_path())
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    names
  }

  /// Get a Command for the ne binary running in the project root.
  ///
  /// `NESTOR_STORE` is cleared so the store is found by searching upwards.
  pub fn ne_cmd(&self) -> Command {
    self.ne_cmd_in(&self.root)
  }

  pub fn ne_cmd_in(&self, dir: &Path) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("ne");
    cmd.current_dir(dir);
    cmd.env_remove("NESTOR_STORE");
    cmd
  }
}
