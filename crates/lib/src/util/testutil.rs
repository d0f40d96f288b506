//! Test utilities for nestor-lib.
//!
//! Builds throwaway project directories with an initialized store.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::consts::STORE_DIR;

/// A temporary project directory containing `.ne/store`.
pub struct TestProject {
  pub temp: TempDir,
  pub root: PathBuf,
}

impl TestProject {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    fs::create_dir_all(root.join(STORE_DIR)).unwrap();
    Self { temp, root }
  }

  pub fn store(&self) -> PathBuf {
    self.root.join(STORE_DIR)
  }

  /// Write a file relative to the project root, creating parent directories.
  pub fn write(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.root.join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.root.join(relative_path)
  }

  /// Names of all entry directories currently in the store, sorted.
  pub fn entries(&self) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(self.store())
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    names
  }
}

/// Cross-platform symlink creation helper
pub fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
  #[cfg(unix)]
  {
    std::os::unix::fs::symlink(target, link)
  }
  #[cfg(windows)]
  {
    if target.is_dir() {
      std::os::windows::fs::symlink_dir(target, link)
    } else {
      std::os::windows::fs::symlink_file(target, link)
    }
  }
}
