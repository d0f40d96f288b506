//! Initialize a store in a project directory.
//!
//! This module provides the core logic for the `ne init` command, which
//! creates `.ne/store` below the given directory. Initialization is
//! idempotent: running it on an initialized project changes nothing.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::consts::STORE_DIR;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("{} exists and is not a directory", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to canonicalize path {}: {source}", path.display())]
  Canonicalize { path: PathBuf, source: std::io::Error },
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  /// The store directory (canonicalized)
  pub store_dir: PathBuf,
  /// False when the store was already there
  pub created: bool,
}

/// Create `<root>/.ne/store` if it does not exist yet.
///
/// # Errors
///
/// Returns an error if:
/// - Something other than a directory occupies the store path
/// - Directory creation fails
pub fn init_store(root: &Path) -> Result<InitResult, InitError> {
  let store_dir = root.join(STORE_DIR);

  let created = if store_dir.is_dir() {
    false
  } else if store_dir.exists() {
    return Err(InitError::PathExists { path: store_dir });
  } else {
    fs::create_dir_all(&store_dir).map_err(|e| InitError::CreateDir {
      path: store_dir.clone(),
      source: e,
    })?;
    true
  };

  let store_dir = dunce::canonicalize(&store_dir).map_err(|e| InitError::Canonicalize {
    path: store_dir.clone(),
    source: e,
  })?;

  info!(store = %store_dir.display(), created, "store initialized");
  Ok(InitResult { store_dir, created })
}
