//! Store discovery and entry naming.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::{STORE_DIR, STORE_ENV_VAR};
use crate::util::hash::ObjectHash;

#[derive(Debug, Error)]
pub enum LocateError {
  #[error("could not find {} in {} or any parent directory", STORE_DIR, start.display())]
  NotFound { start: PathBuf },

  #[error("store {} named by {} is not a directory", path.display(), STORE_ENV_VAR)]
  InvalidOverride { path: PathBuf },
}

/// Find the store root by checking `start/.ne/store`, then each ancestor's.
pub fn locate_store_root(start: &Path) -> Result<PathBuf, LocateError> {
  for dir in start.ancestors() {
    let candidate = dir.join(STORE_DIR);
    if candidate.is_dir() {
      debug!(store = %candidate.display(), "found store");
      return Ok(candidate);
    }
  }

  Err(LocateError::NotFound {
    start: start.to_path_buf(),
  })
}

/// Entry directory name: `<hash>-<artifact basename>`.
pub fn entry_dir_name(hash: &ObjectHash, artifact_name: &std::ffi::OsStr) -> OsString {
  let mut name = OsString::from(format!("{}-", hash.0));
  name.push(artifact_name);
  name
}

pub fn entry_dir_path(store_root: &Path, hash: &ObjectHash, artifact_name: &std::ffi::OsStr) -> PathBuf {
  store_root.join(entry_dir_name(hash, artifact_name))
}
