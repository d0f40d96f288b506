//! Per-invocation settings shared by all operations.

use std::path::{Path, PathBuf};

use crate::consts::STORE_ENV_VAR;
use crate::platform::link::LinkPolicy;
use crate::store::entry::TransferMode;
use crate::store::paths::{LocateError, locate_store_root};

/// Where an operation runs from and which store it uses.
///
/// The working directory is explicit so operations never depend on process
/// state: relative result, link and input paths all resolve against
/// `start_dir`, and so does the upward store search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
  pub start_dir: PathBuf,
  /// Use this store root instead of searching for one.
  pub store_override: Option<PathBuf>,
}

impl Context {
  pub fn new(start_dir: impl Into<PathBuf>) -> Self {
    Self {
      start_dir: start_dir.into(),
      store_override: None,
    }
  }

  /// Like [`Context::new`], honoring `NESTOR_STORE` when it is set and non-empty.
  pub fn from_env(start_dir: impl Into<PathBuf>) -> Self {
    let store_override = std::env::var_os(STORE_ENV_VAR)
      .filter(|v| !v.is_empty())
      .map(PathBuf::from);
    Self {
      start_dir: start_dir.into(),
      store_override,
    }
  }

  /// The active store root.
  pub fn store_root(&self) -> Result<PathBuf, LocateError> {
    match &self.store_override {
      Some(path) => {
        let path = self.resolve_path(path);
        if !path.is_dir() {
          return Err(LocateError::InvalidOverride { path });
        }
        Ok(dunce::canonicalize(&path).unwrap_or(path))
      }
      None => locate_store_root(&self.start_dir),
    }
  }

  /// `path` if absolute, otherwise `start_dir/path`.
  pub fn resolve_path(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.start_dir.join(path)
    }
  }
}

/// Knobs for `add` and `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddOptions {
  pub mode: TransferMode,
  pub link_policy: LinkPolicy,
  /// Re-hash an already stored entry's recorded inputs before trusting it.
  pub verify: bool,
}
