//! Store file immutability management.
//!
//! Once an entry is populated, its artifact and metadata are made read-only so
//! that an accidental write through a link fails instead of corrupting the
//! store.
//!
//! ## Platform Behavior
//!
//! - **Unix**: Sets permissions to 0444 (files) or 0555 (executables)
//! - **Other**: Sets the read-only attribute
//!
//! Entry directories themselves stay writable: the staging directory must be
//! renamed into place after its contents are protected.

use std::path::Path;

use tracing::debug;

/// Error during immutability operations.
#[derive(Debug, thiserror::Error)]
pub enum ImmutableError {
  #[error("failed to set permissions on {path}: {source}")]
  SetPermissions {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read metadata for {path}: {source}")]
  Metadata {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Remove write permission from a stored file.
pub fn make_read_only(path: &Path) -> Result<(), ImmutableError> {
  debug!(path = ?path, "making store file read-only");
  set_writable(path, false)
}

/// Restore write permission, e.g. on a copy taken out of the store.
pub fn make_writable(path: &Path) -> Result<(), ImmutableError> {
  debug!(path = ?path, "making file writable");
  set_writable(path, true)
}

#[cfg(unix)]
fn set_writable(path: &Path, writable: bool) -> Result<(), ImmutableError> {
  use std::os::unix::fs::PermissionsExt;

  let metadata = std::fs::metadata(path).map_err(|e| ImmutableError::Metadata {
    path: path.display().to_string(),
    source: e,
  })?;

  let executable = metadata.permissions().mode() & 0o111 != 0;

  let new_mode = match (writable, executable) {
    (false, false) => 0o444,
    (false, true) => 0o555,
    (true, false) => 0o644,
    (true, true) => 0o755,
  };

  let mut perms = metadata.permissions();
  perms.set_mode(new_mode);
  std::fs::set_permissions(path, perms).map_err(|e| ImmutableError::SetPermissions {
    path: path.display().to_string(),
    source: e,
  })
}

#[cfg(not(unix))]
fn set_writable(path: &Path, writable: bool) -> Result<(), ImmutableError> {
  let metadata = std::fs::metadata(path).map_err(|e| ImmutableError::Metadata {
    path: path.display().to_string(),
    source: e,
  })?;

  let mut perms = metadata.permissions();
  perms.set_readonly(!writable);
  std::fs::set_permissions(path, perms).map_err(|e| ImmutableError::SetPermissions {
    path: path.display().to_string(),
    source: e,
  })
}
