//! Store entries: creation, lookup and verification.
//!
//! An entry is created at most once per global hash. It is populated inside a
//! staging directory and published by a single rename, which doubles as the
//! cross-process mutual exclusion: when two processes race to publish the same
//! hash, exactly one rename succeeds and the other process sees the winner's
//! complete entry. This relies on rename being atomic and refusing to replace a
//! non-empty directory, which holds on local POSIX filesystems and NTFS but may
//! not on some network filesystems.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::{HASH_HEX_LEN, STAGING_PREFIX};
use crate::inputs::{InputSet, RawInputs};
use crate::platform::immutable::{make_read_only, make_writable};
use crate::store::metadata::{MetadataError, read_metadata, write_metadata};
use crate::store::paths::entry_dir_path;
use crate::util::hash::{HashError, ObjectHash, is_hex_digest};

/// How the result artifact gets into a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
  /// Rename the artifact into the entry, copying across filesystems.
  #[default]
  Move,
  /// Copy the artifact, leaving the source untouched.
  Copy,
}

/// Result of [`ensure_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
  /// This call published the entry.
  Created { artifact: PathBuf },
  /// An entry for the hash was already present. Nothing was written.
  AlreadyStored { artifact: PathBuf },
}

impl EntryOutcome {
  /// Absolute path of the artifact inside the entry.
  pub fn artifact(&self) -> &Path {
    match self {
      EntryOutcome::Created { artifact } | EntryOutcome::AlreadyStored { artifact } => artifact,
    }
  }

  pub fn is_created(&self) -> bool {
    matches!(self, EntryOutcome::Created { .. })
  }
}

#[derive(Debug, Error)]
pub enum EntryError {
  #[error("result {} does not exist", path.display())]
  ArtifactMissing { path: PathBuf },

  #[error("result {} is not a regular file", path.display())]
  ArtifactNotFile { path: PathBuf },

  #[error("entry {} does not match its hash: expected {expected}, recorded inputs hash to {actual}", entry.display())]
  Mismatch {
    entry: PathBuf,
    expected: ObjectHash,
    actual: ObjectHash,
  },

  #[error("entry {} is missing its artifact {}", entry.display(), artifact.display())]
  Incomplete { entry: PathBuf, artifact: PathBuf },

  #[error(transparent)]
  Metadata(#[from] MetadataError),

  #[error(transparent)]
  Hash(#[from] HashError),

  #[error("failed to {op} {}: {source}", path.display())]
  Io {
    op: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

fn io_err<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> EntryError + 'a {
  move |source| EntryError::Io {
    op,
    path: path.to_path_buf(),
    source,
  }
}

/// An entry located from the artifact path a link resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
  /// The store directory holding the entry.
  pub store_root: PathBuf,
  /// `<store>/<hash>-<name>`
  pub dir: PathBuf,
  pub hash: ObjectHash,
  /// `<store>/<hash>-<name>/<name>`
  pub artifact: PathBuf,
}

impl EntryRef {
  /// Recognize `artifact` as `<store>/<hash>-<name>/<name>`.
  ///
  /// Returns `None` for any path outside that layout.
  pub fn from_artifact(artifact: &Path) -> Option<Self> {
    let name = artifact.file_name()?.as_encoded_bytes();
    let dir = artifact.parent()?;
    let dir_name = dir.file_name()?.as_encoded_bytes();
    let store_root = dir.parent()?;

    if dir_name.len() != HASH_HEX_LEN + 1 + name.len() {
      return None;
    }
    let (hash, rest) = dir_name.split_at(HASH_HEX_LEN);
    if !is_hex_digest(hash) || rest[0] != b'-' || &rest[1..] != name {
      return None;
    }

    Some(EntryRef {
      store_root: store_root.to_path_buf(),
      dir: dir.to_path_buf(),
      hash: ObjectHash(String::from_utf8_lossy(hash).into_owned()),
      artifact: artifact.to_path_buf(),
    })
  }

  pub fn read_inputs(&self) -> Result<RawInputs, MetadataError> {
    read_metadata(&self.dir)
  }
}

/// Make sure an entry for `hash` exists, creating it from `artifact` if not.
///
/// The existing-entry check comes first, so a missing `artifact` is only an
/// error when a new entry actually has to be created. An existing entry is
/// trusted as is; see [`verify_entry`] for the strict check.
pub fn ensure_entry(
  store_root: &Path,
  hash: &ObjectHash,
  inputs: &RawInputs,
  artifact: &Path,
  mode: TransferMode,
) -> Result<EntryOutcome, EntryError> {
  let name = artifact.file_name().ok_or_else(|| EntryError::ArtifactNotFile {
    path: artifact.to_path_buf(),
  })?;
  let entry_dir = entry_dir_path(store_root, hash, name);
  let stored_artifact = entry_dir.join(name);

  if entry_dir.exists() {
    info!(hash = %hash, entry = %entry_dir.display(), "already stored");
    return Ok(EntryOutcome::AlreadyStored {
      artifact: stored_artifact,
    });
  }

  match fs::symlink_metadata(artifact) {
    Ok(m) if m.is_file() => {}
    Ok(_) => {
      return Err(EntryError::ArtifactNotFile {
        path: artifact.to_path_buf(),
      });
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(EntryError::ArtifactMissing {
        path: artifact.to_path_buf(),
      });
    }
    Err(e) => return Err(io_err("inspect", artifact)(e)),
  }

  let staging = tempfile::Builder::new()
    .prefix(STAGING_PREFIX)
    .tempdir_in(store_root)
    .map_err(io_err("create staging directory in", store_root))?;
  let staged_artifact = staging.path().join(name);
  debug!(staging = %staging.path().display(), "staging entry");

  let populated = transfer(artifact, &staged_artifact, mode).and_then(|()| {
    let metadata = write_metadata(staging.path(), inputs)?;
    for path in [&staged_artifact, &metadata] {
      if let Err(e) = make_read_only(path) {
        warn!(path = %path.display(), error = %e, "failed to make stored file read-only, continuing");
      }
    }
    publish(staging.path(), &entry_dir)
  });

  match populated {
    Ok(true) => {
      info!(hash = %hash, entry = %entry_dir.display(), mode = ?mode, "stored");
      Ok(EntryOutcome::Created {
        artifact: stored_artifact,
      })
    }
    Ok(false) => {
      info!(hash = %hash, entry = %entry_dir.display(), "already stored by a concurrent writer");
      if mode == TransferMode::Move {
        restore(&staged_artifact, artifact);
      }
      Ok(EntryOutcome::AlreadyStored {
        artifact: stored_artifact,
      })
    }
    Err(e) => {
      if mode == TransferMode::Move && staged_artifact.exists() {
        restore(&staged_artifact, artifact);
      }
      Err(e)
    }
  }
}

fn transfer(from: &Path, to: &Path, mode: TransferMode) -> Result<(), EntryError> {
  match mode {
    TransferMode::Copy => {
      fs::copy(from, to).map_err(io_err("copy", from))?;
    }
    TransferMode::Move => {
      if let Err(e) = fs::rename(from, to) {
        debug!(from = %from.display(), error = %e, "rename failed, copying instead");
        fs::copy(from, to).map_err(io_err("copy", from))?;
        fs::remove_file(from).map_err(io_err("remove", from))?;
      }
    }
  }
  Ok(())
}

/// Rename the staging directory into place. `Ok(false)` when another writer
/// published the same entry first.
fn publish(staging: &Path, entry_dir: &Path) -> Result<bool, EntryError> {
  match fs::rename(staging, entry_dir) {
    Ok(()) => Ok(true),
    Err(_) if entry_dir.exists() => Ok(false),
    Err(e) => Err(io_err("publish entry", entry_dir)(e)),
  }
}

/// Put a moved artifact back where the caller had it after a failed store.
fn restore(staged: &Path, original: &Path) {
  if let Err(e) = make_writable(staged) {
    debug!(path = %staged.display(), error = %e, "failed to make staged result writable");
  }
  match fs::rename(staged, original) {
    Ok(()) => debug!(path = %original.display(), "restored result after failed store"),
    Err(e) => warn!(
      staged = %staged.display(),
      original = %original.display(),
      error = %e,
      "failed to restore result after failed store"
    ),
  }
}

/// Drop the caller's copy of a result whose entry already existed.
///
/// Only regular files are removed; a symlink at `artifact` is typically a link
/// to the stored entry and is left for the link step to replace.
pub fn discard_source(artifact: &Path) -> Result<(), EntryError> {
  match fs::symlink_metadata(artifact) {
    Ok(m) if m.is_file() => {
      debug!(path = %artifact.display(), "discarding result, entry already stored");
      fs::remove_file(artifact).map_err(io_err("remove", artifact))
    }
    Ok(_) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(io_err("inspect", artifact)(e)),
  }
}

/// Check that an existing entry is what its name claims.
///
/// The recorded inputs are resolved against `base` and hashed again; the
/// result must equal the entry's hash, and the artifact must be present.
pub fn verify_entry(entry: &EntryRef, base: &Path) -> Result<(), EntryError> {
  if !entry.artifact.is_file() {
    return Err(EntryError::Incomplete {
      entry: entry.dir.clone(),
      artifact: entry.artifact.clone(),
    });
  }

  let recorded = entry.read_inputs()?;
  let actual = InputSet::resolve(&recorded, base).global_hash()?;
  if actual != entry.hash {
    return Err(EntryError::Mismatch {
      entry: entry.dir.clone(),
      expected: entry.hash.clone(),
      actual,
    });
  }

  debug!(entry = %entry.dir.display(), "verified entry");
  Ok(())
}
