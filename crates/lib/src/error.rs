//! The error taxonomy of store operations.
//!
//! Each module reports failures with its own enum; operations surface them as
//! a [`StoreError`]. An entry that already exists is not an error and never
//! appears here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::platform::link::LinkError;
use crate::store::entry::EntryError;
use crate::store::metadata::MetadataError;
use crate::store::paths::LocateError;
use crate::util::hash::{HashError, ObjectHash};

#[derive(Debug, Error)]
pub enum StoreError {
  #[error(transparent)]
  StoreNotFound(#[from] LocateError),

  #[error("failed to digest inputs: {0}")]
  DigestFailure(#[from] HashError),

  #[error("no recorded inputs at {}", path.display())]
  MissingMetadata { path: PathBuf },

  #[error("recorded inputs at {} are unreadable: {reason}", path.display())]
  CorruptMetadata { path: PathBuf, reason: String },

  #[error("{} is not a link into the store: {reason}", path.display())]
  InvalidLinkTarget { path: PathBuf, reason: String },

  #[error("refusing to replace {}: it exists and is not a symlink", path.display())]
  LinkOccupied { path: PathBuf },

  #[error("result {} cannot be stored: {reason}", path.display())]
  InvalidArtifact { path: PathBuf, reason: &'static str },

  #[error("entry {} does not match its hash: expected {expected}, recorded inputs hash to {actual}", entry.display())]
  EntryMismatch {
    entry: PathBuf,
    expected: ObjectHash,
    actual: ObjectHash,
  },

  #[error("failed to {op} {}: {source}", path.display())]
  Io {
    op: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl From<MetadataError> for StoreError {
  fn from(err: MetadataError) -> Self {
    match err {
      MetadataError::Missing { path } => StoreError::MissingMetadata { path },
      MetadataError::Corrupt { path, source } => StoreError::CorruptMetadata {
        path,
        reason: source.to_string(),
      },
      MetadataError::UnsupportedVersion { path, version } => StoreError::CorruptMetadata {
        path,
        reason: format!("unsupported format version {version}"),
      },
      MetadataError::Read { path, source } => StoreError::Io {
        op: "read",
        path,
        source,
      },
      MetadataError::Write { path, source } => StoreError::Io {
        op: "write",
        path,
        source,
      },
      MetadataError::Serialize(source) => StoreError::DigestFailure(HashError::Serialize(source)),
    }
  }
}

impl From<EntryError> for StoreError {
  fn from(err: EntryError) -> Self {
    match err {
      EntryError::ArtifactMissing { path } => StoreError::InvalidArtifact {
        path,
        reason: "it does not exist",
      },
      EntryError::ArtifactNotFile { path } => StoreError::InvalidArtifact {
        path,
        reason: "it is not a regular file",
      },
      EntryError::Mismatch {
        entry,
        expected,
        actual,
      } => StoreError::EntryMismatch {
        entry,
        expected,
        actual,
      },
      EntryError::Incomplete { entry, artifact } => StoreError::Io {
        op: "find artifact of entry",
        path: entry,
        source: io::Error::new(io::ErrorKind::NotFound, artifact.display().to_string()),
      },
      EntryError::Metadata(e) => e.into(),
      EntryError::Hash(e) => StoreError::DigestFailure(e),
      EntryError::Io { op, path, source } => StoreError::Io { op, path, source },
    }
  }
}

impl From<LinkError> for StoreError {
  fn from(err: LinkError) -> Self {
    match err {
      LinkError::Occupied { path } => StoreError::LinkOccupied { path },
      LinkError::Missing { path } => StoreError::InvalidLinkTarget {
        path,
        reason: "it does not exist".to_string(),
      },
      LinkError::NotALink { path } => StoreError::InvalidLinkTarget {
        path,
        reason: "it is not a symlink".to_string(),
      },
      LinkError::Dangling { path, source } => StoreError::InvalidLinkTarget {
        path,
        reason: format!("its target does not exist ({source})"),
      },
      LinkError::InvalidPath { path } => StoreError::InvalidLinkTarget {
        path,
        reason: "it has no file name".to_string(),
      },
      LinkError::Io { op, path, source } => StoreError::Io { op, path, source },
    }
  }
}
