//! Recorded inputs of a store entry.
//!
//! Every entry carries the input mapping it was created from, unhashed, so
//! that `update` can merge new values into it later.
//!
//! # Storage Layout
//!
//! ```text
//! <store>/<hash>-<name>/
//! └── nestor.json
//! ```
//!
//! # Example Metadata File
//!
//! ```json
//! {"src": "main.c", "version": "2"}
//! ```
//!
//! This flat form is what every writer produces. Readers also accept a
//! versioned envelope, `{"version": 1, "inputs": {...}}`, for stores written by
//! future format revisions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::METADATA_FILENAME;
use crate::inputs::RawInputs;
use crate::util::json::to_canonical_vec;

/// Highest envelope version this build understands.
pub const METADATA_VERSION: u32 = 1;

/// Errors that can occur when reading or writing entry metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
  #[error("no recorded inputs at {}", path.display())]
  Missing { path: PathBuf },

  #[error("failed to read recorded inputs {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("recorded inputs at {} are not a valid input mapping: {source}", path.display())]
  Corrupt {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("recorded inputs at {} use unsupported format version {version}", path.display())]
  UnsupportedVersion { path: PathBuf, version: u32 },

  #[error("failed to serialize recorded inputs: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write recorded inputs {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MetadataFile {
  Versioned { version: u32, inputs: RawInputs },
  Legacy(RawInputs),
}

pub fn metadata_path(entry_dir: &Path) -> PathBuf {
  entry_dir.join(METADATA_FILENAME)
}

/// Write `inputs` into `dir` as canonical JSON. Returns the file path.
///
/// Callers write into a staging directory, so the file is written in place.
pub fn write_metadata(dir: &Path, inputs: &RawInputs) -> Result<PathBuf, MetadataError> {
  let path = metadata_path(dir);
  let content = to_canonical_vec(inputs).map_err(MetadataError::Serialize)?;
  fs::write(&path, content).map_err(|e| MetadataError::Write {
    path: path.clone(),
    source: e,
  })?;
  debug!(path = %path.display(), inputs = inputs.len(), "wrote recorded inputs");
  Ok(path)
}

/// Read the recorded inputs of the entry at `entry_dir`.
pub fn read_metadata(entry_dir: &Path) -> Result<RawInputs, MetadataError> {
  let path = metadata_path(entry_dir);

  let content = match fs::read(&path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(MetadataError::Missing { path }),
    Err(e) => return Err(MetadataError::Read { path, source: e }),
  };

  let file: MetadataFile = serde_json::from_slice(&content).map_err(|e| MetadataError::Corrupt {
    path: path.clone(),
    source: e,
  })?;

  match file {
    MetadataFile::Legacy(inputs) => Ok(inputs),
    MetadataFile::Versioned { version, inputs } if version <= METADATA_VERSION => Ok(inputs),
    MetadataFile::Versioned { version, .. } => Err(MetadataError::UnsupportedVersion { path, version }),
  }
}
