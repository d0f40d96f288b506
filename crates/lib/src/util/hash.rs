//! Hashing utilities for content-addressed storage.
//!
//! This module provides:
//! - `ObjectHash`: the 40-character global hash that names a store entry
//! - `ContentHash`: the 40-character digest of a single input
//! - `Hashable`: global hashing of any serializable value via canonical JSON
//! - `hash_file()`: Single file hashing
//! - `hash_bytes()`: Arbitrary byte hashing
//!
//! Every digest is a lowercase hexadecimal SHA-1. The digests are part of the
//! durable store layout, so the algorithm and encoding must never change.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::consts::HASH_HEX_LEN;
use crate::util::json::to_canonical_vec;

/// Error while hashing an input or an input set.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
  #[error("failed to read {}: {source}", path.display())]
  ReadFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to serialize digests: {0}")]
  Serialize(#[source] serde_json::Error),
}

/// The global hash of an input set, used as the primary key of a store entry.
///
/// # Format
///
/// A lowercase hexadecimal string, e.g., `"a94a8fe5ccb19ba61c4c0873d391e987982fbbd3"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHash(pub String);

impl ObjectHash {
  /// Parse a hash from the leading characters of an entry directory name.
  ///
  /// Returns `None` unless `s` is exactly 40 lowercase hex digits.
  pub fn parse(s: &str) -> Option<Self> {
    if is_hex_digest(s.as_bytes()) {
      Some(ObjectHash(s.to_string()))
    } else {
      None
    }
  }
}

impl std::fmt::Display for ObjectHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// The digest of a single input: a file's bytes or a literal's UTF-8 encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  /// SHA-1 of the canonical JSON encoding of `self`.
  fn compute_hash(&self) -> Result<ObjectHash, HashError> {
    let serialized = to_canonical_vec(self).map_err(HashError::Serialize)?;
    let mut hasher = Sha1::new();
    hasher.update(&serialized);
    Ok(ObjectHash(format!("{:x}", hasher.finalize())))
  }
}

/// Hash a file's contents.
///
/// The file is streamed, so only its bytes contribute: never its name,
/// location, timestamps or permissions.
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let mut file = fs::File::open(path).map_err(|e| HashError::ReadFile {
    path: path.to_path_buf(),
    source: e,
  })?;

  let mut hasher = Sha1::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(|e| HashError::ReadFile {
      path: path.to_path_buf(),
      source: e,
    })?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(format!("{:x}", hasher.finalize())))
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha1::new();
  hasher.update(data);
  ContentHash(format!("{:x}", hasher.finalize()))
}

pub(crate) fn is_hex_digest(bytes: &[u8]) -> bool {
  bytes.len() == HASH_HEX_LEN && bytes.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
