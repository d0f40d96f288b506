//! Path-or-literal classification and digesting.
//!
//! Classification checks the filesystem once, in [`InputSet::resolve`].
//! Digesting trusts that classification: a `File` value that has since become
//! unreadable is an error, never a silent fallback to hashing its text.

use std::path::Path;

use tracing::debug;

use crate::inputs::types::{Digests, InputSet, InputValue, RawInputs};
use crate::util::hash::{ContentHash, HashError, Hashable, ObjectHash, hash_bytes, hash_file};

impl InputValue {
  /// Classify `raw` as a file reference if anything exists at `base/raw`.
  ///
  /// Existence is the only test, so a directory classifies as `File` and
  /// later fails to digest. The empty string is always a literal.
  pub fn classify(raw: &str, base: &Path) -> Self {
    if raw.is_empty() {
      return InputValue::Literal(String::new());
    }

    let path = base.join(raw);
    if path.exists() {
      InputValue::File {
        raw: raw.to_string(),
        path,
      }
    } else {
      InputValue::Literal(raw.to_string())
    }
  }

  /// SHA-1 of the file's bytes, or of the literal's UTF-8 encoding.
  pub fn digest(&self) -> Result<ContentHash, HashError> {
    match self {
      InputValue::File { path, .. } => hash_file(path),
      InputValue::Literal(value) => Ok(hash_bytes(value.as_bytes())),
    }
  }
}

impl InputSet {
  /// Classify every value of `raw`, resolving relative paths against `base`.
  pub fn resolve(raw: &RawInputs, base: &Path) -> Self {
    let values = raw
      .iter()
      .map(|(name, value)| (name.clone(), InputValue::classify(value, base)))
      .collect();
    InputSet { values }
  }

  /// Digest every input. The first unreadable file aborts the whole set.
  pub fn digest(&self) -> Result<Digests, HashError> {
    let mut digests = Digests::default();
    for (name, value) in &self.values {
      let digest = value.digest()?;
      debug!(input = %name, file = value.is_file(), digest = %digest, "digested input");
      digests.0.insert(name.clone(), digest);
    }
    Ok(digests)
  }

  /// Digest the set and hash the digests in one step.
  pub fn global_hash(&self) -> Result<ObjectHash, HashError> {
    global_hash(&self.digest()?)
  }
}

/// SHA-1 of the canonical, key-sorted JSON of `digests`.
pub fn global_hash(digests: &Digests) -> Result<ObjectHash, HashError> {
  digests.compute_hash()
}
