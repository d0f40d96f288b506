//! Input types for declaration, resolution and hashing.
//!
//! - [`RawInputs`] - The mapping as the caller wrote it; this is what entries record
//! - [`InputValue`] - A single value after path-or-literal classification
//! - [`InputSet`] - A resolved mapping, ready to digest
//! - [`Digests`] - Per-input digests; its canonical JSON is what the global hash covers

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::util::hash::{ContentHash, Hashable};

/// Input name to input value, exactly as supplied.
///
/// A `BTreeMap` so that every serialization is sorted by key.
pub type RawInputs = BTreeMap<String, String>;

/// A single input value after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValue {
  /// The value named an existing path; its content is the dependency.
  File {
    /// The value as written, recorded in entry metadata.
    raw: String,
    /// The value resolved against the base directory.
    path: PathBuf,
  },
  /// Anything else is hashed as text.
  Literal(String),
}

impl InputValue {
  /// The value as the caller wrote it.
  pub fn raw(&self) -> &str {
    match self {
      InputValue::File { raw, .. } => raw,
      InputValue::Literal(value) => value,
    }
  }

  pub fn is_file(&self) -> bool {
    matches!(self, InputValue::File { .. })
  }
}

/// A resolved input mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputSet {
  pub(crate) values: BTreeMap<String, InputValue>,
}

impl InputSet {
  pub fn get(&self, name: &str) -> Option<&InputValue> {
    self.values.get(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &InputValue)> {
    self.values.iter()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// The unhashed mapping, as recorded in entry metadata.
  pub fn raw(&self) -> RawInputs {
    self
      .values
      .iter()
      .map(|(name, value)| (name.clone(), value.raw().to_string()))
      .collect()
  }
}

/// Per-input digests, keyed like the input mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digests(pub BTreeMap<String, ContentHash>);

impl Hashable for Digests {}

/// Overlay `updates` onto `base`: named keys are replaced or inserted, all
/// other keys of `base` are kept.
pub fn merge_inputs(base: &mut RawInputs, updates: &RawInputs) {
  for (name, value) in updates {
    base.insert(name.clone(), value.clone());
  }
}
