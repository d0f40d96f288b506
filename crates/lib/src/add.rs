//! The add pipeline: digest inputs, ensure the entry, link to it.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::context::{AddOptions, Context};
use crate::error::StoreError;
use crate::inputs::{InputSet, RawInputs};
use crate::platform::link::{ensure_linkable, link_file};
use crate::store::entry::{EntryOutcome, EntryRef, TransferMode, discard_source, ensure_entry, verify_entry};
use crate::util::hash::ObjectHash;

/// What an `add` or `update` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResult {
  pub hash: ObjectHash,
  pub outcome: EntryOutcome,
  /// Absolute path of the link that now points at the entry.
  pub link: PathBuf,
  /// The relative target written into the link.
  pub link_target: PathBuf,
  /// The input mapping recorded for the entry.
  pub inputs: RawInputs,
}

impl AddResult {
  pub fn already_stored(&self) -> bool {
    !self.outcome.is_created()
  }
}

/// Store `result` under the hash of `inputs` and point `link` at it.
///
/// With [`TransferMode::Move`] the result leaves its original location. When
/// the entry already exists and the link replaces the result itself, the
/// result is discarded in favor of the stored copy.
pub fn add(
  ctx: &Context,
  result: &Path,
  inputs: &RawInputs,
  link: &Path,
  options: &AddOptions,
) -> Result<AddResult, StoreError> {
  let store_root = ctx.store_root()?;
  let artifact = ctx.resolve_path(result);
  let link_path = ctx.resolve_path(link);
  let link_replaces_result = options.mode == TransferMode::Move && link_path == artifact;

  if !link_replaces_result {
    ensure_linkable(&link_path, options.link_policy)?;
  }

  let hash = InputSet::resolve(inputs, &ctx.start_dir).global_hash()?;
  info!(
    hash = %hash,
    inputs = inputs.len(),
    result = %artifact.display(),
    store = %store_root.display(),
    "adding result"
  );

  let outcome = ensure_entry(&store_root, &hash, inputs, &artifact, options.mode)?;

  if !outcome.is_created() {
    if options.verify
      && let Some(entry) = EntryRef::from_artifact(outcome.artifact())
    {
      verify_entry(&entry, &ctx.start_dir)?;
    }
    if link_replaces_result {
      discard_source(&artifact)?;
    }
  }

  let link_target = link_file(outcome.artifact(), &link_path, options.link_policy)?;
  debug!(link = %link_path.display(), target = %link_target.display(), "add complete");

  Ok(AddResult {
    hash,
    outcome,
    link: link_path,
    link_target,
    inputs: inputs.clone(),
  })
}
