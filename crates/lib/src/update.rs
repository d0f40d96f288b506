//! Update a link by merging new inputs into its entry's recorded inputs.
//!
//! The entry the link points to is never modified. Its artifact is copied into
//! the entry for the merged inputs, which may be new or may already exist, and
//! the link is re-pointed there.

use std::path::Path;

use tracing::info;

use crate::add::{AddResult, add};
use crate::context::{AddOptions, Context};
use crate::error::StoreError;
use crate::inputs::{RawInputs, merge_inputs};
use crate::inspect::entry_for_link;
use crate::store::entry::TransferMode;

/// Merge `inputs` over the inputs recorded for `link`'s entry and re-add.
///
/// # Errors
///
/// Returns an error if:
/// - `link` is not a symlink into a store entry
/// - The entry's recorded inputs are missing or malformed
/// - Any step of [`add`] fails
pub fn update(ctx: &Context, link: &Path, inputs: &RawInputs, options: &AddOptions) -> Result<AddResult, StoreError> {
  let link_path = ctx.resolve_path(link);
  let entry = entry_for_link(&link_path)?;

  let mut merged = entry.read_inputs()?;
  merge_inputs(&mut merged, inputs);
  info!(
    link = %link_path.display(),
    previous = %entry.hash,
    updated = inputs.len(),
    "updating link"
  );

  let options = AddOptions {
    mode: TransferMode::Copy,
    ..*options
  };
  add(ctx, &entry.artifact, &merged, &link_path, &options)
}
