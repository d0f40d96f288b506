//! Implementation of the `ne add` command.

use std::path::Path;

use anyhow::{Context, Result};

use nestor_lib::add::{AddResult, add};
use nestor_lib::context::{AddOptions, Context as StoreContext};
use nestor_lib::inputs::RawInputs;

use crate::output::{format_link, print_info, print_stat, print_success, truncate_hash};

/// Execute the add command.
///
/// Stores `result` under the hash of `inputs` and points `link` at it. Without
/// an explicit link the result path itself becomes the link.
pub fn cmd_add(
  ctx: &StoreContext,
  result: &Path,
  inputs: &RawInputs,
  link: Option<&Path>,
  options: &AddOptions,
) -> Result<()> {
  let link = link.unwrap_or(result);
  let added = add(ctx, result, inputs, link, options).with_context(|| format!("Failed to add {}", result.display()))?;

  report(&added);
  Ok(())
}

/// Print the outcome of an add or update.
pub(crate) fn report(added: &AddResult) {
  let hash = truncate_hash(&added.hash.0);
  if added.already_stored() {
    print_info(&format!("Already stored as {}", hash));
  } else {
    print_success(&format!("Stored as {}", hash));
  }
  print_stat("Entry", &added.outcome.artifact().display().to_string());
  print_stat("Link", &format_link(&added.link, &added.link_target));
}
