//! Implementation of the `ne update` command.
//!
//! Re-adds the entry behind a link with some of its recorded inputs replaced
//! or added. The old entry stays in the store unchanged.

use std::path::Path;

use anyhow::{Context, Result};

use nestor_lib::context::{AddOptions, Context as StoreContext};
use nestor_lib::inputs::RawInputs;
use nestor_lib::update::update;

use super::add::report;

pub fn cmd_update(ctx: &StoreContext, link: &Path, inputs: &RawInputs, options: &AddOptions) -> Result<()> {
  let updated = update(ctx, link, inputs, options).with_context(|| format!("Failed to update {}", link.display()))?;

  report(&updated);
  Ok(())
}
