use std::path::Path;

use anyhow::{Context, Result};

use nestor_lib::context::Context as StoreContext;
use nestor_lib::inspect::get;

use crate::output::print_success;

/// Execute the get command: swap the link for a writable copy.
pub fn cmd_get(ctx: &StoreContext, link: &Path) -> Result<()> {
  let path = get(ctx, link).with_context(|| format!("Failed to get {}", link.display()))?;

  print_success(&format!("Copied {} out of the store", path.display()));
  Ok(())
}
