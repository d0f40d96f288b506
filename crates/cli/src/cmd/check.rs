//! Implementation of the `ne check` command.

use std::path::Path;

use anyhow::{Context, Result};

use nestor_lib::context::Context as StoreContext;
use nestor_lib::inspect::{Freshness, check};

use crate::output::{OutputFormat, print_json, print_stat, print_success, print_warning, truncate_hash};

/// Execute the check command.
///
/// Returns the link's freshness so the caller can pick the exit code.
pub fn cmd_check(ctx: &StoreContext, link: &Path, output: OutputFormat) -> Result<Freshness> {
  let report = check(ctx, link).with_context(|| format!("Failed to check {}", link.display()))?;

  if output.is_json() {
    print_json(&report)?;
    return Ok(report.status);
  }

  match report.status {
    Freshness::Fresh => print_success(&format!("{} is up to date", link.display())),
    Freshness::Stale => {
      print_warning(&format!("{} is stale", link.display()));
      print_stat("Recorded", truncate_hash(&report.recorded.0));
      print_stat("Current", truncate_hash(&report.current.0));
    }
  }

  Ok(report.status)
}
