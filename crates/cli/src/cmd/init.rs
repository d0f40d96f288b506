//! Implementation of the `ne init` command.
//!
//! Creates `.ne/store` in the given directory so that `add` run anywhere
//! below it finds the store.

use std::path::Path;

use anyhow::{Context, Result};

use nestor_lib::init::init_store;

use crate::output::{print_info, print_stat, print_success};

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the store directory cannot be created.
pub fn cmd_init(root: &Path) -> Result<()> {
  let result = init_store(root).context("Failed to initialize store")?;

  if result.created {
    print_success("Initialized store!");
  } else {
    print_info("Store already initialized");
  }
  print_stat("Store", &result.store_dir.display().to_string());

  Ok(())
}
