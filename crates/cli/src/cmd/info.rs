use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use nestor_lib::context::Context as StoreContext;
use nestor_lib::inspect::info;

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(ctx: &StoreContext, link: &Path, output: OutputFormat) -> Result<()> {
  let info = info(ctx, link).with_context(|| format!("Failed to inspect {}", link.display()))?;

  if output.is_json() {
    return print_json(&info);
  }

  print_stat("Hash", &info.hash.0);
  print_stat("Entry", &info.entry.display().to_string());
  print_stat("Artifact", &info.artifact.display().to_string());
  println!("  {}", "Inputs:".if_supports_color(Stream::Stdout, |s| s.dimmed()));
  for (name, value) in &info.inputs {
    println!("    {} = {}", name.if_supports_color(Stream::Stdout, |s| s.cyan()), value);
  }

  Ok(())
}
