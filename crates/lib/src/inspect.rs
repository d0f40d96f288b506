//! Read-only views of a link's entry, and detaching a link from the store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::consts::STAGING_PREFIX;
use crate::context::Context;
use crate::error::StoreError;
use crate::inputs::{Digests, InputSet, RawInputs, global_hash};
use crate::platform::immutable::make_writable;
use crate::platform::link::resolve_link;
use crate::store::entry::EntryRef;
use crate::util::hash::ObjectHash;

/// The entry that the symlink at `link_path` points into.
pub fn entry_for_link(link_path: &Path) -> Result<EntryRef, StoreError> {
  let resolved = resolve_link(link_path)?;
  EntryRef::from_artifact(&resolved).ok_or_else(|| StoreError::InvalidLinkTarget {
    path: link_path.to_path_buf(),
    reason: format!("{} is not inside a store entry", resolved.display()),
  })
}

fn io_err<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> StoreError + 'a {
  move |source| StoreError::Io {
    op,
    path: path.to_path_buf(),
    source,
  }
}

/// Where a link points and what its entry recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkInfo {
  pub link: PathBuf,
  pub hash: ObjectHash,
  pub entry: PathBuf,
  pub artifact: PathBuf,
  pub inputs: RawInputs,
}

pub fn info(ctx: &Context, link: &Path) -> Result<LinkInfo, StoreError> {
  let link_path = ctx.resolve_path(link);
  let entry = entry_for_link(&link_path)?;
  let inputs = entry.read_inputs()?;

  Ok(LinkInfo {
    link: link_path,
    hash: entry.hash,
    entry: entry.dir,
    artifact: entry.artifact,
    inputs,
  })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
  /// The recorded inputs still hash to the entry's hash.
  Fresh,
  /// Some input changed since the entry was stored.
  Stale,
}

/// Outcome of re-hashing a link entry's recorded inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
  pub link: PathBuf,
  pub status: Freshness,
  /// The hash in the entry's name.
  pub recorded: ObjectHash,
  /// The hash of the recorded inputs as they are now.
  pub current: ObjectHash,
  /// Current digest of each recorded input.
  pub digests: Digests,
}

/// Is the entry behind `link` still what its inputs would produce today?
///
/// Recorded paths are resolved against the context's start directory, like
/// they were when the entry was added.
pub fn check(ctx: &Context, link: &Path) -> Result<CheckReport, StoreError> {
  let link_path = ctx.resolve_path(link);
  let entry = entry_for_link(&link_path)?;
  let recorded_inputs = entry.read_inputs()?;

  let digests = InputSet::resolve(&recorded_inputs, &ctx.start_dir).digest()?;
  let current = global_hash(&digests)?;
  let status = if current == entry.hash {
    Freshness::Fresh
  } else {
    Freshness::Stale
  };
  info!(link = %link_path.display(), status = ?status, "checked link");

  Ok(CheckReport {
    link: link_path,
    status,
    recorded: entry.hash,
    current,
    digests,
  })
}

/// Replace the link with a writable copy of its artifact.
///
/// The copy is written next to the link and renamed over it, so the path
/// always holds either the link or the complete copy. Returns the path.
pub fn get(ctx: &Context, link: &Path) -> Result<PathBuf, StoreError> {
  let link_path = ctx.resolve_path(link);
  let entry = entry_for_link(&link_path)?;
  let parent = link_path.parent().ok_or_else(|| StoreError::InvalidLinkTarget {
    path: link_path.clone(),
    reason: "it has no parent directory".to_string(),
  })?;

  let mut temp = tempfile::Builder::new()
    .prefix(STAGING_PREFIX)
    .tempfile_in(parent)
    .map_err(io_err("create temporary file in", parent))?;
  let mut source = fs::File::open(&entry.artifact).map_err(io_err("open", &entry.artifact))?;
  io::copy(&mut source, temp.as_file_mut()).map_err(io_err("copy", &entry.artifact))?;

  let permissions = source
    .metadata()
    .map_err(io_err("inspect", &entry.artifact))?
    .permissions();
  fs::set_permissions(temp.path(), permissions).map_err(io_err("set permissions on", temp.path()))?;
  make_writable(temp.path()).map_err(|e| StoreError::Io {
    op: "make writable",
    path: temp.path().to_path_buf(),
    source: io::Error::other(e),
  })?;

  temp
    .persist(&link_path)
    .map_err(|e| StoreError::Io {
      op: "replace link",
      path: link_path.clone(),
      source: e.error,
    })?;

  info!(link = %link_path.display(), entry = %entry.dir.display(), "detached link from store");
  Ok(link_path)
}
