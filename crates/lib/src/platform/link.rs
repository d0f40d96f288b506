//! Relative symlinks into the store.
//!
//! A link's target is always relative to the directory containing the link,
//! so a project directory can be moved or copied together with its store.
//! Links are replaced by renaming a freshly created temporary symlink over the
//! old path, so the link path never disappears.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::STAGING_PREFIX;

/// What to do when the link path holds something other than a symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkPolicy {
  /// Fail with [`LinkError::Occupied`].
  #[default]
  Refuse,
  /// Delete the file or directory, then link.
  Replace,
}

#[derive(Debug, Error)]
pub enum LinkError {
  #[error("refusing to replace {}: it exists and is not a symlink", path.display())]
  Occupied { path: PathBuf },

  #[error("{} does not exist", path.display())]
  Missing { path: PathBuf },

  #[error("{} is not a symlink", path.display())]
  NotALink { path: PathBuf },

  #[error("{} points to a path that does not exist: {source}", path.display())]
  Dangling {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{} has no file name", path.display())]
  InvalidPath { path: PathBuf },

  #[error("failed to {op} {}: {source}", path.display())]
  Io {
    op: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

fn io_err<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> LinkError + 'a {
  move |source| LinkError::Io {
    op,
    path: path.to_path_buf(),
    source,
  }
}

/// Point `link` at `target` with a relative symlink.
///
/// Returns the relative target that was written.
pub fn link_file(target: &Path, link: &Path, policy: LinkPolicy) -> Result<PathBuf, LinkError> {
  let name = link.file_name().ok_or_else(|| LinkError::InvalidPath {
    path: link.to_path_buf(),
  })?;
  let parent = link_parent(link);
  let parent = dunce::canonicalize(parent).map_err(io_err("resolve link directory", parent))?;
  let link_path = parent.join(name);

  clear_existing(&link_path, policy)?;

  let target = dunce::canonicalize(target).map_err(io_err("resolve link target", target))?;
  let relative = relative_path(&parent, &target);

  let mut temp_name = OsString::from(format!("{}{}-", STAGING_PREFIX, std::process::id()));
  temp_name.push(name);
  let temp_link = parent.join(temp_name);

  match fs::remove_file(&temp_link) {
    Ok(()) => debug!(path = %temp_link.display(), "removed stale temporary link"),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(io_err("remove stale link", &temp_link)(e)),
  }

  create_symlink(&relative, &temp_link).map_err(io_err("create symlink", &temp_link))?;

  if let Err(e) = fs::rename(&temp_link, &link_path) {
    let _ = fs::remove_file(&temp_link);
    return Err(io_err("replace link", &link_path)(e));
  }

  info!(link = %link_path.display(), target = %relative.display(), "linked");
  Ok(relative)
}

/// Fail early if [`link_file`] would refuse `link_path` under `policy`, or
/// could not create a link there at all.
pub fn ensure_linkable(link_path: &Path, policy: LinkPolicy) -> Result<(), LinkError> {
  if link_path.file_name().is_none() {
    return Err(LinkError::InvalidPath {
      path: link_path.to_path_buf(),
    });
  }
  let parent = link_parent(link_path);
  if !fs::metadata(parent).map_err(io_err("resolve link directory", parent))?.is_dir() {
    return Err(io_err("resolve link directory", parent)(io::Error::new(
      io::ErrorKind::NotADirectory,
      "not a directory",
    )));
  }

  if policy == LinkPolicy::Replace {
    return Ok(());
  }
  match fs::symlink_metadata(link_path) {
    Ok(m) if !m.file_type().is_symlink() => Err(LinkError::Occupied {
      path: link_path.to_path_buf(),
    }),
    Ok(_) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(io_err("inspect", link_path)(e)),
  }
}

/// The directory a link at `link` lives in.
fn link_parent(link: &Path) -> &Path {
  match link.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  }
}

/// Make room for a new link at `link_path`. Existing symlinks are left for
/// the rename to replace.
fn clear_existing(link_path: &Path, policy: LinkPolicy) -> Result<(), LinkError> {
  let metadata = match fs::symlink_metadata(link_path) {
    Ok(m) => m,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
    Err(e) => return Err(io_err("inspect", link_path)(e)),
  };

  if metadata.file_type().is_symlink() {
    return Ok(());
  }

  match policy {
    LinkPolicy::Refuse => Err(LinkError::Occupied {
      path: link_path.to_path_buf(),
    }),
    LinkPolicy::Replace => {
      warn!(path = %link_path.display(), dir = metadata.is_dir(), "removing existing path to make room for link");
      if metadata.is_dir() {
        fs::remove_dir_all(link_path).map_err(io_err("remove directory", link_path))
      } else {
        fs::remove_file(link_path).map_err(io_err("remove file", link_path))
      }
    }
  }
}

/// Follow the symlink at `link` to the real path of what it points to.
pub fn resolve_link(link: &Path) -> Result<PathBuf, LinkError> {
  let metadata = match fs::symlink_metadata(link) {
    Ok(m) => m,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(LinkError::Missing {
        path: link.to_path_buf(),
      });
    }
    Err(e) => return Err(io_err("inspect", link)(e)),
  };

  if !metadata.file_type().is_symlink() {
    return Err(LinkError::NotALink {
      path: link.to_path_buf(),
    });
  }

  dunce::canonicalize(link).map_err(|e| LinkError::Dangling {
    path: link.to_path_buf(),
    source: e,
  })
}

/// The path that leads from directory `from_dir` to `to`.
///
/// Both paths must be absolute and free of `.`/`..`. Paths on different roots
/// (e.g. Windows drives) have no relative form, so `to` is returned as is.
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
  let from: Vec<Component<'_>> = from_dir.components().collect();
  let to_components: Vec<Component<'_>> = to.components().collect();

  if from.first() != to_components.first() {
    return to.to_path_buf();
  }

  let common = from
    .iter()
    .zip(&to_components)
    .take_while(|(a, b)| a == b)
    .count();

  let mut relative = PathBuf::new();
  for _ in common..from.len() {
    relative.push("..");
  }
  for component in &to_components[common..] {
    relative.push(component.as_os_str());
  }
  relative
}

/// Cross-platform symlink creation helper
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
  #[cfg(unix)]
  {
    std::os::unix::fs::symlink(target, link)
  }
  #[cfg(windows)]
  {
    std::os::windows::fs::symlink_file(target, link)
  }
}
