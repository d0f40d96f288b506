//! Filesystem primitives that differ across platforms.
//!
//! - [`immutable`] - Write-protecting stored files
//! - [`link`] - Relative symlinks and their atomic replacement

pub mod immutable;
pub mod link;
