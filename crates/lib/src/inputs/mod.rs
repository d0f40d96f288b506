//! Input mappings and their digests.
//!
//! An input mapping pairs caller-chosen names with values. Each value is
//! either a path to an existing file, whose content is hashed, or a literal
//! string, whose UTF-8 bytes are hashed. The classification happens once, when
//! the mapping is resolved into an [`InputSet`].
//!
//! # Modules
//!
//! - [`parse`] - `name:value` parsing for command-line dependency lists
//! - [`resolve`] - Path-or-literal classification and digesting
//! - [`types`] - Core input types (raw mappings, resolved values, digests)

pub mod parse;
pub mod resolve;
mod types;

pub use resolve::global_hash;
pub use types::*;
