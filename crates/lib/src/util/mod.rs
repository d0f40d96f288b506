//! Shared utilities.
//!
//! Common utilities used across the crate including hashing, canonical JSON
//! and test helpers.

pub mod hash;
pub mod json;

#[cfg(test)]
pub mod testutil;
