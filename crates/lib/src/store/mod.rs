//! Store operations for nestor.
//!
//! The store is the content-addressed storage for recorded results.
//!
//! # Layout
//!
//! ```text
//! <project>/.ne/store/
//! └── <sha1hex>-<artifact-basename>/    # one entry per global hash, immutable
//!     ├── <artifact-basename>           # the stored result
//!     └── nestor.json                   # original inputs, sorted keys
//! ```
//!
//! Entries are published by renaming a fully populated staging directory
//! (`.tmp-*`) into place, so an entry directory that exists is complete.

pub mod entry;
pub mod metadata;
pub mod paths;
