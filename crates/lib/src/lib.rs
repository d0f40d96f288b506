//! nestor-lib: a content-addressed artifact store.
//!
//! Build results are stored under the SHA-1 of their inputs and exposed
//! through relative symlinks:
//! - `add`: store a result under the hash of its inputs and link to it
//! - `update`: re-add a linked entry with some inputs changed
//! - `inspect`: read a link's entry, check freshness, detach a link

pub mod add;
pub mod consts;
pub mod context;
pub mod error;
pub mod init;
pub mod inputs;
pub mod inspect;
pub mod platform;
pub mod store;
pub mod update;
pub mod util;

pub use add::{AddResult, add};
pub use context::{AddOptions, Context};
pub use error::StoreError;
pub use update::update;
