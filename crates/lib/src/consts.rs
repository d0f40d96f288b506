//! Names and sizes fixed by the on-disk store format.

/// Directory, relative to a project directory, that holds the store.
pub const STORE_DIR: &str = ".ne/store";

/// Recorded input mapping inside every entry.
pub const METADATA_FILENAME: &str = "nestor.json";

/// Environment variable naming a store root directly, bypassing the upward search.
pub const STORE_ENV_VAR: &str = "NESTOR_STORE";

/// Prefix of staging directories and temporary links. Never a valid hex digit.
pub const STAGING_PREFIX: &str = ".tmp-";

/// Length of a lowercase hex SHA-1 digest.
pub const HASH_HEX_LEN: usize = 40;
