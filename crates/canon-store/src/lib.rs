//! Key-value storage for canon.
//!
//! Publishing keeps a small record per chapter (content hashes and the page
//! version it produced). This crate decouples that bookkeeping from where it
//! lives:
//!
//! - [`Store`]: get/set/delete of raw bytes by string key
//! - [`StoreExt`]: typed JSON helpers over any [`Store`]
//!
//! # Implementations
//!
//! - [`MemoryStore`]: in-process map, for tests and dry runs
//! - [`FileStore`]: one file per key under a versioned directory
//!
//! # Example
//!
//! ```
//! use canon_store::{MemoryStore, Store, StoreExt};
//!
//! let store = MemoryStore::default();
//! store.set_json("chapters/42/intro", &7u32)?;
//! assert_eq!(store.get_json::<u32>("chapters/42/intro")?, Some(7));
//! assert!(store.delete("chapters/42/intro")?);
//! # Ok::<(), canon_store::StoreError>(())
//! ```
//!
//! Keys are `/`-separated paths of non-empty segments; `.` and `..` segments
//! are rejected.

mod error;
mod ext;
mod file;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

pub use error::StoreError;
pub use ext::StoreExt;
pub use file::{FileStore, STORE_FORMAT_VERSION};

/// Byte store addressed by string keys.
pub trait Store: Send + Sync {
    /// Value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Delete `key`. Returns whether a value was present.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;
}

/// Reject keys that are empty or would escape a directory layout.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}

/// In-memory [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries().insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.entries().remove(key).is_some())
    }
}
