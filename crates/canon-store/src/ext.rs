//! Extension trait for [`Store`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Store, StoreError};

/// Typed convenience methods for [`Store`].
///
/// Implemented for every store through a blanket impl, so [`Store`] stays
/// object-safe and implementors only handle raw bytes.
pub trait StoreExt: Store {
    /// Retrieve a JSON-deserialized value.
    ///
    /// Returns `Ok(None)` when the key is absent and an error when the stored
    /// bytes do not deserialize to `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.get(key)?
            .map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Store a value as pretty-printed JSON.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.set(key, &bytes)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}
