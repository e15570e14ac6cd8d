//! File-based store implementation.
//!
//! [`FileStore`] keeps every key in its own file below the store root, with
//! `/` in keys mapping to subdirectories:
//!
//! ```text
//! {root}/
//! +-- VERSION              # store format version
//! +-- chapters/
//!     +-- 123456/
//!         +-- intro        # value of key "chapters/123456/intro"
//! ```
//!
//! Writes go to a temporary sibling file that is then renamed over the
//! target, so a reader never sees a half-written value.
//!
//! Unlike a cache, a store directory with a different format version is never
//! wiped: opening it fails with [`StoreError::Version`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{Store, StoreError, validate_key};

/// Format version written to and expected in `VERSION`.
pub const STORE_FORMAT_VERSION: &str = "1";

const VERSION_FILE: &str = "VERSION";

/// Directory-backed [`Store`].
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open the store at `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Version`] if the directory holds a store of
    /// another format version, and [`StoreError::Io`] if it cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        check_version(&root)?;
        Ok(Self { root })
    }

    /// Store root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |path, segment| path.join(segment)))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Validate the store version, initializing a new store.
fn check_version(root: &Path) -> Result<(), StoreError> {
    let version_file = root.join(VERSION_FILE);

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored.trim() == STORE_FORMAT_VERSION => {
            debug!("store version matches: {STORE_FORMAT_VERSION}");
            Ok(())
        }
        Ok(stored) => Err(StoreError::Version {
            found: stored.trim().to_owned(),
            expected: STORE_FORMAT_VERSION.to_owned(),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(root = %root.display(), "initializing store");
            fs::create_dir_all(root)?;
            fs::write(&version_file, STORE_FORMAT_VERSION)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
