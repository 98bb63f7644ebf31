//! Store Facade
//!
//! The public key-value API over one store file.
//!
//! ## Concurrency Model: Single Writer
//!
//! - **Mutations** (set/remove/clear): serialized by `write_lock`,
//!   exactly one in flight at a time. A mutation reads a free-space
//!   snapshot, allocates against it and rewrites the index; two
//!   concurrent mutations against stale snapshots could pick
//!   overlapping spans and corrupt chain structure.
//! - **Reads** (get/contains/keys): not serialized against writes. A
//!   `get` racing a committing `set` for the same key may observe the
//!   old or the new offset; no snapshot isolation is provided.

use std::path::Path;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::storage::ContentStorage;

/// An embedded, single-file key-value store
pub struct Store {
    storage: ContentStorage,

    /// Serializes mutating operations (set/remove/clear)
    write_lock: Mutex<()>,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// A nonexistent path is created with a zeroed header and an empty
    /// persisted index.
    pub fn open(config: Config) -> Result<Self> {
        let storage = ContentStorage::open(&config)?;
        Ok(Self {
            storage,
            write_lock: Mutex::new(()),
        })
    }

    /// Open with a path (convenience method)
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(Config::builder().path(path.as_ref()).build())
    }

    /// Get the value stored under `key`, or `None`
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.storage.get(key)
    }

    /// Store `value` under `key`, overwriting any previous value
    pub fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let _write_guard = self.write_lock.lock();
        self.storage.set(key, value)
    }

    /// Whether `key` currently has a value
    pub fn contains(&self, key: &str) -> bool {
        self.storage.contains(key)
    }

    /// Remove `key`; returns whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let _write_guard = self.write_lock.lock();
        self.storage.remove(key)
    }

    /// Remove every key
    pub fn clear(&self) -> Result<()> {
        let _write_guard = self.write_lock.lock();
        self.storage.clear()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Live view over the keys, in sorted order
    ///
    /// Each step resolves the next key against the current index, so
    /// the iterator is finite and survives concurrent mutation; it is
    /// not restartable against one.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            storage: &self.storage,
            last: None,
        }
    }

    /// Live view over `(key, value)` pairs
    ///
    /// Keys removed between the key step and the value read are
    /// skipped.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            storage: &self.storage,
            last: None,
        }
    }

    /// Live view over the values
    pub fn values(&self) -> Values<'_> {
        Values {
            entries: self.entries(),
        }
    }

    /// The path of the underlying store file
    pub fn path(&self) -> &Path {
        self.storage.path()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Lazy, live iterator over the store's keys
pub struct Keys<'a> {
    storage: &'a ContentStorage,
    last: Option<String>,
}

impl Iterator for Keys<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.storage.key_after(self.last.as_deref())?;
        self.last = Some(key.clone());
        Some(key)
    }
}

/// Lazy, live iterator over `(key, value)` pairs
pub struct Entries<'a> {
    storage: &'a ContentStorage,
    last: Option<String>,
}

impl Iterator for Entries<'_> {
    type Item = Result<(String, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let key = self.storage.key_after(self.last.as_deref())?;
            self.last = Some(key.clone());
            match self.storage.get(&key) {
                Ok(Some(value)) => return Some(Ok((key, value))),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Lazy, live iterator over the store's values
pub struct Values<'a> {
    entries: Entries<'a>,
}

impl Iterator for Values<'_> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.entries.next()?.map(|(_, value)| value))
    }
}
