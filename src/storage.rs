//! Content Storage
//!
//! Orchestrates one store file: allocation plus chunked writing for
//! `set`, chain-walk reading for `get`, index delegation for `remove`,
//! and the post-mutation truncation policy.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::chunk;
use crate::config::{Config, SyncStrategy};
use crate::error::Result;
use crate::file::StoreFile;
use crate::format::HEADER_LEN;
use crate::index::ContentIndex;
use crate::space::{self, SpacePool};

/// Storage layer over a single flat file
///
/// ## Concurrency:
/// - `index`: RwLock — readers resolve offsets concurrently, a
///   mutation holds the write side for its whole duration
/// - callers must serialize mutations themselves (the facade holds a
///   single write lock across set/remove/clear); two interleaved
///   mutations would allocate against stale free-space snapshots
pub struct ContentStorage {
    path: PathBuf,
    sync_strategy: SyncStrategy,
    index: RwLock<ContentIndex>,
}

impl ContentStorage {
    /// Open a store file, creating and initializing it when missing
    pub fn open(config: &Config) -> Result<Self> {
        let mut file = if config.path.exists() {
            StoreFile::open_rw(&config.path)?
        } else {
            tracing::debug!(path = %config.path.display(), "creating store file");
            StoreFile::create(&config.path)?
        };
        let index = ContentIndex::load(&mut file)?;
        if config.sync_strategy == SyncStrategy::EveryMutation {
            file.sync()?;
        }
        Ok(Self {
            path: config.path.clone(),
            sync_strategy: config.sync_strategy,
            index: RwLock::new(index),
        })
    }

    /// Write a value under a key, reusing freed space where it fits
    pub fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut file = StoreFile::open_rw(&self.path)?;
        let mut index = self.index.write();

        let (spaces, data_end) = index.allocation_snapshot(&mut file)?;
        let mut pool = SpacePool::new(spaces, data_end);
        let written = chunk::write_chunked(&mut file, &mut pool, value)?;
        tracing::debug!(
            key,
            bytes = value.len(),
            chunks = written.len(),
            offset = written[0].offset,
            "value written"
        );

        index.set_offset(&mut file, key.to_string(), written[0].offset)?;
        self.truncate_tail(&mut file, &index)?;
        self.finish_mutation(&file)
    }

    /// Read a value by key; `None` when the key is unknown
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let offset = match self.index.read().offset(key) {
            Some(offset) => offset,
            None => return Ok(None),
        };
        let mut file = StoreFile::open_read(&self.path)?;
        chunk::read_chain(&mut file, offset).map(Some)
    }

    /// Remove a key; returns whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut file = StoreFile::open_rw(&self.path)?;
        let mut index = self.index.write();
        let existed = index.remove(&mut file, key)?;
        self.truncate_tail(&mut file, &index)?;
        self.finish_mutation(&file)?;
        Ok(existed)
    }

    /// Remove every key
    pub fn clear(&self) -> Result<()> {
        let mut file = StoreFile::open_rw(&self.path)?;
        let mut index = self.index.write();
        index.clear(&mut file)?;
        self.truncate_tail(&mut file, &index)?;
        self.finish_mutation(&file)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// Smallest key strictly greater than `last` (live key cursor)
    pub fn key_after(&self, last: Option<&str>) -> Option<String> {
        self.index.read().key_after(last)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Reclaim trailing space after a mutation
    ///
    /// Shrinks the file to the end of the last occupied span. Internal
    /// gaps are left in place for future best-fit reuse.
    fn truncate_tail(&self, file: &mut StoreFile, index: &ContentIndex) -> Result<()> {
        let data_end = space::data_end(&index.spans(file)?);
        let file_size = file.size()?;
        if data_end > HEADER_LEN && file_size > data_end {
            file.truncate(data_end)?;
            tracing::debug!(from = file_size, to = data_end, "truncated trailing space");
        }
        Ok(())
    }

    fn finish_mutation(&self, file: &StoreFile) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryMutation {
            file.sync()?;
        }
        Ok(())
    }
}
