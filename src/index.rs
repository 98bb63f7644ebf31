//! Content Index
//!
//! The persisted key → offset map. Each key maps to the first chunk
//! offset of its value chain. The index itself is stored as a chain of
//! chunks whose content is the UTF-8 JSON list of `[key, offset]`
//! pairs; the 20-byte file header points at the chain's first chunk.
//!
//! The index also owns the free-space cache: the gap list derived from
//! the occupied footprint, valid only until the next structural
//! mutation.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::chunk;
use crate::error::Result;
use crate::file::StoreFile;
use crate::format::{self, Span, FIELD_LEN, HEADER_LEN};
use crate::space::{self, SpacePool};

/// Persisted shape of the index chain content
type IndexStorageFormat = Vec<(String, u64)>;

/// In-memory key → first-chunk-offset map with free-space caching
pub struct ContentIndex {
    map: BTreeMap<String, u64>,
    /// Cached free gaps plus the occupied data end, None when stale
    free_snapshot: Option<(Vec<Span>, u64)>,
}

impl ContentIndex {
    /// Create an empty, unpersisted index
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            free_snapshot: None,
        }
    }

    /// Load the index from an open store file
    ///
    /// A header that is too short or not numeric means the store is
    /// empty or brand new, not an error; in that case an empty index
    /// is persisted once so the header becomes valid. A header of 0
    /// (the freshly-created state) is treated the same way.
    pub fn load(file: &mut StoreFile) -> Result<Self> {
        let start_offset = if file.size()? < HEADER_LEN {
            None
        } else {
            let header = file.read_span(&Span::new(0, FIELD_LEN))?;
            format::decode_field_lenient(&header).filter(|&offset| offset != 0)
        };

        let mut index = Self::new();
        match start_offset {
            Some(offset) => {
                let content = chunk::read_chain(file, offset)?;
                if !content.is_empty() {
                    let pairs: IndexStorageFormat = serde_json::from_slice(&content)?;
                    index.map = pairs.into_iter().collect();
                }
                tracing::debug!(entries = index.map.len(), "index loaded");
            }
            None => {
                file.write_at(&format::encode_field(0), 0)?;
                index.persist(file)?;
                tracing::debug!("initialized empty index");
            }
        }
        Ok(index)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// First chunk offset of the key's value chain
    pub fn offset(&self, key: &str) -> Option<u64> {
        self.map.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Smallest key strictly greater than `last`, or the first key
    ///
    /// Drives the live key iterator: each step re-resolves against the
    /// current map, so the sequence stays finite under concurrent
    /// mutation without being a snapshot.
    pub fn key_after(&self, last: Option<&str>) -> Option<String> {
        let lower = match last {
            Some(key) => Bound::Excluded(key.to_string()),
            None => Bound::Unbounded,
        };
        self.map
            .range((lower, Bound::Unbounded))
            .next()
            .map(|(key, _)| key.clone())
    }

    // =========================================================================
    // Mutations
    // =========================================================================
    // Every mutation invalidates the free-space cache, rewrites the
    // whole index chain against a fresh free-space snapshot (the old
    // chain still counts as occupied during the rewrite) and points
    // the header at the new chain.

    /// Record the first chunk offset for a key and persist the index
    pub fn set_offset(&mut self, file: &mut StoreFile, key: String, offset: u64) -> Result<()> {
        self.map.insert(key, offset);
        self.free_snapshot = None;
        self.persist(file)
    }

    /// Drop a key and persist the index; returns whether it existed
    pub fn remove(&mut self, file: &mut StoreFile, key: &str) -> Result<bool> {
        let existed = self.map.remove(key).is_some();
        self.free_snapshot = None;
        self.persist(file)?;
        Ok(existed)
    }

    /// Drop every key and persist the now-empty index
    pub fn clear(&mut self, file: &mut StoreFile) -> Result<()> {
        self.map.clear();
        self.free_snapshot = None;
        self.persist(file)
    }

    // =========================================================================
    // Occupied Footprint and Free Space
    // =========================================================================

    /// Every occupied envelope span: each value chain plus the index's
    /// own chain
    pub fn spans(&self, file: &mut StoreFile) -> Result<Vec<Span>> {
        let mut occupied = Vec::new();
        for &offset in self.map.values() {
            occupied.extend(chunk::collect_chain_spans(file, offset)?);
        }
        let index_start = read_header(file)?;
        occupied.extend(chunk::collect_chain_spans(file, index_start)?);
        Ok(occupied)
    }

    /// The cached free gap list
    pub fn spaces(&mut self, file: &mut StoreFile) -> Result<Vec<Span>> {
        Ok(self.allocation_snapshot(file)?.0)
    }

    /// Free gap list plus occupied data end, for seeding an allocator
    pub fn allocation_snapshot(&mut self, file: &mut StoreFile) -> Result<(Vec<Span>, u64)> {
        if self.free_snapshot.is_none() {
            let occupied = self.spans(file)?;
            self.free_snapshot = Some((
                space::free_spaces(&occupied),
                space::data_end(&occupied),
            ));
        }
        Ok(self.free_snapshot.clone().unwrap())
    }

    /// Re-serialize the entire index into the file and update the header
    pub fn persist(&mut self, file: &mut StoreFile) -> Result<()> {
        let pairs: Vec<(&String, &u64)> = self.map.iter().collect();
        let content = serde_json::to_vec(&pairs)?;

        let occupied = self.spans(file)?;
        let mut pool = SpacePool::new(
            space::free_spaces(&occupied),
            space::data_end(&occupied),
        );
        let written = chunk::write_chunked(file, &mut pool, &content)?;
        file.write_at(&format::encode_field(written[0].offset), 0)?;

        // The rewrite itself moved the footprint.
        self.free_snapshot = None;
        tracing::debug!(
            bytes = content.len(),
            chunks = written.len(),
            offset = written[0].offset,
            "index persisted"
        );
        Ok(())
    }
}

impl Default for ContentIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the index chain start offset from the file header
pub fn read_header(file: &mut StoreFile) -> Result<u64> {
    let header = file.read_span(&Span::new(0, FIELD_LEN))?;
    format::decode_field(&header)
}
