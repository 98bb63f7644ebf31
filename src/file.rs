//! Store File
//!
//! Positional raw file I/O over the single store file. Every logical
//! operation opens its own handle and holds it for the operation's
//! duration; the handle is released on all exit paths when the
//! `StoreFile` drops.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::Result;
use crate::format::Span;

/// A scoped handle on the store file
pub struct StoreFile {
    file: File,
}

impl StoreFile {
    /// Open an existing store file for reading
    pub fn open_read(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self { file })
    }

    /// Open an existing store file for reading and writing
    pub fn open_rw(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self { file })
    }

    /// Create a new empty store file, truncating any previous content
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file })
    }

    /// Read exactly `span.length` bytes starting at `span.offset`
    pub fn read_span(&mut self, span: &Span) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; span.length as usize];
        self.file.seek(SeekFrom::Start(span.offset))?;
        self.file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Write all of `bytes` starting at `offset`
    pub fn write_at(&mut self, bytes: &[u8], offset: u64) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(bytes)?;
        Ok(())
    }

    /// Current file size in bytes
    pub fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Shrink the file to `size` bytes
    pub fn truncate(&self, size: u64) -> Result<()> {
        self.file.set_len(size)?;
        Ok(())
    }

    /// Force file contents to disk
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}
