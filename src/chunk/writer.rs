//! Chunk writing: single-slice writes, continuation patching, and the
//! chunked value writer that splits one buffer across allocated spaces.

use crate::error::{FlatError, Result};
use crate::file::StoreFile;
use crate::format::{self, Span, ENVELOPE_OVERHEAD, FIELD_LEN};
use crate::space::SpacePool;

/// Write one slice of `source` into `target` as a chunk envelope
///
/// An unusable target (< 60 bytes) is left untouched and 0 is
/// returned. Otherwise the chunk holds
/// `min(remaining source bytes, content capacity)` content bytes, the
/// length field records the envelope actually used, and the trailer is
/// 0 when the slice consumed the rest of the source, else
/// `continuation_if_more`. Returns the number of content bytes written.
pub fn write_slice(
    file: &mut StoreFile,
    source: &[u8],
    source_offset: usize,
    target: &Span,
    continuation_if_more: u64,
) -> Result<usize> {
    if !format::is_usable(target) {
        return Ok(0);
    }
    let capacity = format::content_span(target).length as usize;
    let remaining = source.len() - source_offset;
    let take = remaining.min(capacity);

    let envelope_len = take as u64 + ENVELOPE_OVERHEAD;
    file.write_at(&format::encode_field(envelope_len), target.offset)?;
    file.write_at(
        &source[source_offset..source_offset + take],
        target.offset + FIELD_LEN,
    )?;

    let trailer = if take == remaining { 0 } else { continuation_if_more };
    let trailer_offset = target.offset + FIELD_LEN + take as u64;
    file.write_at(&format::encode_field(trailer), trailer_offset)?;

    Ok(take)
}

/// Rewrite the continuation trailer of an already-written chunk
pub fn patch_continuation(file: &mut StoreFile, envelope: &Span, next_offset: u64) -> Result<()> {
    file.write_at(
        &format::encode_field(next_offset),
        envelope.end() - FIELD_LEN,
    )
}

/// Write a whole value as a chunk chain against successive allocations
///
/// Each round asks the pool for the full remainder plus envelope
/// overhead; a smaller best-fit space simply produces a partial chunk
/// and another round. A chunk's trailer starts out as a terminal 0 and
/// is patched once the next space's offset is known, so the last chunk
/// always ends the chain. Returns the occupied envelope spans in chain
/// order; empty input still produces a single zero-content chunk.
pub fn write_chunked(
    file: &mut StoreFile,
    pool: &mut SpacePool,
    source: &[u8],
) -> Result<Vec<Span>> {
    let mut written: Vec<Span> = Vec::new();
    let mut source_offset = 0;
    loop {
        let remaining = source.len() - source_offset;
        let space = pool.provide(remaining as u64 + ENVELOPE_OVERHEAD);
        if let Some(previous) = written.last() {
            patch_continuation(file, previous, space.offset)?;
        }
        let take = write_slice(file, source, source_offset, &space, 0)?;
        if take == 0 && remaining > 0 {
            return Err(FlatError::Corrupt(format!(
                "allocated space at offset {} too small for a chunk",
                space.offset
            )));
        }
        source_offset += take;
        written.push(Span::new(space.offset, take as u64 + ENVELOPE_OVERHEAD));
        if source_offset >= source.len() {
            break;
        }
    }
    Ok(written)
}
