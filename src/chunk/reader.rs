//! Chunk reading: envelope fields, single-chunk content, chain walking.

use std::collections::HashSet;

use crate::error::{FlatError, Result};
use crate::file::StoreFile;
use crate::format::{self, Span, ENVELOPE_OVERHEAD, FIELD_LEN};

/// Read the envelope span of the chunk starting at `offset`
///
/// Decodes the 20-byte length field; the resulting span covers the
/// whole envelope including both fields.
pub fn read_span(file: &mut StoreFile, offset: u64) -> Result<Span> {
    let field = file.read_span(&Span::new(offset, FIELD_LEN))?;
    let length = format::decode_field(&field)?;
    if length < ENVELOPE_OVERHEAD {
        return Err(FlatError::Corrupt(format!(
            "chunk at offset {} declares envelope of {} bytes, minimum is {}",
            offset, length, ENVELOPE_OVERHEAD
        )));
    }
    Ok(Span::new(offset, length))
}

/// Read the content bytes of a chunk envelope
pub fn read_content(file: &mut StoreFile, envelope: &Span) -> Result<Vec<u8>> {
    let content = format::content_span(envelope);
    if content.length == 0 {
        return Ok(Vec::new());
    }
    file.read_span(&content)
}

/// Read the continuation trailer of a chunk; 0 means the chain ends here
pub fn read_continuation(file: &mut StoreFile, envelope: &Span) -> Result<u64> {
    let trailer = Span::new(envelope.end() - FIELD_LEN, FIELD_LEN);
    let field = file.read_span(&trailer)?;
    format::decode_field(&field)
}

/// Collect the envelope spans of a whole chain, in chain order
///
/// Follows continuations iteratively until a terminal 0. A start
/// offset of 0 denotes the empty chain. A continuation pointing at an
/// already-visited offset would loop forever, so it is reported as
/// corruption.
pub fn collect_chain_spans(file: &mut StoreFile, start_offset: u64) -> Result<Vec<Span>> {
    let mut spans = Vec::new();
    let mut visited = HashSet::new();
    let mut offset = start_offset;
    while offset != 0 {
        if !visited.insert(offset) {
            return Err(FlatError::Corrupt(format!(
                "chunk chain loops back to offset {}",
                offset
            )));
        }
        let envelope = read_span(file, offset)?;
        offset = read_continuation(file, &envelope)?;
        spans.push(envelope);
    }
    Ok(spans)
}

/// Read a whole chain's content as one buffer
pub fn read_chain(file: &mut StoreFile, start_offset: u64) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    for envelope in collect_chain_spans(file, start_offset)? {
        data.extend(read_content(file, &envelope)?);
    }
    Ok(data)
}
