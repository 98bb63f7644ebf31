//! On-Disk Format
//!
//! Fixed-width field codec and span arithmetic shared by every layer.
//!
//! ## File Format (version 1)
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Header (20 bytes)                                        │
//! │   Zero-padded decimal offset of the index chain          │
//! ├──────────────────────────────────────────────────────────┤
//! │ Chunks and free gaps, in arbitrary physical order        │
//! │   Chunk = [Length: 20][Content][Continuation: 20]        │
//! │   Length = content length + 40 (whole envelope)          │
//! │   Continuation = offset of next chunk, 0 if terminal     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every numeric field is 20 ASCII decimal digits, zero-padded. The
//! full `u64` range fits in 20 digits, so encoding is infallible;
//! decoding rejects anything that is not pure digits.

use crate::error::{FlatError, Result};

// =============================================================================
// Format Constants
// =============================================================================

/// Format version (20-digit decimal fields; a 16-hex-digit variant is
/// deliberately unsupported)
pub const FORMAT_VERSION: u32 = 1;

/// Width of every numeric field, in bytes
pub const FIELD_LEN: u64 = 20;

/// Reserved header region at the start of the file
pub const HEADER_LEN: u64 = FIELD_LEN;

/// Envelope overhead per chunk: length field + continuation field
pub const ENVELOPE_OVERHEAD: u64 = FIELD_LEN * 2;

/// Smallest envelope worth writing into (>= 20 content bytes)
pub const MIN_CHUNK_LEN: u64 = ENVELOPE_OVERHEAD + FIELD_LEN;

// =============================================================================
// Span
// =============================================================================

/// A byte range in the store file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Absolute file offset of the first byte
    pub offset: u64,
    /// Number of bytes covered
    pub length: u64,
}

impl Span {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// Offset one past the last byte
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

/// Derive the content region from a chunk envelope span
pub fn content_span(envelope: &Span) -> Span {
    Span {
        offset: envelope.offset + FIELD_LEN,
        length: envelope.length.saturating_sub(ENVELOPE_OVERHEAD),
    }
}

/// Whether a span is large enough to hold a chunk envelope
pub fn is_usable(span: &Span) -> bool {
    span.length >= MIN_CHUNK_LEN
}

// =============================================================================
// Field Codec
// =============================================================================

/// Encode a value as a zero-padded 20-digit decimal field
pub fn encode_field(value: u64) -> [u8; FIELD_LEN as usize] {
    let mut field = [b'0'; FIELD_LEN as usize];
    let digits = value.to_string();
    field[FIELD_LEN as usize - digits.len()..].copy_from_slice(digits.as_bytes());
    field
}

/// Decode a fixed-width decimal field
///
/// Malformed bytes (wrong width, non-digit characters) mean the file
/// no longer follows the format, so they surface as [`FlatError::Corrupt`]
/// rather than silently decoding to zero.
pub fn decode_field(bytes: &[u8]) -> Result<u64> {
    if bytes.len() != FIELD_LEN as usize {
        return Err(FlatError::Corrupt(format!(
            "field is {} bytes, expected {}",
            bytes.len(),
            FIELD_LEN
        )));
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|_| FlatError::Corrupt("field is not ASCII".to_string()))?;
    text.parse::<u64>()
        .map_err(|_| FlatError::Corrupt(format!("field is not a decimal number: {:?}", text)))
}

/// Decode a field that is allowed to be absent or malformed
///
/// Used only for the file header at load time: an unreadable header
/// means "empty/new store", never an error.
pub fn decode_field_lenient(bytes: &[u8]) -> Option<u64> {
    decode_field(bytes).ok()
}
