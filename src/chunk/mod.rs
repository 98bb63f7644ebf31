//! Chunk-Chain I/O
//!
//! A value (and the index itself) is stored as a chain of chunks.
//! Each chunk is a self-describing envelope:
//!
//! ```text
//! ┌─────────────┬──────────────────────┬─────────────────────┐
//! │ Length (20) │       Content        │  Continuation (20)  │
//! └─────────────┴──────────────────────┴─────────────────────┘
//! ```
//!
//! `Length` covers the whole envelope (content + 40). `Continuation`
//! holds the offset of the next chunk in the chain, or 0 when the
//! chain ends. Concatenating chunk contents in chain order reproduces
//! the original bytes exactly.

mod reader;
mod writer;

pub use reader::{collect_chain_spans, read_chain, read_content, read_continuation, read_span};
pub use writer::{patch_continuation, write_chunked, write_slice};
