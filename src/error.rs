//! Error types for FlatKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FlatError
pub type Result<T> = std::result::Result<T, FlatError>;

/// Unified error type for FlatKV operations
#[derive(Debug, Error)]
pub enum FlatError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("corrupt store: {0}")]
    Corrupt(String),

    // -------------------------------------------------------------------------
    // Index Serialization Errors
    // -------------------------------------------------------------------------
    #[error("index serialization error: {0}")]
    IndexFormat(#[from] serde_json::Error),
}
