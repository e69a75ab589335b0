//! Error types for StashDB
//!
//! Provides a unified error type for all store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for StashDB operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Corruption Errors (store is unusable until fixed out-of-band)
    // -------------------------------------------------------------------------
    #[error("Index file {path:?} is corrupt: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },

    #[error("Record file {path:?} is corrupt: {reason}")]
    CorruptRecord { path: PathBuf, reason: String },

    #[error(
        "Record file {path:?} holds identity {record_identity}, but its name says {file_identity}"
    )]
    IdentityMismatch {
        path: PathBuf,
        file_identity: u64,
        record_identity: u64,
    },

    // -------------------------------------------------------------------------
    // Operation Precondition Errors
    // -------------------------------------------------------------------------
    #[error("No data found with identity {0}")]
    NotFound(u64),

    #[error("Record file {0:?} must not already exist before persisting")]
    AlreadyExists(PathBuf),

    #[error("Record file {0:?} must already exist")]
    MissingFile(PathBuf),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Serialized form of record {0} is blank")]
    BlankRecord(u64),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Store has been stopped")]
    Stopped,

    #[error("Action queue {0} is closed")]
    QueueClosed(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
