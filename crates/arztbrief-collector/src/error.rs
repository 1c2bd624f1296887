//! Error types for batch collection

use thiserror::Error;

/// Errors that can occur while collecting a dataset
#[derive(Error, Debug)]
pub enum CollectorError {
    /// The document store cannot enumerate its documents
    #[error("Cannot enumerate documents: {0}")]
    Enumerate(String),

    /// One document cannot be read or decoded
    #[error("Cannot read document '{id}': {reason}")]
    DocumentRead {
        /// Identifier of the offending document
        id: String,
        /// What went wrong
        reason: String,
    },

    /// The dataset artifact cannot be written or read
    #[error("Dataset store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
