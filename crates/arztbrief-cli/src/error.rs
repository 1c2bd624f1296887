//! Error types for the CLI application.

use arztbrief_auditor::AuditError;
use arztbrief_collector::CollectorError;
use arztbrief_extractor::ExtractorError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction engine error (bad pattern, recognizer unavailable)
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Batch or dataset persistence error
    #[error(transparent)]
    Collector(#[from] CollectorError),

    /// Auditor error
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
