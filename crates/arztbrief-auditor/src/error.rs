//! Auditor error types

use thiserror::Error;

/// Errors that can occur before an audit runs
///
/// Findings about the dataset itself are never errors; they are reported in
/// the `AuditReport`.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report could not be rendered
    #[error("Report error: {0}")]
    Report(String),
}

impl From<serde_json::Error> for AuditError {
    fn from(e: serde_json::Error) -> Self {
        AuditError::Report(e.to_string())
    }
}
