//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// A field that no grammar matches is not an error; it is simply absent from
/// the record.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Document has no usable text
    #[error("Document '{0}' is empty")]
    EmptyDocument(String),

    /// Configuration error (invalid settings or an uncompilable pattern)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entity recognizer resources cannot be loaded
    #[error("Entity recognizer unavailable: {0}")]
    RecognizerUnavailable(String),

    /// Entity recognition failed for one request
    #[error("Entity recognition failed: {0}")]
    Recognition(String),

    /// Invalid entity format in LLM response
    #[error("Invalid entity format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl ExtractorError {
    /// Whether the error must abort a batch before any document is processed
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExtractorError::Config(_) | ExtractorError::RecognizerUnavailable(_)
        )
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

impl From<regex::Error> for ExtractorError {
    fn from(e: regex::Error) -> Self {
        ExtractorError::Config(format!("Invalid pattern: {}", e))
    }
}
