//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction core and its
//! collaborators. Implementations live in other crates.

use crate::{Entity, SourceDocument};

/// Trait for the document store that supplies raw letter text
///
/// Implemented by the collector layer (arztbrief-collector)
pub trait DocumentSource {
    /// Error type for store operations
    type Error;

    /// List document identifiers in enumeration order
    fn list_documents(&self) -> Result<Vec<String>, Self::Error>;

    /// Read one document's text
    fn read_document(&self, id: &str) -> Result<SourceDocument, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (arztbrief-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;

    /// Confirm the backing model can serve requests
    fn health_check(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Trait for general-purpose named-entity recognition
///
/// Implemented by the application layer (arztbrief-extractor)
pub trait EntityRecognizer {
    /// Error type for recognition
    type Error;

    /// Tag entities in a text span, in order of appearance
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, Self::Error>;

    /// Confirm the recognizer's resources are loaded; called once at start-up
    fn ensure_ready(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}
