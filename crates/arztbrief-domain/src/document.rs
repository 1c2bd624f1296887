//! Source documents handed over by the document pipeline

/// The raw text of one clinical letter together with its identifier
///
/// Immutable once read. The identifier is usually the file name of the text
/// export and ends up as the `source_file` of the extracted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    id: String,
    text: String,
}

impl SourceDocument {
    /// Create a new document
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Source identifier (file name or equivalent)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the document carries no usable text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
