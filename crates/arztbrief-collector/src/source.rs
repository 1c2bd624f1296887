//! Document sources
//!
//! The directory source reads the text exports produced by the upstream
//! document pipeline. Documents are listed in sorted order so repeated runs
//! over the same directory produce the same dataset.

use crate::error::CollectorError;
use arztbrief_domain::traits::DocumentSource;
use arztbrief_domain::SourceDocument;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Text files with a given extension in one directory (not recursive)
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    /// Create a source over `root` for files ending in `.extension`
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    /// Directory being read
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

impl DocumentSource for DirectorySource {
    type Error = CollectorError;

    fn list_documents(&self) -> Result<Vec<String>, Self::Error> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            CollectorError::Enumerate(format!("{}: {}", self.root.display(), e))
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| CollectorError::Enumerate(e.to_string()))?
                .path();
            if !path.is_file() || !self.matches_extension(&path) {
                continue;
            }
            match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => ids.push(name.to_string()),
                None => debug!("Skipping non-UTF-8 file name {}", path.display()),
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn read_document(&self, id: &str) -> Result<SourceDocument, Self::Error> {
        let path = self.root.join(id);
        let bytes = std::fs::read(&path).map_err(|e| CollectorError::DocumentRead {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        let text = String::from_utf8(bytes).map_err(|e| CollectorError::DocumentRead {
            id: id.to_string(),
            reason: format!("not valid UTF-8: {}", e),
        })?;
        Ok(SourceDocument::new(id, text))
    }
}

/// In-memory documents, listed in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<SourceDocument>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document
    pub fn with_document(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.push(SourceDocument::new(id, text));
        self
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the source holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<SourceDocument> for MemorySource {
    fn from_iter<I: IntoIterator<Item = SourceDocument>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl DocumentSource for MemorySource {
    type Error = CollectorError;

    fn list_documents(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.documents.iter().map(|d| d.id().to_string()).collect())
    }

    fn read_document(&self, id: &str) -> Result<SourceDocument, Self::Error> {
        self.documents
            .iter()
            .find(|d| d.id() == id)
            .cloned()
            .ok_or_else(|| CollectorError::DocumentRead {
                id: id.to_string(),
                reason: "no such document".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directory_listing_is_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "B").unwrap();
        fs::write(dir.path().join("a.txt"), "A").unwrap();
        fs::write(dir.path().join("c.TXT"), "C").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let source = DirectorySource::new(dir.path(), "txt");
        let ids = source.list_documents().unwrap();
        assert_eq!(ids, vec!["a.txt", "b.txt", "c.TXT"]);
    }

    #[test]
    fn test_read_document() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("brief.txt"), "ECOG: 1").unwrap();

        let source = DirectorySource::new(dir.path(), ".txt");
        let document = source.read_document("brief.txt").unwrap();
        assert_eq!(document.id(), "brief.txt");
        assert_eq!(document.text(), "ECOG: 1");
    }

    #[test]
    fn test_invalid_utf8_is_read_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.txt"), [0xff, 0xfe, 0x00]).unwrap();

        let source = DirectorySource::new(dir.path(), "txt");
        let err = source.read_document("broken.txt").unwrap_err();
        assert!(matches!(err, CollectorError::DocumentRead { ref id, .. } if id == "broken.txt"));
    }

    #[test]
    fn test_missing_directory() {
        let source = DirectorySource::new("/definitely/not/here", "txt");
        assert!(matches!(
            source.list_documents(),
            Err(CollectorError::Enumerate(_))
        ));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new()
            .with_document("2.txt", "zwei")
            .with_document("1.txt", "eins");
        assert_eq!(source.list_documents().unwrap(), vec!["2.txt", "1.txt"]);
        assert_eq!(source.read_document("1.txt").unwrap().text(), "eins");
        assert!(source.read_document("3.txt").is_err());
    }
}
