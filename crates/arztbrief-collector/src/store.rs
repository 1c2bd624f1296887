//! Dataset persistence
//!
//! The dataset is one pretty-printed UTF-8 JSON array with one object per
//! record; absent fields are simply missing keys.

use crate::error::CollectorError;
use arztbrief_domain::Dataset;
use std::fs;
use std::path::Path;
use tracing::info;

/// Write a dataset, creating parent directories as needed
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), CollectorError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CollectorError::Store(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }

    let json = serde_json::to_string_pretty(dataset)?;
    fs::write(path, json)
        .map_err(|e| CollectorError::Store(format!("Cannot write {}: {}", path.display(), e)))?;

    info!("Wrote {} records to {}", dataset.len(), path.display());
    Ok(())
}

/// Read a dataset written by [`write_dataset`] or by another tool
///
/// `null` values read as absent fields and unknown keys are dropped.
pub fn read_dataset(path: &Path) -> Result<Dataset, CollectorError> {
    let json = fs::read_to_string(path)
        .map_err(|e| CollectorError::Store(format!("Cannot read {}: {}", path.display(), e)))?;
    let dataset: Dataset = serde_json::from_str(&json)?;
    info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arztbrief_domain::{Field, RecordBuilder};
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("processed_patients.json");

        let mut dataset = Dataset::new();
        dataset.push(
            RecordBuilder::new()
                .with(Field::Name, "Anna Müller")
                .with(Field::Allergies, vec!["Pollen".to_string()])
                .build("a.txt"),
        );
        dataset.push(RecordBuilder::new().build("b.txt"));

        write_dataset(&path, &dataset).unwrap();
        let loaded = read_dataset(&path).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");

        let dataset: Dataset = vec![RecordBuilder::new()
            .with(Field::Ecog, "1")
            .build("a.txt")]
        .into();
        write_dataset(&path, &dataset).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"ecog\": \"1\""));
        assert!(json.contains("\"source_file\": \"a.txt\""));
        assert!(!json.contains("name"));
    }

    #[test]
    fn test_read_tolerates_nulls_and_foreign_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"[{"name": "A B", "ecog": null, "tumor_status_clean": "cT2", "source_file": "a.txt"}]"#,
        )
        .unwrap();

        let dataset = read_dataset(&path).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.text(Field::Name), Some("A B"));
        assert!(!record.contains(Field::Ecog));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_dataset(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(CollectorError::Store(_))));
    }

    #[test]
    fn test_read_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_dataset(&path), Err(CollectorError::Json(_))));
    }
}
