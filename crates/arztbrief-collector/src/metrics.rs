//! Metrics collected during a batch

use arztbrief_domain::{Field, PatientRecord};
use std::collections::BTreeMap;

/// Counters for one batch run
///
/// Tracks documents processed and failed, and how often each field was found.
#[derive(Debug, Clone, Default)]
pub struct BatchMetrics {
    /// Documents that produced a record
    pub processed: usize,

    /// Documents that could not be read or were empty
    pub failed: usize,

    /// Records dropped because nothing was extracted
    pub skipped_empty: usize,

    /// Records in which each field was present
    pub field_hits: BTreeMap<Field, usize>,

    /// Grammar matches that needed a fallback pattern
    pub fallback_hits: usize,

    /// Wall-clock duration of the batch in milliseconds
    pub elapsed_ms: u64,
}

impl BatchMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an extracted record
    pub fn record_extraction(&mut self, record: &PatientRecord, fallback_hits: usize) {
        self.processed += 1;
        self.fallback_hits += fallback_hits;
        for (field, _) in record.fields() {
            *self.field_hits.entry(field).or_insert(0) += 1;
        }
    }

    /// Record a document failure
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Record a record dropped as empty
    pub fn record_skipped(&mut self) {
        self.skipped_empty += 1;
    }

    /// Documents attempted
    pub fn total_documents(&self) -> usize {
        self.processed + self.failed + self.skipped_empty
    }

    /// Number of records containing a field
    pub fn hits(&self, field: Field) -> usize {
        self.field_hits.get(&field).copied().unwrap_or(0)
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Batch Summary".to_string(),
            "=============".to_string(),
            format!("Documents: {}", self.total_documents()),
            format!("Processed: {}", self.processed),
            format!("Failed: {}", self.failed),
        ];
        if self.skipped_empty > 0 {
            lines.push(format!("Skipped (empty): {}", self.skipped_empty));
        }
        lines.push(format!("Fallback matches: {}", self.fallback_hits));
        lines.push(format!("Elapsed: {}ms", self.elapsed_ms));
        lines.push(String::new());

        if !self.field_hits.is_empty() {
            lines.push("Fields found:".to_string());
            for field in Field::ALL {
                if let Some(count) = self.field_hits.get(&field) {
                    lines.push(format!("  {}: {}/{}", field, count, self.processed));
                }
            }
        }

        lines.join("\n")
    }
}
