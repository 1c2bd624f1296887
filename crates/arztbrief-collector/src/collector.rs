//! Batch Collector
//!
//! Enumerates every document of a source, extracts one record per document
//! and gathers the records into a dataset. A document that cannot be read or
//! is empty is logged, counted and skipped; only a source that cannot list
//! its documents at all aborts the batch.

use crate::config::CollectorConfig;
use crate::error::CollectorError;
use crate::metrics::BatchMetrics;
use arztbrief_domain::traits::{DocumentSource, EntityRecognizer};
use arztbrief_domain::{Dataset, Field, PatientRecord, RunId};
use arztbrief_extractor::Extractor;
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A document that produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Document identifier
    pub id: String,
    /// Why it was skipped
    pub reason: String,
}

/// Everything one batch produced
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Identifier of the run, as printed in the logs
    pub run_id: RunId,
    /// Records in enumeration order
    pub dataset: Dataset,
    /// Counters for the run
    pub metrics: BatchMetrics,
    /// Documents that were skipped, in enumeration order
    pub failures: Vec<DocumentFailure>,
}

/// Batch collector
///
/// # Examples
///
/// ```
/// use arztbrief_collector::{Collector, CollectorConfig, MemorySource};
/// use arztbrief_extractor::Extractor;
///
/// let source = MemorySource::new()
///     .with_document("a.txt", "ECOG: 1")
///     .with_document("b.txt", "");
/// let extractor = Extractor::with_defaults().unwrap();
///
/// let outcome = Collector::new(CollectorConfig::default())
///     .collect(&source, &extractor)
///     .unwrap();
/// assert_eq!(outcome.dataset.len(), 1);
/// assert_eq!(outcome.metrics.failed, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Collector {
    config: CollectorConfig,
}

impl Collector {
    /// Create a collector with the given configuration
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Run a batch over every document of `source`
    ///
    /// # Errors
    ///
    /// Returns `CollectorError::Enumerate` when the source cannot list its
    /// documents. Per-document failures never surface here; they are
    /// reported in the outcome.
    pub fn collect<S, R>(
        &self,
        source: &S,
        extractor: &Extractor<R>,
    ) -> Result<BatchOutcome, CollectorError>
    where
        S: DocumentSource,
        S::Error: Display,
        R: EntityRecognizer,
        R::Error: Display,
    {
        let run_id = RunId::new();
        let started = Instant::now();

        let ids = source
            .list_documents()
            .map_err(|e| CollectorError::Enumerate(e.to_string()))?;
        info!("Batch {} started: {} documents", run_id, ids.len());

        let mut dataset = Dataset::new();
        let mut metrics = BatchMetrics::new();
        let mut failures = Vec::new();

        for id in &ids {
            let document = match source.read_document(id) {
                Ok(document) => document,
                Err(e) => {
                    warn!("Skipping {}: {}", id, e);
                    metrics.record_failure();
                    failures.push(DocumentFailure {
                        id: id.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match extractor.extract_traced(&document) {
                Ok(outcome) => {
                    if self.config.skip_empty_records && is_empty_record(&outcome.record) {
                        debug!("{}: nothing extracted, record dropped", id);
                        metrics.record_skipped();
                        continue;
                    }
                    metrics.record_extraction(&outcome.record, outcome.trace.fallback_count());
                    dataset.push(outcome.record);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", id, e);
                    metrics.record_failure();
                    failures.push(DocumentFailure {
                        id: id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        metrics.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            "Batch {} finished: {} records, {} failed in {}ms",
            run_id,
            metrics.processed,
            metrics.failed,
            metrics.elapsed_ms
        );

        Ok(BatchOutcome {
            run_id,
            dataset,
            metrics,
            failures,
        })
    }
}

/// Whether the record holds nothing but the gender placeholder
fn is_empty_record(record: &PatientRecord) -> bool {
    record
        .fields()
        .all(|(field, value)| field == Field::Gender && value.as_text() == Some("unknown"))
}
