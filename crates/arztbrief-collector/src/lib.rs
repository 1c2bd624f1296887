//! Arztbrief Collector
//!
//! Batch front end of the extraction engine: reads every letter from a
//! document source, extracts one record per letter and persists the dataset.
//!
//! # Overview
//!
//! The collector is responsible for:
//! - **Enumeration**: listing documents in a reproducible order
//! - **Provenance**: every record carries its document identifier
//! - **Failure isolation**: unreadable or empty documents are logged and
//!   skipped, the batch continues
//! - **Metrics**: processed/failed counts and per-field hit counts
//! - **Persistence**: the dataset as one JSON array
//!
//! # Usage
//!
//! ```no_run
//! use arztbrief_collector::{write_dataset, Collector, CollectorConfig, DirectorySource};
//! use arztbrief_extractor::Extractor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CollectorConfig::for_dir("letters");
//! let source = DirectorySource::new(&config.input_dir, config.normalized_extension());
//! let extractor = Extractor::with_defaults()?;
//!
//! let outcome = Collector::new(config.clone()).collect(&source, &extractor)?;
//! write_dataset(&config.output_path, &outcome.dataset)?;
//! println!("{}", outcome.metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [collector]
//! input_dir = "letters"
//! extension = "txt"
//! output_path = "processed_patients.json"
//! skip_empty_records = false
//! ```

#![warn(missing_docs)]

mod collector;
mod config;
mod error;
mod metrics;
mod source;
mod store;

pub use collector::{BatchOutcome, Collector, DocumentFailure};
pub use config::CollectorConfig;
pub use error::CollectorError;
pub use metrics::BatchMetrics;
pub use source::{DirectorySource, MemorySource};
pub use store::{read_dataset, write_dataset};
