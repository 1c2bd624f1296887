//! Arztbrief Auditor
//!
//! Read-only data-quality checks over an extracted dataset.
//!
//! The Auditor provides:
//! - Missing-field counts, percentages and sources per expected field
//! - TNM composites lacking a T, N or M component
//! - ECOG values outside the accepted grammar
//! - Gender values outside `male`/`female`/empty
//! - Vital signs that cannot be read as numbers
//!
//! # Examples
//!
//! ```
//! use arztbrief_auditor::Auditor;
//! use arztbrief_domain::{Dataset, Field, RecordBuilder};
//!
//! let dataset: Dataset = vec![
//!     RecordBuilder::new().with(Field::Ecog, "7").build("a.txt"),
//! ]
//! .into();
//!
//! let report = Auditor::default_config().audit(&dataset);
//! assert_eq!(report.gap("name").unwrap().missing, 1);
//! assert_eq!(report.anomalies.len(), 1);
//! println!("{}", report.summary());
//! ```

#![warn(missing_docs)]

mod auditor;
mod config;
mod error;
mod report;

pub use auditor::Auditor;
pub use config::{AuditConfig, ExpectedField, SOURCE_FILE};
pub use error::AuditError;
pub use report::{Anomaly, AnomalyKind, AuditReport, FieldGap};
