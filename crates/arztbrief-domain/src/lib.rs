//! Arztbrief Domain Layer
//!
//! This crate contains the data model shared by every other crate in the
//! workspace. It performs no I/O and defines the trait seams behind which the
//! external collaborators (document store, language model, entity recognizer)
//! live.
//!
//! ## Key Concepts
//!
//! - **SourceDocument**: the raw text of one clinical letter plus its identifier
//! - **PatientRecord**: the structured fields extracted from one document
//! - **Field / FieldValue**: the closed set of field names and their string values
//! - **Dataset**: the ordered list of records produced by one batch
//! - **Gender / Honorific**: the gender derivation from German salutations
//!
//! ## Architecture
//!
//! - Pure data and small value helpers only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod entity;
pub mod gender;
pub mod record;
pub mod run;
pub mod traits;

// Re-exports for convenience
pub use document::SourceDocument;
pub use entity::{Entity, EntityLabel};
pub use gender::{Gender, Honorific};
pub use record::{Dataset, Field, FieldValue, PatientRecord, RecordBuilder};
pub use run::RunId;
