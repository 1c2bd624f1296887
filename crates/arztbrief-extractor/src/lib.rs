//! Arztbrief Extractor
//!
//! Turns the free text of German clinical letters into structured patient
//! records.
//!
//! # Overview
//!
//! Every field has its own grammar: a primary pattern, optional fallback
//! patterns, and for the patient name an entity-recognition fallback over a
//! language model. The engine tries each grammar's patterns in order, keeps
//! the first match, normalizes it and stores it. A field nobody matched is
//! simply absent.
//!
//! # Architecture
//!
//! ```text
//! SourceDocument → Extractor → GrammarLibrary → Normalizer → PatientRecord
//!                                   ↓ (name only, last resort)
//!                              EntityRecognizer → LlmProvider
//! ```
//!
//! # Key Features
//!
//! - **Field Grammar Library**: per-field primary and fallback patterns,
//!   compiled once per process
//! - **Name fallback chain**: primary pattern, introductory sentence,
//!   entity recognition, whole-document scan
//! - **Value Normalizer**: TNM cleaning and decomposition, ECOG ranges,
//!   allergy lists
//! - **Traceability**: every match reports whether a fallback was needed
//!
//! # Example Usage
//!
//! ```
//! use arztbrief_extractor::Extractor;
//! use arztbrief_domain::{Field, SourceDocument};
//!
//! let extractor = Extractor::with_defaults().unwrap();
//! let document = SourceDocument::new(
//!     "brief.txt",
//!     "Wir berichten über Frau Müller, Anna, geb. am 01.02.1960.\nECOG: 1",
//! );
//!
//! let record = extractor.extract(&document).unwrap();
//! assert_eq!(record.text(Field::Name), Some("Anna Müller"));
//! assert_eq!(record.text(Field::Gender), Some("female"));
//! assert_eq!(record.text(Field::Ecog), Some("1"));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod grammar;
mod name;
mod ner;
pub mod normalize;
pub mod sentence;
mod types;


pub use config::{ExtractorConfig, TumorGrammar};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use grammar::{BlockGrammar, Grammar, GrammarLibrary, GrammarMatch, MatchStage};
pub use name::{NameCandidate, NameStrategy};
pub use ner::{parse_entities, LlmEntityRecognizer, NullRecognizer, PromptBuilder, ENTITY_SCHEMA};
pub use normalize::{TnmComponent, TnmComponents};
pub use types::{ExtractionOutcome, ExtractionTrace, GrammarHit};
