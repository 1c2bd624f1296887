//! Extraction Engine
//!
//! Runs the grammar library over one document and seals the result into a
//! record. Extraction is pure computation over the document text: no field
//! failure is ever an error, and the only per-document error is a document
//! without text.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::grammar::GrammarLibrary;
use crate::name;
use crate::ner::NullRecognizer;
use crate::normalize::{
    clean_tumor_status, collapse_whitespace, normalize_ecog, normalize_pack_years,
    split_allergies, TnmComponents,
};
use crate::types::{ExtractionOutcome, ExtractionTrace};
use arztbrief_domain::traits::EntityRecognizer;
use arztbrief_domain::{Field, Gender, PatientRecord, RecordBuilder, SourceDocument};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Extracts patient records from clinical letters
///
/// Stateless between documents: the grammar library is immutable and shared,
/// so one extractor can serve any number of documents (or threads, when the
/// recognizer allows it).
pub struct Extractor<R = NullRecognizer> {
    library: Arc<GrammarLibrary>,
    recognizer: Option<R>,
    config: ExtractorConfig,
}

impl Extractor<NullRecognizer> {
    /// Create an extractor without an entity recognizer
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Config` if the configuration is invalid.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        let library = GrammarLibrary::new(&config)?;
        info!(
            "Extractor ready: tumor grammar {:?}, entity fallback {}",
            config.tumor_grammar, config.entity_fallback
        );
        Ok(Self {
            library: Arc::new(library),
            recognizer: None,
            config,
        })
    }

    /// Create an extractor with the default configuration
    pub fn with_defaults() -> Result<Self, ExtractorError> {
        Self::new(ExtractorConfig::default())
    }
}

impl<R> Extractor<R>
where
    R: EntityRecognizer,
    R::Error: Display,
{
    /// Attach an entity recognizer for the name fallback
    pub fn with_recognizer<R2>(self, recognizer: R2) -> Extractor<R2>
    where
        R2: EntityRecognizer,
    {
        Extractor {
            library: self.library,
            recognizer: Some(recognizer),
            config: self.config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Grammar library in use
    pub fn library(&self) -> &GrammarLibrary {
        &self.library
    }

    /// Start-up check: confirm the entity recognizer can serve requests
    ///
    /// Call once before a batch. A recognizer that cannot load its resources
    /// would silently disable the name fallback for every document, so this
    /// is reported as a fatal configuration error.
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::RecognizerUnavailable` when the recognizer's
    /// readiness check fails.
    pub fn check_ready(&self) -> Result<(), ExtractorError> {
        match (self.config.entity_fallback, &self.recognizer) {
            (true, Some(recognizer)) => recognizer
                .ensure_ready()
                .map_err(|e| ExtractorError::RecognizerUnavailable(e.to_string())),
            (true, None) => {
                warn!("Entity fallback enabled but no recognizer attached; using patterns only");
                Ok(())
            }
            (false, _) => Ok(()),
        }
    }

    /// Extract a record from one document
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::EmptyDocument` if the document has no text.
    pub fn extract(&self, document: &SourceDocument) -> Result<PatientRecord, ExtractorError> {
        self.extract_traced(document).map(|outcome| outcome.record)
    }

    /// Extract a record and report which grammars matched
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::EmptyDocument` if the document has no text.
    pub fn extract_traced(
        &self,
        document: &SourceDocument,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        if document.is_blank() {
            return Err(ExtractorError::EmptyDocument(document.id().to_string()));
        }

        let text = document.text();
        let mut fields = RecordBuilder::new();
        let mut trace = ExtractionTrace::default();

        self.extract_identity(text, document.id(), &mut fields, &mut trace);
        self.extract_tumor_status(text, &mut fields, &mut trace);
        self.extract_ecog(text, &mut fields, &mut trace);
        self.extract_vitals(text, &mut fields, &mut trace);
        self.extract_allergies(text, &mut fields, &mut trace);
        self.extract_smoking(text, &mut fields, &mut trace);
        self.extract_findings(text, &mut fields, &mut trace);
        self.extract_blocks(text, &mut fields);

        let record = fields.build(document.id());

        debug!(
            "{}: {} fields extracted, {} via fallback",
            record.source_file(),
            record.len(),
            trace.fallback_count()
        );

        Ok(ExtractionOutcome { record, trace })
    }

    /// Name, birth date and the gender derived from the salutation
    fn extract_identity(
        &self,
        text: &str,
        source_id: &str,
        fields: &mut RecordBuilder,
        trace: &mut ExtractionTrace,
    ) {
        let recognizer = if self.config.entity_fallback {
            self.recognizer.as_ref()
        } else {
            None
        };

        let gender = match name::resolve(&self.library, recognizer, text, source_id) {
            Some(candidate) => {
                fields.set(Field::Name, candidate.name);
                if let Some(birth_date) = candidate.birth_date {
                    fields.set(Field::BirthDate, birth_date);
                }
                trace.name_strategy = Some(candidate.strategy);
                candidate
                    .honorific
                    .map(|honorific| honorific.gender())
                    .unwrap_or(Gender::Unknown)
            }
            None => Gender::Unknown,
        };

        fields.set(Field::Gender, gender.as_str());
    }

    fn extract_tumor_status(
        &self,
        text: &str,
        fields: &mut RecordBuilder,
        trace: &mut ExtractionTrace,
    ) {
        let grammar = &self.library.tumor_status;
        let Some(found) = grammar.first_match(text) else {
            return;
        };
        let Some(raw) = found.group("tumor_status") else {
            return;
        };

        let status = clean_tumor_status(raw, self.config.strip_residual_markers);
        if status.is_empty() {
            return;
        }

        // Components are stored when found; a missing one is left for the
        // auditor to report
        let components = TnmComponents::parse(&status);
        if let Some(t) = components.t {
            fields.set(Field::TComponent, t);
        }
        if let Some(n) = components.n {
            fields.set(Field::NComponent, n);
        }
        if let Some(m) = components.m {
            fields.set(Field::MComponent, m);
        }

        fields.set(Field::TumorStatus, status);
        trace.hit(grammar.field(), found.stage());
    }

    fn extract_ecog(&self, text: &str, fields: &mut RecordBuilder, trace: &mut ExtractionTrace) {
        let grammar = &self.library.ecog;
        if let Some(found) = grammar.first_match(text) {
            if let Some(first) = found.group("ecog") {
                fields.set(Field::Ecog, normalize_ecog(first, found.group("ecog_to")));
                trace.hit(grammar.field(), found.stage());
            }
        }
    }

    /// All four vitals or none
    fn extract_vitals(&self, text: &str, fields: &mut RecordBuilder, trace: &mut ExtractionTrace) {
        let grammar = &self.library.vitals;
        let Some(found) = grammar.first_match(text) else {
            return;
        };

        let vitals = [
            (Field::Age, "age"),
            (Field::Height, "height"),
            (Field::Weight, "weight"),
            (Field::Bmi, "bmi"),
        ];
        for (field, group) in vitals {
            if let Some(value) = found.group(group) {
                fields.set(field, value);
            }
        }
        trace.hit(grammar.field(), found.stage());
    }

    fn extract_allergies(
        &self,
        text: &str,
        fields: &mut RecordBuilder,
        trace: &mut ExtractionTrace,
    ) {
        let grammar = &self.library.allergies;
        if let Some(found) = grammar.first_match(text) {
            let items = split_allergies(found.group("allergies").unwrap_or_default());
            fields.set(Field::Allergies, items);
            trace.hit(grammar.field(), found.stage());
        }
    }

    fn extract_smoking(&self, text: &str, fields: &mut RecordBuilder, trace: &mut ExtractionTrace) {
        let grammar = &self.library.smoking;
        let Some(found) = grammar.first_match(text) else {
            return;
        };
        if let (Some(quit_date), Some(pack_years)) =
            (found.group("quit_date"), found.group("pack_years"))
        {
            fields.set(Field::QuitDate, quit_date);
            fields.set(Field::PackYears, normalize_pack_years(pack_years));
            trace.hit(grammar.field(), found.stage());
        }
    }

    /// Biomarker and tumor size
    fn extract_findings(
        &self,
        text: &str,
        fields: &mut RecordBuilder,
        trace: &mut ExtractionTrace,
    ) {
        let findings = [
            (&self.library.pd_l1, Field::PdL1, "pd_l1"),
            (&self.library.tumor_size, Field::TumorSize, "tumor_size"),
        ];
        for (grammar, field, group) in findings {
            let Some(found) = grammar.first_match(text) else {
                continue;
            };
            let value = found.group(group).map(collapse_whitespace).unwrap_or_default();
            if !value.is_empty() {
                fields.set(field, value);
                trace.hit(grammar.field(), found.stage());
            }
        }
    }

    /// Free-text blocks, kept verbatim apart from outer whitespace
    fn extract_blocks(&self, text: &str, fields: &mut RecordBuilder) {
        if let Some(diagnoses) = self.library.diagnoses.capture(text) {
            fields.set(Field::Diagnoses, diagnoses);
        }
        if let Some(medications) = self.library.medications.capture(text) {
            fields.set(Field::Medications, medications);
        }
    }
}

impl<R> std::fmt::Debug for Extractor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("config", &self.config)
            .field("has_recognizer", &self.recognizer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::MatchStage;
    use arztbrief_domain::FieldValue;

    fn doc(text: &str) -> SourceDocument {
        SourceDocument::new("brief_001.txt", text)
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let extractor = Extractor::with_defaults().unwrap();
        let result = extractor.extract(&doc("   \n"));
        assert!(matches!(result, Err(ExtractorError::EmptyDocument(id)) if id == "brief_001.txt"));
    }

    #[test]
    fn test_record_without_matches_keeps_gender_and_source() {
        let extractor = Extractor::with_defaults().unwrap();
        let record = extractor.extract(&doc("Kein verwertbarer Inhalt")).unwrap();
        assert_eq!(record.source_file(), "brief_001.txt");
        assert_eq!(record.text(Field::Gender), Some("unknown"));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_labelled_stage_with_residual_marker() {
        let extractor = Extractor::with_defaults().unwrap();
        let record = extractor
            .extract(&doc("Tumorstadium: pT2 pN1 (2/15) R0, UICC: IIB"))
            .unwrap();
        assert_eq!(record.text(Field::TumorStatus), Some("pT2 pN1 (2/15)"));
        assert_eq!(record.text(Field::TComponent), Some("PT2"));
        assert_eq!(record.text(Field::NComponent), Some("PN1"));
        assert!(!record.contains(Field::MComponent));
    }

    #[test]
    fn test_residual_markers_kept_when_configured() {
        let config = ExtractorConfig {
            strip_residual_markers: false,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(config).unwrap();
        let record = extractor.extract(&doc("Stadium: pT1 pN0 cM0 R0")).unwrap();
        assert_eq!(record.text(Field::TumorStatus), Some("pT1 pN0 cM0 R0"));
    }

    #[test]
    fn test_vitals_all_or_nothing() {
        let extractor = Extractor::with_defaults().unwrap();
        let record = extractor
            .extract(&doc("Alter: 64\nGröße: 172 cm\nGewicht: 81,5 kg\nBMI: 27,5"))
            .unwrap();
        assert_eq!(record.text(Field::Age), Some("64"));
        assert_eq!(record.text(Field::Weight), Some("81,5"));
        assert_eq!(record.text(Field::Bmi), Some("27,5"));

        let record = extractor.extract(&doc("Alter: 64\nGröße: 172 cm")).unwrap();
        assert!(!record.contains(Field::Age));
        assert!(!record.contains(Field::Height));
    }

    #[test]
    fn test_empty_allergy_line_is_present() {
        let extractor = Extractor::with_defaults().unwrap();
        let record = extractor.extract(&doc("Allergie: \nECOG: 0")).unwrap();
        assert_eq!(
            record.get(Field::Allergies),
            Some(&FieldValue::List(Vec::new()))
        );
    }

    #[test]
    fn test_trace_reports_fallback_stage() {
        let extractor = Extractor::with_defaults().unwrap();
        let outcome = extractor
            .extract_traced(&doc("Befund cT2 cN0 cM0, (ECOG 1)"))
            .unwrap();
        assert_eq!(
            outcome.trace.stage_of("tumor_status"),
            Some(MatchStage::Fallback(0))
        );
        assert_eq!(outcome.trace.stage_of("ecog"), Some(MatchStage::Fallback(0)));
        assert_eq!(outcome.trace.fallback_count(), 2);
    }

    #[test]
    fn test_check_ready_without_recognizer() {
        let extractor = Extractor::with_defaults().unwrap();
        assert!(extractor.check_ready().is_ok());
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = ExtractorConfig {
            intro_phrases: Vec::new(),
            ..ExtractorConfig::default()
        };
        let err = Extractor::new(config).unwrap_err();
        assert!(err.is_fatal());
    }
}
