//! Property tests for the extraction engine

use arztbrief_domain::{Field, FieldValue, SourceDocument};
use arztbrief_extractor::{Extractor, MatchStage};
use proptest::prelude::*;

fn extractor() -> Extractor {
    Extractor::with_defaults().unwrap()
}

proptest! {
    /// Property: extracting the same text twice yields identical records
    #[test]
    fn test_extraction_is_idempotent(text in "\\PC{1,400}") {
        prop_assume!(!text.trim().is_empty());
        let extractor = extractor();
        let document = SourceDocument::new("a.txt", text);

        let first = extractor.extract(&document).unwrap();
        let second = extractor.extract(&document).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    /// Property: every record carries its own document identifier
    #[test]
    fn test_source_file_is_document_id(id in "[a-z0-9_]{1,20}\\.txt", text in "\\PC{1,200}") {
        prop_assume!(!text.trim().is_empty());
        let record = extractor()
            .extract(&SourceDocument::new(id.clone(), text))
            .unwrap();
        prop_assert_eq!(record.source_file(), id.as_str());
    }

    /// Property: a well-formed composite survives verbatim and decomposes
    /// into upper-cased components
    #[test]
    fn test_tnm_round_trip(
        prefix in "[abd-oqs-z ]{0,40}",
        suffix in "[abd-oqs-z ]{0,40}",
        t_prefix in "[cpr]",
        t_value in prop::sample::select(vec!["is", "1", "2b", "3", "4a"]),
        n_prefix in "[cpr]",
        n_value in prop::sample::select(vec!["0", "1a", "2", "3c", "x"]),
        m_prefix in "[cpr]",
        m_value in prop::sample::select(vec!["0", "1", "x"]),
    ) {
        let status = format!(
            "{}T{} {}N{} {}M{}",
            t_prefix, t_value, n_prefix, n_value, m_prefix, m_value
        );
        let text = format!("{} {} {}", prefix, status, suffix);
        let record = extractor().extract(&SourceDocument::new("a.txt", text)).unwrap();

        let expected_t = format!("{}T{}", t_prefix, t_value).to_uppercase();
        let expected_n = format!("{}N{}", n_prefix, n_value).to_uppercase();
        let expected_m = format!("{}M{}", m_prefix, m_value).to_uppercase();
        prop_assert_eq!(record.text(Field::TumorStatus), Some(status.as_str()));
        prop_assert_eq!(record.text(Field::TComponent), Some(expected_t.as_str()));
        prop_assert_eq!(record.text(Field::NComponent), Some(expected_n.as_str()));
        prop_assert_eq!(record.text(Field::MComponent), Some(expected_m.as_str()));
    }

    /// Property: labelled ECOG is stored as the single digit
    #[test]
    fn test_labelled_ecog(digit in 0u8..=5) {
        let text = format!("Befund: ECOG: {}", digit);
        let record = extractor().extract(&SourceDocument::new("a.txt", text)).unwrap();
        let expected = digit.to_string();
        prop_assert_eq!(record.text(Field::Ecog), Some(expected.as_str()));
    }

    /// Property: free-form ECOG ranges are stored as written, even reversed
    #[test]
    fn test_free_form_ecog_range(first in 0u8..=9, second in 0u8..=9) {
        let text = format!("AZ (ECOG {}-{})", first, second);
        let record = extractor().extract(&SourceDocument::new("a.txt", text)).unwrap();
        let expected = format!("{}-{}", first, second);
        prop_assert_eq!(record.text(Field::Ecog), Some(expected.as_str()));
    }

    /// Property: the primary pattern wins whenever it matches
    #[test]
    fn test_primary_before_fallback(labelled in 0u8..=5, free_form in 0u8..=5) {
        let text = format!("(ECOG {}) bei Aufnahme, bei Entlassung ECOG: {}", free_form, labelled);
        let outcome = extractor()
            .extract_traced(&SourceDocument::new("a.txt", text))
            .unwrap();
        let expected = labelled.to_string();
        prop_assert_eq!(outcome.record.text(Field::Ecog), Some(expected.as_str()));
        prop_assert_eq!(outcome.trace.stage_of("ecog"), Some(MatchStage::Primary));
    }

    /// Property: allergy items are trimmed and keep their order
    #[test]
    fn test_allergy_splitting(
        items in prop::collection::vec("[A-Za-zäöüß]{1,12}", 1..6),
        padding in "[ \t]{0,3}",
    ) {
        let separator = format!("{};{}", padding, padding);
        let text = format!("Allergie: {}\nECOG: 1", items.join(&separator));
        let record = extractor().extract(&SourceDocument::new("a.txt", text)).unwrap();
        prop_assert_eq!(record.get(Field::Allergies), Some(&FieldValue::List(items)));
    }
}

#[test]
fn test_allergy_example() {
    let record = extractor()
        .extract(&SourceDocument::new(
            "a.txt",
            "Allergie: Penicillin; Pollen ; Nüsse",
        ))
        .unwrap();
    assert_eq!(
        record.get(Field::Allergies),
        Some(&FieldValue::List(vec![
            "Penicillin".to_string(),
            "Pollen".to_string(),
            "Nüsse".to_string()
        ]))
    );
}

#[test]
fn test_tnm_example() {
    let record = extractor()
        .extract(&SourceDocument::new("a.txt", "Befund: cT2b cN1a cM0"))
        .unwrap();
    assert_eq!(record.text(Field::TumorStatus), Some("cT2b cN1a cM0"));
    assert_eq!(record.text(Field::TComponent), Some("CT2B"));
    assert_eq!(record.text(Field::NComponent), Some("CN1A"));
    assert_eq!(record.text(Field::MComponent), Some("CM0"));
}
