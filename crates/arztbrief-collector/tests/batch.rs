//! End-to-end batch runs over a directory of letters

use arztbrief_collector::{
    read_dataset, write_dataset, Collector, CollectorConfig, DirectorySource,
};
use arztbrief_domain::{Field, FieldValue};
use arztbrief_extractor::{Extractor, LlmEntityRecognizer, PromptBuilder};
use arztbrief_llm::MockProvider;
use std::fs;
use tempfile::TempDir;

const LETTER_MUELLER: &str = "\
Wir berichten über Frau Müller, Anna, geb. am 01.02.1960, die sich in unserer Behandlung befand.

Diagnosen:
Adenokarzinom der Lunge
Tumorstadium: cT2 cN0 cM0

Verlauf:
ECOG: 1
Allergie: keine";

const LETTER_MEIER: &str = "\
Wir berichten über Herrn Hans Meier, geb. am 03.04.1955.
Aufnahme mit (ECOG 2-3). pT3 pN2 cM1
Alter: 69 Jahre, Größe: 180 cm, Gewicht: 80 kg, BMI: 24,7";

fn letters_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("brief_002.txt"), LETTER_MEIER).unwrap();
    fs::write(dir.path().join("brief_001.txt"), LETTER_MUELLER).unwrap();
    fs::write(dir.path().join("brief_003.txt"), "").unwrap();
    fs::write(dir.path().join("README.md"), "not a letter").unwrap();
    dir
}

#[test]
fn test_directory_batch_to_json_and_back() {
    let dir = letters_dir();
    let output = dir.path().join("out").join("processed_patients.json");

    let config = CollectorConfig {
        output_path: output.clone(),
        ..CollectorConfig::for_dir(dir.path())
    };
    let source = DirectorySource::new(&config.input_dir, config.normalized_extension());
    let extractor = Extractor::with_defaults().unwrap();

    let outcome = Collector::new(config.clone())
        .collect(&source, &extractor)
        .unwrap();

    assert_eq!(outcome.metrics.processed, 2);
    assert_eq!(outcome.metrics.failed, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].id, "brief_003.txt");

    write_dataset(&config.output_path, &outcome.dataset).unwrap();
    let loaded = read_dataset(&output).unwrap();
    assert_eq!(loaded, outcome.dataset);

    let records = loaded.records();
    assert_eq!(records[0].source_file(), "brief_001.txt");
    assert_eq!(records[0].text(Field::Name), Some("Anna Müller"));
    assert_eq!(records[0].text(Field::Gender), Some("female"));
    assert_eq!(records[0].text(Field::TumorStatus), Some("cT2 cN0 cM0"));
    assert_eq!(
        records[0].get(Field::Allergies),
        Some(&FieldValue::List(vec!["keine".to_string()]))
    );

    assert_eq!(records[1].source_file(), "brief_002.txt");
    assert_eq!(records[1].text(Field::Name), Some("Hans Meier"));
    assert_eq!(records[1].text(Field::Ecog), Some("2-3"));
    assert_eq!(records[1].text(Field::MComponent), Some("CM1"));
    assert_eq!(records[1].text(Field::Bmi), Some("24,7"));
}

#[test]
fn test_metrics_count_fields() {
    let dir = letters_dir();
    let source = DirectorySource::new(dir.path(), "txt");
    let extractor = Extractor::with_defaults().unwrap();

    let outcome = Collector::default().collect(&source, &extractor).unwrap();
    assert_eq!(outcome.metrics.hits(Field::Name), 2);
    assert_eq!(outcome.metrics.hits(Field::Gender), 2);
    assert_eq!(outcome.metrics.hits(Field::Height), 1);
}

#[test]
fn test_batch_with_entity_recognizer() {
    let dir = TempDir::new().unwrap();
    let sentence = "Wir berichten über die Patientin Erika Schulz aus Kiel.";
    fs::write(dir.path().join("a.txt"), format!("{}\nECOG: 0", sentence)).unwrap();

    let mut llm = MockProvider::new(r#"{"entities": []}"#);
    llm.add_response(
        PromptBuilder::new(sentence).build(),
        r#"{"entities": [{"text": "Erika Schulz", "label": "PER"}]}"#,
    );
    let extractor = Extractor::with_defaults()
        .unwrap()
        .with_recognizer(LlmEntityRecognizer::new(llm));
    extractor.check_ready().unwrap();

    let source = DirectorySource::new(dir.path(), "txt");
    let outcome = Collector::default().collect(&source, &extractor).unwrap();
    assert_eq!(outcome.dataset.len(), 1);
    assert_eq!(
        outcome.dataset.records()[0].text(Field::Name),
        Some("Erika Schulz")
    );
}
