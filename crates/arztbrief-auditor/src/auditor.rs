//! Dataset audit logic

use crate::config::{AuditConfig, ExpectedField};
use crate::error::AuditError;
use crate::report::{Anomaly, AnomalyKind, AuditReport, FieldGap};
use arztbrief_domain::{Dataset, Field, FieldValue, PatientRecord};
use arztbrief_extractor::normalize::{parse_number, TnmComponents};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tracing::{debug, info};

static VALID_ECOG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-4]$|^[0-4]-[0-4]$").expect("valid regex"));

const VALID_GENDERS: [&str; 3] = ["male", "female", ""];

const VITALS: [Field; 4] = [Field::Age, Field::Height, Field::Weight, Field::Bmi];

/// The Auditor reports completeness and validity of a dataset
///
/// It never changes the dataset.
#[derive(Debug, Clone)]
pub struct Auditor {
    config: AuditConfig,
    expected: Vec<ExpectedField>,
}

impl Auditor {
    /// Create an auditor, rejecting an invalid configuration
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        config.validate().map_err(AuditError::Config)?;
        let expected = config.parsed_fields().map_err(AuditError::Config)?;
        Ok(Self { config, expected })
    }

    /// Create an auditor with the default configuration
    pub fn default_config() -> Self {
        let config = AuditConfig::default();
        let expected = vec![
            ExpectedField::Record(Field::Name),
            ExpectedField::Record(Field::BirthDate),
            ExpectedField::Record(Field::Gender),
            ExpectedField::Record(Field::TumorStatus),
            ExpectedField::Record(Field::Ecog),
            ExpectedField::SourceFile,
        ];
        Self { config, expected }
    }

    /// Configuration in use
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audit a dataset
    pub fn audit(&self, dataset: &Dataset) -> AuditReport {
        let mut gaps: Vec<FieldGap> = self
            .expected
            .iter()
            .map(|field| FieldGap::new(field.as_str()))
            .collect();
        let mut missing_components = BTreeMap::new();
        let mut anomalies = Vec::new();

        for record in dataset {
            for (gap, field) in gaps.iter_mut().zip(&self.expected) {
                if self.is_missing(record, *field) {
                    gap.missing += 1;
                    gap.sources.insert(record.source_file().to_string());
                }
            }

            // Each check is independent; a record can appear under several.
            if self.config.check_tnm_components {
                if let Some(status) = self.present_text(record, Field::TumorStatus) {
                    for component in TnmComponents::parse(status).missing() {
                        missing_components
                            .entry(component.letter())
                            .or_insert_with(BTreeSet::new)
                            .insert(record.source_file().to_string());
                    }
                }
            }
            if self.config.check_ecog {
                anomalies.extend(self.check_ecog(record));
            }
            if self.config.check_gender {
                anomalies.extend(self.check_gender(record));
            }
            if self.config.check_vitals {
                anomalies.extend(self.check_vitals(record));
            }
        }

        let total_records = dataset.len();
        for gap in &mut gaps {
            gap.percentage = percentage(gap.missing, total_records);
        }

        info!(
            "Audited {} records: {} anomalies, {} incomplete TNM components",
            total_records,
            anomalies.len(),
            missing_components.values().map(|s| s.len()).sum::<usize>()
        );

        AuditReport {
            total_records,
            gaps,
            missing_components,
            anomalies,
        }
    }

    /// Absent, blank or an absent marker; an empty list is present
    fn is_missing(&self, record: &PatientRecord, field: ExpectedField) -> bool {
        match field {
            ExpectedField::SourceFile => self.is_null_text(record.source_file()),
            ExpectedField::Record(field) => match record.get(field) {
                None => true,
                Some(FieldValue::Text(text)) => self.is_null_text(text),
                Some(FieldValue::List(_)) => false,
            },
        }
    }

    fn is_null_text(&self, text: &str) -> bool {
        text.trim().is_empty() || self.config.is_absent_marker(text)
    }

    /// Text value that is neither absent nor null-equivalent
    fn present_text<'r>(&self, record: &'r PatientRecord, field: Field) -> Option<&'r str> {
        record.text(field).filter(|text| !self.is_null_text(text))
    }

    fn check_ecog(&self, record: &PatientRecord) -> Option<Anomaly> {
        let value = self.present_text(record, Field::Ecog)?;
        if VALID_ECOG.is_match(value.trim()) {
            return None;
        }
        debug!("{}: unusual ECOG {:?}", record.source_file(), value);
        Some(anomaly(AnomalyKind::UnusualEcog, record, Field::Ecog, value))
    }

    fn check_gender(&self, record: &PatientRecord) -> Option<Anomaly> {
        let value = record.text(Field::Gender)?;
        if self.config.is_absent_marker(value)
            || VALID_GENDERS.contains(&value.trim().to_lowercase().as_str())
        {
            return None;
        }
        Some(anomaly(AnomalyKind::UnusualGender, record, Field::Gender, value))
    }

    fn check_vitals(&self, record: &PatientRecord) -> Vec<Anomaly> {
        VITALS
            .iter()
            .filter_map(|field| {
                let value = self.present_text(record, *field)?;
                match parse_number(value) {
                    Some(_) => None,
                    None => Some(anomaly(AnomalyKind::NonNumericVital, record, *field, value)),
                }
            })
            .collect()
    }
}

fn anomaly(kind: AnomalyKind, record: &PatientRecord, field: Field, value: &str) -> Anomaly {
    Anomaly {
        kind,
        source: record.source_file().to_string(),
        field: field.as_str().to_string(),
        value: value.to_string(),
    }
}

fn percentage(missing: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        missing as f64 / total as f64 * 100.0
    }
}
