//! Audit report types

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Missing-value statistics for one expected field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGap {
    /// Persisted column name
    pub field: String,

    /// Records in which the field is missing
    pub missing: usize,

    /// `missing` as a percentage of all records (0.0 for an empty dataset)
    pub percentage: f64,

    /// Distinct sources missing the field, sorted
    pub sources: BTreeSet<String>,
}

impl FieldGap {
    pub(crate) fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            missing: 0,
            percentage: 0.0,
            sources: BTreeSet::new(),
        }
    }
}

/// Kind of structural problem in a present value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// ECOG not a single digit 0-4 or a `d-d` range of such digits
    UnusualEcog,
    /// Gender not `male`, `female` or empty
    UnusualGender,
    /// Vital sign that cannot be read as a number
    NonNumericVital,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnomalyKind::UnusualEcog => "Unusual ECOG values",
            AnomalyKind::UnusualGender => "Unusual gender values",
            AnomalyKind::NonNumericVital => "Non-numeric vital signs",
        };
        f.write_str(label)
    }
}

/// A present value that fails its validity grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    /// What is wrong
    pub kind: AnomalyKind,
    /// Offending record's source
    pub source: String,
    /// Column holding the value
    pub field: String,
    /// The value as stored
    pub value: String,
}

/// Read-only summary of a dataset's completeness and validity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    /// Records audited
    pub total_records: usize,

    /// One entry per expected field, in configured order
    pub gaps: Vec<FieldGap>,

    /// Sources whose TNM composite lacks a component, keyed by `T`, `N`, `M`
    pub missing_components: BTreeMap<char, BTreeSet<String>>,

    /// Structural anomalies in dataset order
    pub anomalies: Vec<Anomaly>,
}

impl AuditReport {
    /// Statistics for one field, if it was expected
    pub fn gap(&self, field: &str) -> Option<&FieldGap> {
        self.gaps.iter().find(|gap| gap.field == field)
    }

    /// Anomalies of one kind
    pub fn anomalies_of(&self, kind: AnomalyKind) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter().filter(move |a| a.kind == kind)
    }

    /// Whether nothing is missing and nothing is malformed
    pub fn is_clean(&self) -> bool {
        self.gaps.iter().all(|gap| gap.missing == 0)
            && self.missing_components.is_empty()
            && self.anomalies.is_empty()
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report for console output
    pub fn summary(&self) -> String {
        let rule = "-".repeat(40);
        let mut lines = vec![
            "=== Missing Data Analysis ===".to_string(),
            String::new(),
            format!("Total number of records: {}", self.total_records),
            String::new(),
            "Missing data counts:".to_string(),
            rule.clone(),
        ];

        for gap in self.gaps.iter().filter(|gap| gap.missing > 0) {
            lines.push(String::new());
            lines.push(format!("{}:", gap.field));
            lines.push(format!(
                "  Missing in {} records ({:.1}%)",
                gap.missing, gap.percentage
            ));
            lines.push("  Missing in files:".to_string());
            lines.extend(gap.sources.iter().map(|s| format!("    - {}", s)));
        }

        lines.push(String::new());
        lines.push("=== Data Quality Analysis ===".to_string());
        lines.push(String::new());
        lines.push("Tumor Status Component Analysis:".to_string());
        lines.push(rule.clone());
        for (letter, sources) in &self.missing_components {
            lines.push(String::new());
            lines.push(format!("Missing {} component in tumor_status:", letter));
            lines.extend(sources.iter().map(|s| format!("  - {}", s)));
        }

        lines.push(String::new());
        lines.push("Potential Data Issues:".to_string());
        lines.push(rule);
        for kind in [
            AnomalyKind::UnusualEcog,
            AnomalyKind::UnusualGender,
            AnomalyKind::NonNumericVital,
        ] {
            let mut found = self.anomalies_of(kind).peekable();
            if found.peek().is_none() {
                continue;
            }
            lines.push(String::new());
            lines.push(format!("{}:", kind));
            for anomaly in found {
                lines.push(format!(
                    "  - {}: {} = {}",
                    anomaly.source, anomaly.field, anomaly.value
                ));
            }
        }

        lines.join("\n")
    }
}
