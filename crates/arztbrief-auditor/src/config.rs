//! Auditor configuration

use arztbrief_domain::Field;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the provenance column in the persisted dataset
pub const SOURCE_FILE: &str = "source_file";

/// A column the auditor expects in every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpectedField {
    /// The document identifier every record carries
    SourceFile,
    /// An extracted field
    Record(Field),
}

impl ExpectedField {
    /// Persisted column name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedField::SourceFile => SOURCE_FILE,
            ExpectedField::Record(field) => field.as_str(),
        }
    }
}

impl fmt::Display for ExpectedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpectedField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == SOURCE_FILE {
            return Ok(ExpectedField::SourceFile);
        }
        s.parse::<Field>().map(ExpectedField::Record)
    }
}

/// Configuration for the audit rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Columns counted as missing when absent, blank or an absent marker
    pub expected_fields: Vec<String>,

    /// Report TNM composites missing a T, N or M component
    pub check_tnm_components: bool,

    /// Report ECOG values outside `0`-`4` / `d-d`
    pub check_ecog: bool,

    /// Report gender values other than `male`, `female` or empty
    pub check_gender: bool,

    /// Report age/height/weight/BMI values that are not numbers
    pub check_vitals: bool,

    /// Literal values treated as null (compared case-insensitively)
    pub absent_markers: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            expected_fields: ["name", "birth_date", "gender", "tumor_status", "ecog", SOURCE_FILE]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            check_tnm_components: true,
            check_ecog: true,
            check_gender: true,
            check_vitals: true,
            absent_markers: vec!["nan".to_string()],
        }
    }
}

impl AuditConfig {
    /// Only missing-field statistics, no structural checks
    pub fn completeness_only() -> Self {
        Self {
            check_tnm_components: false,
            check_ecog: false,
            check_gender: false,
            check_vitals: false,
            ..Self::default()
        }
    }

    /// Expect every field the engine can emit
    pub fn strict() -> Self {
        Self {
            expected_fields: Field::ALL
                .iter()
                .map(|field| field.as_str().to_string())
                .chain(std::iter::once(SOURCE_FILE.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// Parse the expected field names
    pub fn parsed_fields(&self) -> Result<Vec<ExpectedField>, String> {
        self.expected_fields
            .iter()
            .map(|name| name.parse::<ExpectedField>())
            .collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.expected_fields.is_empty() {
            return Err("expected_fields must name at least one field".to_string());
        }
        let fields = self.parsed_fields()?;
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].contains(field) {
                return Err(format!("{} is listed twice in expected_fields", field));
            }
        }
        Ok(())
    }

    /// Whether a text value counts as null
    pub fn is_absent_marker(&self, value: &str) -> bool {
        let value = value.trim();
        self.absent_markers
            .iter()
            .any(|marker| marker.eq_ignore_ascii_case(value))
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuditConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.check_ecog);
        assert_eq!(
            config.parsed_fields().unwrap(),
            vec![
                ExpectedField::Record(Field::Name),
                ExpectedField::Record(Field::BirthDate),
                ExpectedField::Record(Field::Gender),
                ExpectedField::Record(Field::TumorStatus),
                ExpectedField::Record(Field::Ecog),
                ExpectedField::SourceFile,
            ]
        );
    }

    #[test]
    fn test_completeness_only_config() {
        let config = AuditConfig::completeness_only();
        assert!(!config.check_tnm_components);
        assert!(!config.check_vitals);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = AuditConfig::strict();
        assert!(config.validate().is_ok());
        assert_eq!(config.expected_fields.len(), Field::ALL.len() + 1);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let config = AuditConfig {
            expected_fields: vec!["name".to_string(), "blood_type".to_string()],
            ..AuditConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("blood_type"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let config = AuditConfig {
            expected_fields: vec!["ecog".to_string(), "ecog".to_string()],
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_absent_marker() {
        let config = AuditConfig::default();
        assert!(config.is_absent_marker("nan"));
        assert!(config.is_absent_marker(" NaN "));
        assert!(!config.is_absent_marker("0"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AuditConfig::completeness_only();
        let parsed = AuditConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AuditConfig::from_toml("check_gender = false").unwrap();
        assert!(!config.check_gender);
        assert_eq!(config.absent_markers, vec!["nan"]);
    }
}
