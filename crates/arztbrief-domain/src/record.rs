//! Patient records - the structured output of one extraction

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Every field the extraction engine can emit
///
/// Declaration order is the key order of the persisted JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Patient name, "FirstName LastName"
    #[serde(rename = "name")]
    Name,
    /// Birth date as DD.MM.YYYY
    #[serde(rename = "birth_date")]
    BirthDate,
    /// "female", "male" or "unknown"
    #[serde(rename = "gender")]
    Gender,
    /// Cleaned composite TNM stage
    #[serde(rename = "tumor_status")]
    TumorStatus,
    /// Upper-cased T component of the TNM stage
    #[serde(rename = "T_component")]
    TComponent,
    /// Upper-cased N component of the TNM stage
    #[serde(rename = "N_component")]
    NComponent,
    /// Upper-cased M component of the TNM stage
    #[serde(rename = "M_component")]
    MComponent,
    /// ECOG performance status, single digit or "d1-d2"
    #[serde(rename = "ecog")]
    Ecog,
    /// Age in years
    #[serde(rename = "age")]
    Age,
    /// Height in cm
    #[serde(rename = "height")]
    Height,
    /// Weight in kg
    #[serde(rename = "weight")]
    Weight,
    /// Body mass index
    #[serde(rename = "bmi")]
    Bmi,
    /// Ordered allergy list
    #[serde(rename = "allergies")]
    Allergies,
    /// Smoking stop date as M/YYYY
    #[serde(rename = "quit_date")]
    QuitDate,
    /// Smoking pack years, e.g. "40py"
    #[serde(rename = "pack_years")]
    PackYears,
    /// PD-L1 scoring text
    #[serde(rename = "pd_l1")]
    PdL1,
    /// Tumor dimension triplet, e.g. "3,1 x 2 x 1.5 cm"
    #[serde(rename = "tumor_size")]
    TumorSize,
    /// Free-text diagnoses block
    #[serde(rename = "diagnoses")]
    Diagnoses,
    /// Free-text medication block
    #[serde(rename = "medications")]
    Medications,
}

impl Field {
    /// All fields in declaration order
    pub const ALL: [Field; 19] = [
        Field::Name,
        Field::BirthDate,
        Field::Gender,
        Field::TumorStatus,
        Field::TComponent,
        Field::NComponent,
        Field::MComponent,
        Field::Ecog,
        Field::Age,
        Field::Height,
        Field::Weight,
        Field::Bmi,
        Field::Allergies,
        Field::QuitDate,
        Field::PackYears,
        Field::PdL1,
        Field::TumorSize,
        Field::Diagnoses,
        Field::Medications,
    ];

    /// Get the persisted field name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::BirthDate => "birth_date",
            Field::Gender => "gender",
            Field::TumorStatus => "tumor_status",
            Field::TComponent => "T_component",
            Field::NComponent => "N_component",
            Field::MComponent => "M_component",
            Field::Ecog => "ecog",
            Field::Age => "age",
            Field::Height => "height",
            Field::Weight => "weight",
            Field::Bmi => "bmi",
            Field::Allergies => "allergies",
            Field::QuitDate => "quit_date",
            Field::PackYears => "pack_years",
            Field::PdL1 => "pd_l1",
            Field::TumorSize => "tumor_size",
            Field::Diagnoses => "diagnoses",
            Field::Medications => "medications",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .find(|field| field.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// The value of one field
///
/// Values are always text; only `allergies` is a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single string value (dates, counts and blocks included)
    Text(String),
    /// Ordered list of strings
    List(Vec<String>),
}

impl FieldValue {
    /// Get the value as text, if it is a single string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    /// Get the value as a list, if it is one
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }

    /// Whether the value is an empty or whitespace-only string
    ///
    /// An empty list is not blank: "no allergies listed" differs from
    /// "no allergy line found".
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::List(items) => write!(f, "[{}]", items.join("; ")),
        }
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Structured fields extracted from one source document
///
/// Every record carries exactly one `source_file`; every other field is
/// independently optional and holds at most one value. A record with no
/// fields at all is still a valid record.
///
/// Reading is lenient so that datasets written by other tools can be
/// audited: a `null` value reads as an absent field, keys that name no
/// [`Field`] are dropped, and a missing `source_file` reads as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct PatientRecord {
    #[serde(flatten)]
    fields: BTreeMap<Field, FieldValue>,

    source_file: String,
}

/// On-disk shape of a record before unknown keys and nulls are dropped
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(flatten)]
    fields: BTreeMap<String, Option<FieldValue>>,

    #[serde(default)]
    source_file: Option<String>,
}

impl From<StoredRecord> for PatientRecord {
    fn from(stored: StoredRecord) -> Self {
        let fields = stored
            .fields
            .into_iter()
            .filter_map(|(key, value)| Some((key.parse::<Field>().ok()?, value?)))
            .collect();

        Self {
            fields,
            source_file: stored.source_file.unwrap_or_default(),
        }
    }
}

impl PatientRecord {
    /// Identifier of the document this record was extracted from
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Get a field value
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    /// Get a field value as text
    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Whether the field was extracted
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    /// Iterate over the extracted fields in key order
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.fields.iter().map(|(field, value)| (*field, value))
    }

    /// Number of extracted fields (excluding `source_file`)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was extracted
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Accumulates field values before a record is sealed
///
/// Later writes to the same field replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    fields: BTreeMap<Field, FieldValue>,
}

impl RecordBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value
    pub fn set(&mut self, field: Field, value: impl Into<FieldValue>) -> &mut Self {
        self.fields.insert(field, value.into());
        self
    }

    /// Builder-style variant of [`RecordBuilder::set`]
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Whether the field has already been set
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    /// Seal the record, attaching its provenance
    pub fn build(self, source_file: impl Into<String>) -> PatientRecord {
        PatientRecord {
            fields: self.fields,
            source_file: source_file.into(),
        }
    }
}

/// Ordered sequence of records, one per successfully read document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<PatientRecord>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn push(&mut self, record: PatientRecord) {
        self.records.push(record);
    }

    /// Remove the record at `index`, returning it
    pub fn remove(&mut self, index: usize) -> PatientRecord {
        self.records.remove(index)
    }

    /// Records in enumeration order
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    /// Iterate over records
    pub fn iter(&self) -> std::slice::Iter<'_, PatientRecord> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the dataset, returning its records
    pub fn into_records(self) -> Vec<PatientRecord> {
        self.records
    }
}

impl From<Vec<PatientRecord>> for Dataset {
    fn from(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<PatientRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = PatientRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a PatientRecord;
    type IntoIter = std::slice::Iter<'a, PatientRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
