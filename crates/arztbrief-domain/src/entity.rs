//! Named entities reported by an entity recognizer

/// Normalized entity class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    /// A person name
    Person,
    /// An organization (clinic, practice, insurer)
    Organization,
    /// A place
    Location,
    /// Anything else
    Other,
}

impl EntityLabel {
    /// Get the canonical label string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Organization => "ORGANIZATION",
            EntityLabel::Location => "LOCATION",
            EntityLabel::Other => "OTHER",
        }
    }

    /// Normalize a model-specific label (CoNLL, OntoNotes, BIO-tagged)
    pub fn from_label(label: &str) -> Self {
        let clean = label
            .trim()
            .trim_start_matches("B-")
            .trim_start_matches("I-");
        match clean.to_ascii_uppercase().as_str() {
            "PER" | "PERSON" => EntityLabel::Person,
            "ORG" | "ORGANIZATION" | "ORGANISATION" => EntityLabel::Organization,
            "LOC" | "LOCATION" | "GPE" => EntityLabel::Location,
            _ => EntityLabel::Other,
        }
    }
}

/// One entity mention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Surface text as it appears in the input
    pub text: String,

    /// Normalized class
    pub label: EntityLabel,
}

impl Entity {
    /// Create a new entity
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    /// Whether this entity names a person
    pub fn is_person(&self) -> bool {
        self.label == EntityLabel::Person
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_person_labels() {
        assert_eq!(EntityLabel::from_label("PER"), EntityLabel::Person);
        assert_eq!(EntityLabel::from_label("person"), EntityLabel::Person);
        assert_eq!(EntityLabel::from_label("B-PER"), EntityLabel::Person);
        assert_eq!(EntityLabel::from_label("I-PERSON"), EntityLabel::Person);
    }

    #[test]
    fn test_normalize_other_labels() {
        assert_eq!(EntityLabel::from_label("ORG"), EntityLabel::Organization);
        assert_eq!(EntityLabel::from_label("LOC"), EntityLabel::Location);
        assert_eq!(EntityLabel::from_label("MISC"), EntityLabel::Other);
    }
}
