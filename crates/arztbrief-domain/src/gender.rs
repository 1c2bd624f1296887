//! Gender derivation from German salutations

use std::fmt;

/// Gender as stored in a patient record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// Addressed as "Frau"
    Female,
    /// Addressed as "Herr" or "Herrn"
    Male,
    /// No salutation available
    Unknown,
}

impl Gender {
    /// Get the stored string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A salutation token preceding a patient name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Honorific {
    /// "Frau"
    Frau,
    /// "Herr" or the accusative/dative "Herrn"
    Herr,
}

impl Honorific {
    /// Parse a salutation token; matching is exact because capitalisation
    /// separates the salutation from the noun ("frau" never appears as one)
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "Frau" => Some(Honorific::Frau),
            "Herr" | "Herrn" => Some(Honorific::Herr),
            _ => None,
        }
    }

    /// Gender implied by the salutation
    pub fn gender(&self) -> Gender {
        match self {
            Honorific::Frau => Gender::Female,
            Honorific::Herr => Gender::Male,
        }
    }
}
