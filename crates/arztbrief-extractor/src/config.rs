//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Which grammar extracts `tumor_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TumorGrammar {
    /// `Tumorstadium:`/`Stadium:` label first, composite TNM as fallback
    Labelled,
    /// Composite TNM pattern only
    Unlabelled,
}

impl Default for TumorGrammar {
    fn default() -> Self {
        TumorGrammar::Labelled
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Grammar variant used for `tumor_status`
    pub tumor_grammar: TumorGrammar,

    /// Phrases that open the sentence naming the patient
    pub intro_phrases: Vec<String>,

    /// Phrases that close the letter and end the medication block
    pub closing_phrases: Vec<String>,

    /// Remove residual-tumor markers (`R0`, `R1`, ...) from the TNM composite
    pub strip_residual_markers: bool,

    /// Consult the entity recognizer when no name pattern matches
    pub entity_fallback: bool,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.intro_phrases.is_empty() {
            return Err("intro_phrases must contain at least one phrase".to_string());
        }
        if self.closing_phrases.is_empty() {
            return Err("closing_phrases must contain at least one phrase".to_string());
        }
        if let Some(blank) = self
            .intro_phrases
            .iter()
            .chain(&self.closing_phrases)
            .find(|phrase| phrase.trim().is_empty())
        {
            return Err(format!("phrases cannot be blank (got {:?})", blank));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration for oncology discharge letters
    fn default() -> Self {
        Self {
            tumor_grammar: TumorGrammar::Labelled,
            intro_phrases: vec!["Wir berichten über".to_string()],
            closing_phrases: vec![
                "Mit freundlichen".to_string(),
                "Mit kollegialen".to_string(),
            ],
            strip_residual_markers: true,
            entity_fallback: true,
        }
    }
}

impl ExtractorConfig {
    /// Patterns-only preset: unlabelled TNM grammar, no entity recognizer
    pub fn patterns_only() -> Self {
        Self {
            tumor_grammar: TumorGrammar::Unlabelled,
            entity_fallback: false,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
