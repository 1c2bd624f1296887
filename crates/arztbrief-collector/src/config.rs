//! Configuration for batch collection
//!
//! Where letters are read from and where the dataset is written.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the batch collector
///
/// # Examples
///
/// ```
/// use arztbrief_collector::CollectorConfig;
///
/// let config = CollectorConfig::default();
/// assert_eq!(config.extension, "txt");
/// assert!(!config.skip_empty_records);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Directory holding the text exports of the letters
    /// Default: current directory
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// File extension of the text exports (without the dot)
    /// Default: "txt"
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Where the dataset is written
    /// Default: "processed_patients.json"
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Drop records in which nothing but the gender placeholder was found
    /// Default: false (every readable letter yields a record)
    #[serde(default)]
    pub skip_empty_records: bool,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    "txt".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("processed_patients.json")
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            extension: default_extension(),
            output_path: default_output_path(),
            skip_empty_records: false,
        }
    }
}

impl CollectorConfig {
    /// Create a configuration for an input directory
    pub fn for_dir(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err("extension cannot be empty".to_string());
        }
        if extension.contains(['/', '\\']) {
            return Err(format!("extension '{}' contains a path separator", self.extension));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err("output_path cannot be empty".to_string());
        }
        Ok(())
    }

    /// Extension without a leading dot
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
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
