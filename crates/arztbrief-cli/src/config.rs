//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use arztbrief_auditor::AuditConfig;
use arztbrief_collector::CollectorConfig;
use arztbrief_extractor::ExtractorConfig;
use arztbrief_llm::ollama::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Every section is optional; missing sections and keys take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level used when `RUST_LOG` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Output settings
    pub settings: Settings,

    /// Extraction engine
    pub extractor: ExtractorConfig,

    /// Entity recognizer backing the name fallback
    pub ner: RecognizerConfig,

    /// Batch collection
    pub collector: CollectorConfig,

    /// Data-quality audit
    pub audit: AuditConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// Local language model used for person-entity recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Attach the recognizer; when on, an unreachable model aborts `extract`
    pub enabled: bool,

    /// Ollama API endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Attempts per request
    pub max_retries: u32,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: "llama3".to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RecognizerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("ner.endpoint cannot be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("ner.model cannot be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("ner.timeout_secs must be positive".to_string());
        }
        Ok(())
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".arztbrief").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.arztbrief/config.toml`
    /// is read if present, otherwise defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::path() {
                Ok(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Read configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.extractor
            .validate()
            .and_then(|_| self.ner.validate())
            .and_then(|_| self.collector.validate())
            .and_then(|_| self.audit.validate())
            .map_err(CliError::Config)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}
