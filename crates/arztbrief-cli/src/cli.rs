//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Arztbrief - Extract structured patient data from clinical letters.
#[derive(Debug, Parser)]
#[command(name = "arztbrief")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ARZTBRIEF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Plain text report (default)
    Text,
    /// Tables
    Table,
    /// JSON
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run extraction over every letter in a directory
    Extract(ExtractArgs),

    /// Run the data-quality audit over an existing dataset
    Audit(AuditArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Directory holding the letters
    pub input_dir: Option<PathBuf>,

    /// Dataset file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File extension of the letters
    #[arg(short, long)]
    pub extension: Option<String>,

    /// TNM grammar variant
    #[arg(short, long, value_enum)]
    pub tumor_grammar: Option<TumorGrammarArg>,

    /// Disable the entity-recognizer name fallback
    #[arg(long)]
    pub no_ner: bool,

    /// Drop records in which nothing was found
    #[arg(long)]
    pub skip_empty: bool,
}

/// Arguments for the audit command.
#[derive(Debug, Parser)]
pub struct AuditArgs {
    /// Dataset file to audit
    pub dataset: Option<PathBuf>,

    /// Expected fields (comma-separated), replacing the configured list
    #[arg(long, value_delimiter = ',')]
    pub expect: Vec<String>,

    /// Only report missing fields, skip the structural checks
    #[arg(long)]
    pub completeness_only: bool,
}

/// TNM grammar argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TumorGrammarArg {
    /// `Tumorstadium:` label, composite TNM as fallback
    Labelled,
    /// Composite TNM only
    Unlabelled,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<TumorGrammarArg> for arztbrief_extractor::TumorGrammar {
    fn from(grammar: TumorGrammarArg) -> Self {
        match grammar {
            TumorGrammarArg::Labelled => arztbrief_extractor::TumorGrammar::Labelled,
            TumorGrammarArg::Unlabelled => arztbrief_extractor::TumorGrammar::Unlabelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "arztbrief",
            "extract",
            "letters",
            "-o",
            "out.json",
            "--no-ner",
        ]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.input_dir, Some(PathBuf::from("letters")));
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
                assert!(args.no_ner);
                assert!(!args.skip_empty);
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_audit_command() {
        let cli = Cli::parse_from([
            "arztbrief",
            "audit",
            "data.json",
            "--expect",
            "name,ecog,source_file",
            "--format",
            "json",
        ]);
        assert_eq!(cli.format, Some(CliFormat::Json));
        match cli.command {
            Command::Audit(args) => {
                assert_eq!(args.dataset, Some(PathBuf::from("data.json")));
                assert_eq!(args.expect, vec!["name", "ecog", "source_file"]);
            }
            _ => panic!("Expected Audit command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["arztbrief", "audit", "-v", "--no-color"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["arztbrief"]).is_err());
    }

    #[test]
    fn test_tumor_grammar_conversion() {
        let grammar: arztbrief_extractor::TumorGrammar = TumorGrammarArg::Unlabelled.into();
        assert_eq!(grammar, arztbrief_extractor::TumorGrammar::Unlabelled);
    }
}
