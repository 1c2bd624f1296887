//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::{Config, RecognizerConfig};
use crate::error::Result;
use crate::output::Formatter;
use arztbrief_collector::{write_dataset, Collector, CollectorConfig, DirectorySource};
use arztbrief_domain::traits::EntityRecognizer;
use arztbrief_extractor::{Extractor, LlmEntityRecognizer};
use arztbrief_llm::OllamaProvider;
use std::fmt::Display;
use tracing::info;

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut config = config.clone();
    apply_overrides(&args, &mut config);
    config.validate()?;

    let extractor = Extractor::new(config.extractor.clone())?;
    if config.ner.enabled && config.extractor.entity_fallback {
        let extractor = extractor.with_recognizer(recognizer(&config.ner));
        run_batch(&extractor, &config.collector, formatter)
    } else {
        info!("Entity recognizer disabled; using patterns only");
        run_batch(&extractor, &config.collector, formatter)
    }
}

/// Flags override file values.
fn apply_overrides(args: &ExtractArgs, config: &mut Config) {
    if let Some(input_dir) = &args.input_dir {
        config.collector.input_dir = input_dir.clone();
    }
    if let Some(output) = &args.output {
        config.collector.output_path = output.clone();
    }
    if let Some(extension) = &args.extension {
        config.collector.extension = extension.clone();
    }
    if let Some(grammar) = args.tumor_grammar {
        config.extractor.tumor_grammar = grammar.into();
    }
    if args.no_ner {
        config.ner.enabled = false;
    }
    if args.skip_empty {
        config.collector.skip_empty_records = true;
    }
}

fn recognizer(ner: &RecognizerConfig) -> LlmEntityRecognizer<OllamaProvider> {
    info!("Using entity recognizer {} at {}", ner.model, ner.endpoint);
    let provider = OllamaProvider::new(&ner.endpoint, &ner.model)
        .with_max_retries(ner.max_retries)
        .with_timeout_secs(ner.timeout_secs);
    LlmEntityRecognizer::new(provider)
}

fn run_batch<R>(
    extractor: &Extractor<R>,
    collector: &CollectorConfig,
    formatter: &Formatter,
) -> Result<()>
where
    R: EntityRecognizer,
    R::Error: Display,
{
    // Fatal before the first document is touched
    extractor.check_ready()?;

    let source = DirectorySource::new(&collector.input_dir, collector.normalized_extension());
    let outcome = Collector::new(collector.clone()).collect(&source, extractor)?;
    write_dataset(&collector.output_path, &outcome.dataset)?;

    println!("{}", formatter.format_batch(&outcome, &collector.output_path)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(input: PathBuf, output: PathBuf) -> ExtractArgs {
        ExtractArgs {
            input_dir: Some(input),
            output: Some(output),
            extension: None,
            tumor_grammar: None,
            no_ner: true,
            skip_empty: false,
        }
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config::default();
        let mut args = args(PathBuf::from("in"), PathBuf::from("out.json"));
        args.extension = Some("TXT".to_string());
        args.skip_empty = true;
        apply_overrides(&args, &mut config);

        assert_eq!(config.collector.input_dir, PathBuf::from("in"));
        assert_eq!(config.collector.output_path, PathBuf::from("out.json"));
        assert_eq!(config.collector.extension, "TXT");
        assert!(config.collector.skip_empty_records);
        assert!(!config.ner.enabled);
    }

    #[test]
    fn test_extract_writes_dataset() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Wir berichten über Herrn Hans Meier, geb. am 03.04.1955.").unwrap();
        let output = dir.path().join("out").join("data.json");

        let formatter = Formatter::new(OutputFormat::Text, false);
        execute_extract(
            args(dir.path().to_path_buf(), output.clone()),
            &Config::default(),
            &formatter,
        )
        .unwrap();

        let dataset = arztbrief_collector::read_dataset(&output).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(
            dataset.records()[0].text(arztbrief_domain::Field::Name),
            Some("Hans Meier")
        );
    }

    #[test]
    fn test_missing_input_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let formatter = Formatter::new(OutputFormat::Text, false);
        let result = execute_extract(
            args(dir.path().join("missing"), dir.path().join("out.json")),
            &Config::default(),
            &formatter,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unreachable_recognizer_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "ECOG: 1").unwrap();
        let output = dir.path().join("out.json");

        let mut config = Config::default();
        config.ner.endpoint = "http://127.0.0.1:9".to_string();
        config.ner.max_retries = 1;
        config.ner.timeout_secs = 1;
        let mut args = args(dir.path().to_path_buf(), output.clone());
        args.no_ner = false;

        let formatter = Formatter::new(OutputFormat::Text, false);
        let result = execute_extract(args, &config, &formatter);
        assert!(matches!(
            result,
            Err(crate::CliError::Extractor(ref e)) if e.is_fatal()
        ));
        assert!(!output.exists());
    }
}
