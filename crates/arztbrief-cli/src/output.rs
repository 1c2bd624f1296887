//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use arztbrief_auditor::AuditReport;
use arztbrief_collector::BatchOutcome;
use arztbrief_domain::Field;
use colored::*;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of an extraction batch.
    pub fn format_batch(&self, outcome: &BatchOutcome, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_batch_json(outcome, output),
            OutputFormat::Table => Ok(self.format_batch_table(outcome, output)),
            OutputFormat::Text => Ok(self.format_batch_text(outcome, output)),
        }
    }

    /// Format an audit report.
    pub fn format_report(&self, report: &AuditReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(report.to_json()?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Text => Ok(report.summary()),
        }
    }

    fn format_batch_json(&self, outcome: &BatchOutcome, output: &Path) -> Result<String> {
        let metrics = &outcome.metrics;
        let field_hits: serde_json::Map<String, serde_json::Value> = metrics
            .field_hits
            .iter()
            .map(|(field, count)| (field.to_string(), serde_json::json!(count)))
            .collect();
        let failures: Vec<serde_json::Value> = outcome
            .failures
            .iter()
            .map(|f| serde_json::json!({ "id": f.id, "reason": f.reason }))
            .collect();

        let json = serde_json::json!({
            "run_id": outcome.run_id.to_string(),
            "output": output.display().to_string(),
            "processed": metrics.processed,
            "failed": metrics.failed,
            "skipped_empty": metrics.skipped_empty,
            "fallback_hits": metrics.fallback_hits,
            "elapsed_ms": metrics.elapsed_ms,
            "field_hits": field_hits,
            "failures": failures,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }

    fn format_batch_text(&self, outcome: &BatchOutcome, output: &Path) -> String {
        let mut lines = vec![outcome.metrics.summary()];
        if !outcome.failures.is_empty() {
            lines.push(String::new());
            lines.push(self.warning("Skipped documents:"));
            for failure in &outcome.failures {
                lines.push(format!("  - {}: {}", failure.id, failure.reason));
            }
        }
        lines.push(String::new());
        lines.push(self.wrote(outcome, output));
        lines.join("\n")
    }

    fn format_batch_table(&self, outcome: &BatchOutcome, output: &Path) -> String {
        let metrics = &outcome.metrics;
        let mut builder = Builder::default();
        builder.push_record(["Field", "Found", "Coverage"]);
        for field in Field::ALL {
            let hits = metrics.hits(field);
            builder.push_record([
                field.to_string(),
                format!("{}/{}", hits, metrics.processed),
                format!("{:.1}%", share(hits, metrics.processed)),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut lines = vec![table.to_string()];
        if metrics.failed > 0 {
            lines.push(self.warning(&format!("{} document(s) skipped", metrics.failed)));
        }
        lines.push(self.wrote(outcome, output));
        lines.join("\n")
    }

    fn format_report_table(&self, report: &AuditReport) -> String {
        let mut gaps = Builder::default();
        gaps.push_record(["Field", "Missing", "Percent", "Sources"]);
        for gap in &report.gaps {
            gaps.push_record([
                gap.field.clone(),
                gap.missing.to_string(),
                format!("{:.1}%", gap.percentage),
                gap.sources.iter().cloned().collect::<Vec<_>>().join(", "),
            ]);
        }
        let mut gaps = gaps.build();
        gaps.with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut lines = vec![
            self.info(&format!("{} records audited", report.total_records)),
            gaps.to_string(),
        ];

        for (letter, sources) in &report.missing_components {
            lines.push(self.warning(&format!(
                "Missing {} component: {}",
                letter,
                sources.iter().cloned().collect::<Vec<_>>().join(", ")
            )));
        }

        if report.anomalies.is_empty() {
            if report.is_clean() {
                lines.push(self.success("No issues found"));
            }
            return lines.join("\n");
        }

        let mut anomalies = Builder::default();
        anomalies.push_record(["Source", "Field", "Value", "Issue"]);
        for anomaly in &report.anomalies {
            anomalies.push_record([
                anomaly.source.clone(),
                anomaly.field.clone(),
                anomaly.value.clone(),
                anomaly.kind.to_string(),
            ]);
        }
        let mut anomalies = anomalies.build();
        anomalies
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        lines.push(anomalies.to_string());

        lines.join("\n")
    }

    fn wrote(&self, outcome: &BatchOutcome, output: &Path) -> String {
        self.success(&format!(
            "Wrote {} record(s) to {}",
            outcome.dataset.len(),
            output.display()
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
