//! Audit command implementation.

use crate::cli::AuditArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use arztbrief_auditor::{AuditConfig, Auditor};
use arztbrief_collector::read_dataset;

/// Execute the audit command.
pub fn execute_audit(args: AuditArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let path = args
        .dataset
        .clone()
        .unwrap_or_else(|| config.collector.output_path.clone());
    let audit_config = audit_config(&args, &config.audit);

    let auditor = Auditor::new(audit_config)?;
    let dataset = read_dataset(&path)?;
    let report = auditor.audit(&dataset);

    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

/// Flags override file values.
fn audit_config(args: &AuditArgs, base: &AuditConfig) -> AuditConfig {
    let mut config = if args.completeness_only {
        AuditConfig {
            expected_fields: base.expected_fields.clone(),
            absent_markers: base.absent_markers.clone(),
            ..AuditConfig::completeness_only()
        }
    } else {
        base.clone()
    };
    if !args.expect.is_empty() {
        config.expected_fields = args.expect.clone();
    }
    config
}
