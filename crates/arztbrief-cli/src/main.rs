//! Arztbrief CLI - Extract patient data from clinical letters and audit it.

use arztbrief_cli::commands;
use arztbrief_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        let formatter = Formatter::new(arztbrief_cli::config::OutputFormat::Text, color);
        eprintln!("{}", formatter.error(&format!("Error: {}", e)));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> arztbrief_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, config.log_level.as_deref());

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter),
        Command::Audit(args) => commands::execute_audit(args, &config, &formatter),
    }
}

/// Log to stderr: `--verbose`, else `RUST_LOG`, else the configured level, else info.
fn init_tracing(verbose: bool, configured: Option<&str>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(configured.unwrap_or("info")))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
