//! Validate command - check an exported table for data-quality problems.

use std::path::PathBuf;

use clap::Args;
use console::style;

use tds_core::RecordValidator;

use super::load_config;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Exported CSV file
    #[arg(required = true)]
    input: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let report = RecordValidator::new().validate_file(&args.input, &config.export.columns)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_valid() {
        println!(
            "{} {} ({} rows)",
            style("✓").green(),
            report,
            report.rows_checked
        );
    } else {
        println!("{}", style("Validation errors found:").red());
        println!("{}", report);
    }

    if !report.is_valid() {
        anyhow::bail!(
            "{} of {} rows flagged",
            report.flagged.len(),
            report.rows_checked
        );
    }

    Ok(())
}
