//! Extract command - walk deal folders and export one row per statement.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use tds_core::table::write_batch_to_path;
use tds_core::{DealAggregator, ExtractionError, ExtractionRecord, RecordValidator, TdsError};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Directory containing deal folders of PDF statements
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: "<quarter>.csv" or the configured file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Quarter label used to name the output file, e.g. "FY 2024-25 Q3"
    #[arg(short, long)]
    quarter: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Validate extracted rows after export
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Four-column CSV table
    Csv,
    /// JSON report with records and errors
    Json,
}

/// JSON output envelope.
#[derive(Serialize)]
struct BatchReport<'a> {
    generated_at: DateTime<Utc>,
    root: &'a Path,
    records: &'a [ExtractionRecord],
    errors: &'a [ExtractionError],
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.input.display());
    }

    let aggregator = DealAggregator::from_config(&config);
    for (field, rules) in aggregator.parser().describe() {
        debug!("{} rules: {}", field, rules.join(" -> "));
    }

    let discovery = aggregator.discover(&args.input)?;
    println!(
        "{} Found {} PDF files in {} deal folders",
        style("ℹ").blue(),
        discovery.files.len(),
        discovery.deal_folders().len()
    );

    let pb = ProgressBar::new(discovery.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );

    let outcome = aggregator.aggregate_discovered(discovery, |file| {
        pb.set_message(file.deal_name.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();

    let batch = match outcome {
        Ok(batch) => batch,
        Err(TdsError::EmptyBatch { errors }) => {
            print_errors(&errors);
            anyhow::bail!("No data was processed. Check if your files are in the correct format.");
        }
        Err(e) => return Err(e.into()),
    };
    print_errors(&batch.errors);

    let output_path = args.output.clone().unwrap_or_else(|| {
        let name = config.output_file_name(args.quarter.as_deref());
        match args.format {
            OutputFormat::Csv => name,
            OutputFormat::Json => name.with_extension("json"),
        }
    });

    match args.format {
        OutputFormat::Csv => write_batch_to_path(&batch, &config.export.columns, &output_path)?,
        OutputFormat::Json => {
            let report = BatchReport {
                generated_at: Utc::now(),
                root: &args.input,
                records: &batch.records,
                errors: &batch.errors,
            };
            fs::write(&output_path, serde_json::to_string_pretty(&report)?)?;
        }
    }

    println!(
        "{} Processed {} files successfully in {:?}",
        style("✓").green(),
        batch.records.len(),
        start.elapsed()
    );
    println!(
        "{} Output written to {}",
        style("✓").green(),
        output_path.display()
    );

    if args.validate {
        let report = RecordValidator::new().validate_batch(&batch);
        println!();
        if report.is_valid() {
            println!("{} {}", style("✓").green(), report);
        } else {
            println!("{}", style("Validation issues:").yellow());
            for row in &report.flagged {
                println!("  {}", row);
            }
        }
    }

    Ok(())
}

fn print_errors(errors: &[ExtractionError]) {
    if errors.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Failed files:").red());
    for error in errors {
        println!("  - {}", error);
    }
    println!();
}
