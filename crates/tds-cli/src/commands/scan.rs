//! Scan command - show how a directory splits into deal folders.

use std::path::PathBuf;

use clap::Args;
use console::style;

use tds_core::DealAggregator;

use super::load_config;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Directory containing deal folders
    #[arg(required = true)]
    input: PathBuf,

    /// Also list the extraction rules in priority order
    #[arg(long)]
    rules: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.input.display());
    }

    let aggregator = DealAggregator::from_config(&config);
    let discovery = aggregator.discover(&args.input)?;
    let folders = discovery.deal_folders();

    if folders.is_empty() {
        println!("{} No PDF files found under {}", style("ℹ").blue(), args.input.display());
    }

    for folder in &folders {
        let location = if folder.relative_path.as_os_str().is_empty() {
            ".".to_string()
        } else {
            folder.relative_path.display().to_string()
        };
        println!(
            "{} {} ({} PDFs)",
            style(&folder.name).bold(),
            style(format!("[{}]", location)).dim(),
            folder.files.len()
        );
        for file in &folder.files {
            println!("    {}", file);
        }
    }

    if !discovery.errors.is_empty() {
        println!();
        println!("{}", style("Unreadable entries:").red());
        for error in &discovery.errors {
            println!("  - {}", error);
        }
    }

    if args.rules {
        println!();
        println!("{}", style("Extraction rules:").bold());
        for (field, rules) in aggregator.parser().describe() {
            println!("  {}: {}", field, rules.join(" -> "));
        }
    }

    Ok(())
}
