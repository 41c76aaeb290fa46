//! Tally CLI - Sales data cleaning and analysis
//!
//! Usage:
//!   tally info --file sales.csv              Profile a dataset
//!   tally clean --file sales.csv -o out.csv  Clean and save
//!   tally analyze --file sales.csv           Full pipeline with reports
//!   tally report category --file sales.csv   One analysis table
//!   tally insights --file sales.csv          Insights report

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::ReportKind;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Info { file } => commands::cmd_info(&file),
        Commands::Clean {
            file,
            output,
            iqr_multiplier,
        } => {
            let config = commands::resolve_config(config_path, None, iqr_multiplier)?;
            commands::cmd_clean(&config, &file, output.as_deref())
        }
        Commands::Analyze {
            file,
            out_dir,
            top_n,
            iqr_multiplier,
            json,
        } => {
            let config = commands::resolve_config(config_path, top_n, iqr_multiplier)?;
            commands::cmd_analyze(&config, &file, &out_dir, json)
        }
        Commands::Report { report_type } => {
            let (kind, filter, top_n) = match report_type {
                ReportType::Kpis(filter) => (ReportKind::Kpis, filter, None),
                ReportType::Category(filter) => (ReportKind::Category, filter, None),
                ReportType::Region(filter) => (ReportKind::Region, filter, None),
                ReportType::Time(filter) => (ReportKind::Time, filter, None),
                ReportType::Products { filter, top_n } => (ReportKind::Products, filter, top_n),
                ReportType::Demographics(filter) => (ReportKind::Demographics, filter, None),
                ReportType::Payments(filter) => (ReportKind::Payments, filter, None),
            };
            let config = commands::resolve_config(config_path, top_n, None)?;
            commands::cmd_report(&config, kind, &filter)
        }
        Commands::Insights { file, output, json } => {
            let config = commands::resolve_config(config_path, None, None)?;
            commands::cmd_insights(&config, &file, output.as_deref(), json)
        }
    }
}
