//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tally - Sales data cleaning, analysis and insights
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Clean, aggregate and summarize sales transaction data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analysis config file
    ///
    /// Defaults to ~/.config/tally/analysis.toml when present, otherwise the
    /// built-in defaults (top 10 products, IQR multiplier 1.5, "Unknown").
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show dataset shape, missing values and numeric statistics
    Info {
        /// Sales CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Clean a sales file and report what changed
    Clean {
        /// Sales CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Write the cleaned records to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the IQR multiplier used for outlier capping
        #[arg(long)]
        iqr_multiplier: Option<f64>,
    },

    /// Run the full pipeline: clean, aggregate, synthesize insights
    Analyze {
        /// Sales CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Directory for the cleaned data and reports
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,

        /// Number of products in the top products table
        #[arg(long)]
        top_n: Option<usize>,

        /// Override the IQR multiplier used for outlier capping
        #[arg(long)]
        iqr_multiplier: Option<f64>,

        /// Also write every table as analysis.json
        #[arg(long)]
        json: bool,
    },

    /// Print one analysis table, optionally over a filtered subset
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Print or save the insights report
    Insights {
        /// Sales CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Input file plus the subset filters shared by every report
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Sales CSV file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Start date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub to: Option<String>,

    /// Only these categories (repeatable)
    #[arg(long)]
    pub category: Vec<String>,

    /// Only these regions (repeatable)
    #[arg(long)]
    pub region: Vec<String>,

    /// Only these payment methods (repeatable)
    #[arg(long)]
    pub payment: Vec<String>,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Key performance indicators
    Kpis(FilterArgs),

    /// Revenue by product category
    Category(FilterArgs),

    /// Revenue by region
    Region(FilterArgs),

    /// Monthly, quarterly and yearly revenue
    Time(FilterArgs),

    /// Best-selling products
    Products {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of products to show
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Revenue by customer age group
    Demographics(FilterArgs),

    /// Revenue and usage by payment method
    Payments(FilterArgs),
}
