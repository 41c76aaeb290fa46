//! Shared command utilities
//!
//! This module contains:
//! - `resolve_config` - Load the analysis config and apply CLI overrides
//! - `load_records` / `load_cleaned` - Read and clean a sales CSV
//! - `parse_date_arg` - Parse --from/--to flags
//! - `write_output` - Write a rendered report, creating parent directories

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::{
    config::load_config, import::parse_csv, AnalysisConfig, Cleaner, CleanedRecordSet,
    CleaningReport, RecordSet,
};

/// Load config (explicit path, user override, or defaults), then apply flag overrides
pub fn resolve_config(
    config_path: Option<&Path>,
    top_n: Option<usize>,
    iqr_multiplier: Option<f64>,
) -> Result<AnalysisConfig> {
    let mut config = load_config(config_path).context("Failed to load analysis config")?;

    if let Some(n) = top_n {
        config = config.with_top_n(n);
    }
    if let Some(k) = iqr_multiplier {
        config = config.with_iqr_multiplier(k);
    }

    config.validate().context("Invalid analysis options")?;
    tracing::debug!(
        top_n = config.top_n,
        iqr_multiplier = config.iqr_multiplier,
        unknown_label = %config.unknown_label,
        "Resolved analysis config"
    );
    Ok(config)
}

/// Read and validate a sales CSV file
pub fn load_records(path: &Path) -> Result<RecordSet> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let records =
        parse_csv(file).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = records.len(), "Loaded sales records");
    Ok(records)
}

/// Read and clean a sales CSV file
pub fn load_cleaned(
    config: &AnalysisConfig,
    path: &Path,
) -> Result<(CleanedRecordSet, CleaningReport)> {
    let records = load_records(path)?;
    let cleaner = Cleaner::new(config.clone())?;
    cleaner.clean(records).context("Failed to clean records")
}

/// Parse an optional YYYY-MM-DD flag value
pub fn parse_date_arg(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD)", flag))
        })
        .transpose()
}

/// Write text to a file, creating parent directories as needed
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote output");
    Ok(())
}

/// Print the cleaning summary block
pub fn print_cleaning_report(report: &CleaningReport) {
    println!();
    println!("🧹 Cleaning Summary");
    println!("   ─────────────────────────────");
    println!("   Input rows:          {}", report.input_rows);
    println!("   Missing filled:      {}", report.missing_filled);
    println!("   Duplicates removed:  {}", report.duplicates_removed);
    println!("   Outliers capped:     {}", report.outliers_capped);
    if let Some(b) = report.bounds {
        println!(
            "   Total_Amount bounds: {:.2} to {:.2} (Q1 {:.2}, Q3 {:.2})",
            b.lower, b.upper, b.q1, b.q3
        );
    }
    println!("   Output rows:         {}", report.output_rows);
}
