//! Clean command

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{export::cleaned_records_csv, AnalysisConfig};

use super::core::{load_cleaned, print_cleaning_report, write_output};

pub fn cmd_clean(config: &AnalysisConfig, file: &Path, output: Option<&Path>) -> Result<()> {
    println!("🧹 Cleaning {}...", file.display());

    let (cleaned, report) = load_cleaned(config, file)?;
    print_cleaning_report(&report);

    if report.is_noop() {
        println!("   Data was already clean.");
    }

    if let Some(path) = output {
        let csv = cleaned_records_csv(&cleaned).context("Failed to render cleaned data")?;
        write_output(path, &csv)?;
        println!();
        println!("✅ Cleaned data saved to {}", path.display());
    }

    Ok(())
}
