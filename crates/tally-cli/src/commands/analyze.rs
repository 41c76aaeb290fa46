//! Full analysis pipeline command
//!
//! Writes into the output directory:
//! - `cleaned_sales_data.csv`
//! - `insights_report.txt`
//! - `analysis.json` (with --json)

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{
    export::{cleaned_records_csv, render_insights_text, results_json},
    synthesize_results, AnalysisConfig, Aggregator,
};

use super::core::{load_cleaned, print_cleaning_report, write_output};
use super::reports::{
    print_demographics, print_group_table, print_kpis, print_payments, print_products, print_time,
};

pub const CLEANED_FILE: &str = "cleaned_sales_data.csv";
pub const REPORT_FILE: &str = "insights_report.txt";
pub const JSON_FILE: &str = "analysis.json";

pub fn cmd_analyze(config: &AnalysisConfig, file: &Path, out_dir: &Path, json: bool) -> Result<()> {
    println!("🔍 Analyzing {}...", file.display());

    let (cleaned, report) = load_cleaned(config, file)?;
    print_cleaning_report(&report);

    let cleaned_path = out_dir.join(CLEANED_FILE);
    write_output(
        &cleaned_path,
        &cleaned_records_csv(&cleaned).context("Failed to render cleaned data")?,
    )?;

    let results = Aggregator::new(config.clone())?
        .aggregate(&cleaned)
        .context("Failed to aggregate")?;

    print_kpis(&results.kpis);
    print_group_table("📦 Revenue by Category", "Category", &results.by_category);
    print_group_table("🌍 Revenue by Region", "Region", &results.by_region);
    print_time(&results.by_time);
    print_products(&results.top_products);
    print_demographics(&results.demographics);
    print_payments(&results.payments);

    let insights = synthesize_results(&results).context("Failed to synthesize insights")?;
    let report_path = out_dir.join(REPORT_FILE);
    write_output(&report_path, &render_insights_text(&insights))?;

    println!();
    println!("✅ Analysis complete");
    println!("   Cleaned data:    {}", cleaned_path.display());
    println!("   Insights report: {}", report_path.display());

    if json {
        let json_path = out_dir.join(JSON_FILE);
        write_output(&json_path, &results_json(&results)?)?;
        println!("   Analysis JSON:   {}", json_path.display());
    }

    tracing::info!(
        records = cleaned.len(),
        out_dir = %out_dir.display(),
        "Analysis written"
    );
    Ok(())
}
