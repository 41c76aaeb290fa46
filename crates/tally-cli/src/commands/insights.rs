//! Insights command

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{
    export::{render_insights_text, report_json},
    synthesize_results, AnalysisConfig, Aggregator,
};

use super::core::{load_cleaned, write_output};

pub fn cmd_insights(
    config: &AnalysisConfig,
    file: &Path,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let (cleaned, _) = load_cleaned(config, file)?;
    let results = Aggregator::new(config.clone())?
        .aggregate(&cleaned)
        .context("Failed to aggregate")?;
    let report = synthesize_results(&results).context("Failed to synthesize insights")?;

    let rendered = if json {
        report_json(&report)?
    } else {
        render_insights_text(&report)
    };

    match output {
        Some(path) => {
            write_output(path, &rendered)?;
            println!("✅ Insights report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
