//! Dataset info command

use std::path::Path;

use anyhow::Result;
use tally_core::profile;

use super::core::load_records;

pub fn cmd_info(file: &Path) -> Result<()> {
    let records = load_records(file)?;
    let profile = profile(&records);

    println!();
    println!("📋 Dataset Information");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Shape: {} rows × {} columns",
        profile.rows,
        profile.columns.len()
    );
    if let Some((first, last)) = profile.date_range {
        println!("   Dates: {} to {}", first, last);
    }
    println!("   Unique orders:    {}", profile.unique_orders);
    println!("   Unique customers: {}", profile.unique_customers);

    println!();
    println!("   Columns:");
    for (i, column) in profile.columns.iter().enumerate() {
        println!("   {:>3}. {}", i + 1, column);
    }

    println!();
    println!("   Missing values:");
    if profile.missing.is_empty() {
        println!("     No missing values found");
    } else {
        for (column, count) in &profile.missing {
            println!("     {:20} {}", column, count);
        }
    }

    if !profile.numeric.is_empty() {
        println!();
        println!(
            "   {:14} │ {:>10} │ {:>10} │ {:>10} │ {:>10} │ {:>10}",
            "Column", "Mean", "Std", "Min", "Median", "Max"
        );
        println!("   ───────────────┼────────────┼────────────┼────────────┼────────────┼───────────");
        for col in &profile.numeric {
            let s = &col.summary;
            println!(
                "   {:14} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>10.2}",
                col.column, s.mean, s.std, s.min, s.median, s.max
            );
        }
    }

    Ok(())
}
