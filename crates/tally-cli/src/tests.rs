//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::cli::FilterArgs;
use crate::commands::{self, truncate, ReportKind};

const SALES_CSV: &str = "\
Order_ID,Order_Date,Customer_ID,Product_Name,Category,Quantity,Unit_Price,Total_Amount,Discount,Region,Payment_Method,Customer_Age_Group
ORD001,2024-01-05,C1,Headphones,Electronics,1,100.00,100.00,10.00,North America,Credit Card,26-35
ORD002,2024-01-20,C2,Novel,Books,4,30.00,120.00,0.00,Europe,PayPal,18-25
ORD003,2024-02-11,C3,Puzzle,Toys,2,40.00,80.00,0.00,Asia,Credit Card,
ORD004,2024-02-14,C1,Headphones,Electronics,1,90.00,90.00,0.00,North America,Debit Card,26-35
ORD005,2024-03-02,C4,Blender,Home & Kitchen,1,110.00,110.00,5.00,Europe,PayPal,36-45
ORD006,2024-03-15,C5,Television,Electronics,1,5000.00,5000.00,0.00,Asia,Credit Card,46-55
ORD001,2024-01-05,C1,Headphones,Electronics,1,100.00,100.00,10.00,North America,Credit Card,26-35
";

/// Write the sample sales file into a fresh temp dir
fn setup_sales_file() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sales.csv");
    fs::write(&path, SALES_CSV).unwrap();
    (dir, path)
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("analysis.toml");
    fs::write(&path, content).unwrap();
    path
}

fn filter_args(file: &Path) -> FilterArgs {
    FilterArgs {
        file: file.to_path_buf(),
        from: None,
        to: None,
        category: vec![],
        region: vec![],
        payment: vec![],
    }
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long product name", 10), "a very ...");
    assert_eq!(truncate("Café au lait maker", 8), "Café ...");
}

#[test]
fn test_parse_date_arg() {
    assert_eq!(commands::parse_date_arg(None, "from").unwrap(), None);
    let date = commands::parse_date_arg(Some("2024-02-29"), "from").unwrap();
    assert_eq!(date.unwrap().to_string(), "2024-02-29");

    let err = commands::parse_date_arg(Some("02/29/2024"), "to").unwrap_err();
    assert!(err.to_string().contains("--to"));
}

// ========== Config Tests ==========

#[test]
fn test_resolve_config_from_file_with_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "top_n = 3\nunknown_label = \"N/A\"\n");

    let config = commands::resolve_config(Some(&path), None, None).unwrap();
    assert_eq!(config.top_n, 3);
    assert_eq!(config.unknown_label, "N/A");
    assert_eq!(config.iqr_multiplier, 1.5);

    let config = commands::resolve_config(Some(&path), Some(7), Some(3.0)).unwrap();
    assert_eq!(config.top_n, 7);
    assert_eq!(config.iqr_multiplier, 3.0);
}

#[test]
fn test_resolve_config_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "");

    assert!(commands::resolve_config(Some(&path), Some(0), None).is_err());
    assert!(commands::resolve_config(Some(&path), None, Some(-1.0)).is_err());
}

#[test]
fn test_resolve_config_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = commands::resolve_config(Some(&missing), None, None).unwrap_err();
    assert!(format!("{:#}", err).contains("Config file not found"));
}

// ========== Loading Tests ==========

#[test]
fn test_load_records_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = commands::load_records(&dir.path().join("missing.csv")).unwrap_err();
    assert!(err.to_string().contains("Failed to open"));
}

#[test]
fn test_load_records_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, SALES_CSV.replace("2024-02-11", "someday")).unwrap();

    let err = commands::load_records(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("row 3"));
}

#[test]
fn test_load_cleaned() {
    let (_dir, path) = setup_sales_file();
    let config = tally_core::AnalysisConfig::default();
    let (cleaned, report) = commands::load_cleaned(&config, &path).unwrap();
    assert_eq!(cleaned.len(), 6);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.missing_filled, 1);
}

#[test]
fn test_load_cleaned_header_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, SALES_CSV.lines().next().unwrap()).unwrap();

    let config = tally_core::AnalysisConfig::default();
    let err = commands::load_cleaned(&config, &path).unwrap_err();
    assert!(format!("{:#}", err).contains("no data available"));
}

// ========== Command Tests ==========

#[test]
fn test_cmd_info() {
    let (_dir, path) = setup_sales_file();
    assert!(commands::cmd_info(&path).is_ok());
}

#[test]
fn test_cmd_clean_writes_output() {
    let (dir, path) = setup_sales_file();
    let output = dir.path().join("out").join("cleaned.csv");
    let config = tally_core::AnalysisConfig::default();

    commands::cmd_clean(&config, &path, Some(&output)).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("Order_ID,"));
    assert!(written.contains("Revenue_After_Discount"));
    // Header plus six unique orders
    assert_eq!(written.lines().count(), 7);
    assert!(written.contains(",Unknown,"));
}

#[test]
fn test_cmd_analyze_writes_reports() {
    let (dir, path) = setup_sales_file();
    let out_dir = dir.path().join("reports");
    let config = tally_core::AnalysisConfig::default();

    commands::cmd_analyze(&config, &path, &out_dir, true).unwrap();

    assert!(out_dir.join(commands::CLEANED_FILE).exists());

    let report = fs::read_to_string(out_dir.join(commands::REPORT_FILE)).unwrap();
    assert!(report.contains("EXECUTIVE SUMMARY"));
    assert!(report.contains("TOP PERFORMING CATEGORY: Electronics"));
    assert!(report.contains("STRATEGIC RECOMMENDATIONS"));

    let json = fs::read_to_string(out_dir.join(commands::JSON_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kpis"]["total_orders"], 6);
}

#[test]
fn test_cmd_analyze_without_json() {
    let (dir, path) = setup_sales_file();
    let out_dir = dir.path().join("plain");
    let config = tally_core::AnalysisConfig::default();

    commands::cmd_analyze(&config, &path, &out_dir, false).unwrap();
    assert!(out_dir.join(commands::REPORT_FILE).exists());
    assert!(!out_dir.join(commands::JSON_FILE).exists());
}

#[test]
fn test_cmd_report_all_kinds() {
    let (_dir, path) = setup_sales_file();
    let config = tally_core::AnalysisConfig::default();
    let args = filter_args(&path);

    for kind in [
        ReportKind::Kpis,
        ReportKind::Category,
        ReportKind::Region,
        ReportKind::Time,
        ReportKind::Products,
        ReportKind::Demographics,
        ReportKind::Payments,
    ] {
        assert!(
            commands::cmd_report(&config, kind, &args).is_ok(),
            "{:?} report failed",
            kind
        );
    }
}

#[test]
fn test_cmd_report_with_filters() {
    let (_dir, path) = setup_sales_file();
    let config = tally_core::AnalysisConfig::default();
    let mut args = filter_args(&path);
    args.from = Some("2024-02-01".to_string());
    args.region = vec!["Asia".to_string()];

    assert!(commands::cmd_report(&config, ReportKind::Category, &args).is_ok());

    // A filter that matches nothing is not an error
    args.payment = vec!["Cash".to_string()];
    assert!(commands::cmd_report(&config, ReportKind::Kpis, &args).is_ok());
}

#[test]
fn test_cmd_report_invalid_date() {
    let (_dir, path) = setup_sales_file();
    let config = tally_core::AnalysisConfig::default();
    let mut args = filter_args(&path);
    args.to = Some("March".to_string());

    assert!(commands::cmd_report(&config, ReportKind::Time, &args).is_err());
}

#[test]
fn test_cmd_insights_to_file() {
    let (dir, path) = setup_sales_file();
    let config = tally_core::AnalysisConfig::default();

    let text_path = dir.path().join("insights.txt");
    commands::cmd_insights(&config, &path, Some(&text_path), false).unwrap();
    let text = fs::read_to_string(&text_path).unwrap();
    assert!(text.contains("SEASONAL TRENDS"));

    let json_path = dir.path().join("insights.json");
    commands::cmd_insights(&config, &path, Some(&json_path), true).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["findings"].as_array().unwrap().len(), 6);
    assert_eq!(value["strategy"].as_array().unwrap().len(), 5);
}
