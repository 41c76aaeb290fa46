//! Rendering of records, tables and reports to strings
//!
//! Supports:
//! - Cleaned record CSV (the input columns plus derived columns)
//! - Per-table CSV for every aggregate analysis
//! - JSON for aggregates and insights reports
//! - The plain-text insights report
//!
//! Nothing here touches the filesystem; callers decide where output goes.

use std::io;

use crate::error::{Error, Result};
use crate::insights::{InsightKind, InsightsReport};
use crate::models::{
    AggregateResults, CleanedRecordSet, DemographicSummary, GroupSummary, KpiSet, PaymentSummary,
    ProductSummary, TimeAnalysis,
};
use crate::stats::round2;

const RULE_WIDTH: usize = 80;

/// Format a monetary amount as `$1,234.56`
pub fn format_currency(value: f64) -> String {
    let cents = (round2(value).abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}${}.{:02}",
        sign,
        format_count(cents / 100),
        cents % 100
    )
}

/// Format an integer with thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Cleaned records as CSV, one row per record
pub fn cleaned_records_csv(records: &CleanedRecordSet) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for record in records {
        wtr.serialize(record)?;
    }
    finish(wtr)
}

/// KPIs as two-column `Metric,Value` CSV
pub fn kpis_csv(kpis: &KpiSet) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Metric", "Value"])?;
    for (metric, value) in kpi_rows(kpis) {
        wtr.write_record([metric, value.as_str()])?;
    }
    finish(wtr)
}

/// KPI names and display values, in report order
pub fn kpi_rows(kpis: &KpiSet) -> Vec<(&'static str, String)> {
    vec![
        ("Total_Revenue", format!("{:.2}", kpis.total_revenue)),
        ("Total_Orders", kpis.total_orders.to_string()),
        ("Average_Order_Value", format!("{:.2}", kpis.average_order_value)),
        ("Total_Quantity_Sold", kpis.total_quantity.to_string()),
        (
            "Average_Quantity_per_Order",
            format!("{:.2}", kpis.average_quantity_per_order),
        ),
        ("Total_Discount_Given", format!("{:.2}", kpis.total_discount)),
        ("Discount_Rate", format!("{:.2}", kpis.discount_rate)),
        ("Unique_Customers", kpis.unique_customers.to_string()),
        ("Unique_Products", kpis.unique_products.to_string()),
        ("Unique_Categories", kpis.unique_categories.to_string()),
    ]
}

/// Category or region table; `key_header` names the key column
pub fn group_table_csv(key_header: &str, rows: &[GroupSummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        key_header,
        "Total_Revenue",
        "Avg_Order_Value",
        "Order_Count",
        "Total_Quantity",
        "Revenue_Share_%",
    ])?;
    for row in rows {
        wtr.write_record([
            row.key.clone(),
            format!("{:.2}", row.total_revenue),
            format!("{:.2}", row.avg_order_value),
            row.order_count.to_string(),
            row.total_quantity.to_string(),
            format!("{:.2}", row.revenue_share),
        ])?;
    }
    finish(wtr)
}

/// Monthly, quarterly and yearly tables as three CSV documents
pub fn time_tables_csv(time: &TimeAnalysis) -> Result<[String; 3]> {
    let mut monthly = csv::Writer::from_writer(Vec::new());
    monthly.write_record(["Year", "Month", "Revenue", "Orders", "Quantity"])?;
    for m in &time.monthly {
        monthly.write_record([
            m.year.to_string(),
            m.month.to_string(),
            format!("{:.2}", m.revenue),
            m.orders.to_string(),
            m.quantity.to_string(),
        ])?;
    }

    let mut quarterly = csv::Writer::from_writer(Vec::new());
    quarterly.write_record(["Year", "Quarter", "Revenue", "Orders", "Quantity"])?;
    for q in &time.quarterly {
        quarterly.write_record([
            q.year.to_string(),
            q.quarter.to_string(),
            format!("{:.2}", q.revenue),
            q.orders.to_string(),
            q.quantity.to_string(),
        ])?;
    }

    let mut yearly = csv::Writer::from_writer(Vec::new());
    yearly.write_record(["Year", "Revenue", "Orders", "Quantity"])?;
    for y in &time.yearly {
        yearly.write_record([
            y.year.to_string(),
            format!("{:.2}", y.revenue),
            y.orders.to_string(),
            y.quantity.to_string(),
        ])?;
    }

    Ok([finish(monthly)?, finish(quarterly)?, finish(yearly)?])
}

pub fn top_products_csv(rows: &[ProductSummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "Product_Name",
        "Category",
        "Total_Revenue",
        "Order_Count",
        "Total_Quantity",
        "Avg_Price",
    ])?;
    for row in rows {
        wtr.write_record([
            row.product_name.clone(),
            row.category.clone(),
            format!("{:.2}", row.total_revenue),
            row.order_count.to_string(),
            row.total_quantity.to_string(),
            format!("{:.2}", row.avg_price),
        ])?;
    }
    finish(wtr)
}

pub fn demographics_csv(rows: &[DemographicSummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "Customer_Age_Group",
        "Unique_Customers",
        "Total_Revenue",
        "Avg_Order_Value",
        "Total_Orders",
    ])?;
    for row in rows {
        wtr.write_record([
            row.age_group.clone(),
            row.unique_customers.to_string(),
            format!("{:.2}", row.total_revenue),
            format!("{:.2}", row.avg_order_value),
            row.total_orders.to_string(),
        ])?;
    }
    finish(wtr)
}

pub fn payments_csv(rows: &[PaymentSummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "Payment_Method",
        "Total_Revenue",
        "Transaction_Count",
        "Order_Count",
        "Usage_%",
    ])?;
    for row in rows {
        wtr.write_record([
            row.payment_method.clone(),
            format!("{:.2}", row.total_revenue),
            row.transaction_count.to_string(),
            row.order_count.to_string(),
            format!("{:.2}", row.usage_share),
        ])?;
    }
    finish(wtr)
}

/// Aggregates as pretty-printed JSON
pub fn results_json(results: &AggregateResults) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Insights report as pretty-printed JSON
pub fn report_json(report: &InsightsReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// The plain-text insights report
pub fn render_insights_text(report: &InsightsReport) -> String {
    let kpis = &report.kpis;
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut lines: Vec<String> = Vec::new();

    lines.push(heavy.clone());
    lines.push("SALES PERFORMANCE ANALYSIS - INSIGHTS REPORT".to_string());
    lines.push(heavy.clone());
    lines.push(String::new());

    lines.push("EXECUTIVE SUMMARY".to_string());
    lines.push(light.clone());
    lines.push(format!("Total Revenue: {}", format_currency(kpis.total_revenue)));
    lines.push(format!("Total Orders: {}", format_count(kpis.total_orders as u64)));
    lines.push(format!(
        "Average Order Value: {}",
        format_currency(kpis.average_order_value)
    ));
    lines.push(format!(
        "Unique Customers: {}",
        format_count(kpis.unique_customers as u64)
    ));
    lines.push(String::new());

    lines.push("KEY INSIGHTS".to_string());
    lines.push(light);
    for (i, finding) in report.findings.iter().enumerate() {
        lines.push(String::new());
        match finding.kind {
            InsightKind::SeasonalTrends => lines.push(format!("{}. {}", i + 1, finding.title)),
            _ => lines.push(format!("{}. {}: {}", i + 1, finding.title, finding.entity)),
        }
        for fact in &finding.facts {
            lines.push(format!("   - {}", fact));
        }
        lines.push(format!("   - Recommendation: {}", finding.recommendation));
    }

    lines.push(String::new());
    lines.push(heavy.clone());
    lines.push("STRATEGIC RECOMMENDATIONS".to_string());
    lines.push(heavy.clone());
    for (i, section) in report.strategy.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {}", i + 1, section.title));
        for point in &section.points {
            lines.push(format!("   - {}", point));
        }
    }

    lines.push(String::new());
    lines.push(heavy.clone());
    lines.push("PERFORMANCE METRICS SUMMARY".to_string());
    lines.push(heavy.clone());

    lines.push(String::new());
    lines.push("Financial Metrics:".to_string());
    lines.push(format!("  - Total Revenue: {}", format_currency(kpis.total_revenue)));
    lines.push(format!(
        "  - Average Order Value: {}",
        format_currency(kpis.average_order_value)
    ));
    lines.push(format!(
        "  - Total Discount Given: {}",
        format_currency(kpis.total_discount)
    ));
    lines.push(format!("  - Discount Rate: {:.2}%", kpis.discount_rate));

    lines.push(String::new());
    lines.push("Operational Metrics:".to_string());
    lines.push(format!("  - Total Orders: {}", format_count(kpis.total_orders as u64)));
    lines.push(format!(
        "  - Total Quantity Sold: {} units",
        format_count(kpis.total_quantity)
    ));
    lines.push(format!(
        "  - Average Quantity per Order: {:.2} units",
        kpis.average_quantity_per_order
    ));

    lines.push(String::new());
    lines.push("Customer Metrics:".to_string());
    lines.push(format!(
        "  - Unique Customers: {}",
        format_count(kpis.unique_customers as u64)
    ));
    lines.push(format!(
        "  - Unique Products: {}",
        format_count(kpis.unique_products as u64)
    ));
    lines.push(format!(
        "  - Unique Categories: {}",
        format_count(kpis.unique_categories as u64)
    ));

    lines.push(String::new());
    lines.push(
        "Note: revenue is Total_Amount as supplied. Whether it is gross or already net of \
         Discount depends on the data source, so Revenue_After_Discount (Total_Amount - Discount) \
         may double-count discounts."
            .to_string(),
    );

    lines.push(String::new());
    lines.push(heavy.clone());
    lines.push("END OF REPORT".to_string());
    lines.push(heavy);

    lines.join("\n")
}
