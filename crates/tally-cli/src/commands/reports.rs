//! Report command implementations
//!
//! Each table printer is shared with `analyze`, which prints all of them.

use anyhow::Result;
use tally_core::{
    aggregate::{
        by_category, by_region, by_time, calculate_kpis, demographics, payment_methods,
        top_products,
    },
    export::{format_count, format_currency},
    AnalysisConfig, DemographicSummary, GroupSummary, KpiSet, PaymentSummary,
    ProductSummary, RecordFilter, TimeAnalysis,
};

use super::core::{load_cleaned, parse_date_arg};
use super::truncate;
use crate::cli::FilterArgs;

/// Which table `tally report` prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Kpis,
    Category,
    Region,
    Time,
    Products,
    Demographics,
    Payments,
}

pub fn cmd_report(config: &AnalysisConfig, kind: ReportKind, args: &FilterArgs) -> Result<()> {
    let (cleaned, _) = load_cleaned(config, &args.file)?;

    let from = parse_date_arg(args.from.as_deref(), "from")?;
    let to = parse_date_arg(args.to.as_deref(), "to")?;
    let filter = RecordFilter::new()
        .date_range(from, to)
        .categories(Some(args.category.as_slice()))
        .regions(Some(args.region.as_slice()))
        .payment_methods(Some(args.payment.as_slice()));

    let records = if filter.is_empty() {
        cleaned
    } else {
        let subset = filter.apply(&cleaned);
        println!(
            "   Filtered: {} of {} records",
            subset.len(),
            cleaned.len()
        );
        subset
    };

    if records.is_empty() {
        println!("   No records match the given filters.");
        return Ok(());
    }

    match kind {
        ReportKind::Kpis => print_kpis(&calculate_kpis(&records)?),
        ReportKind::Category => {
            print_group_table("📦 Revenue by Category", "Category", &by_category(&records))
        }
        ReportKind::Region => {
            print_group_table("🌍 Revenue by Region", "Region", &by_region(&records))
        }
        ReportKind::Time => print_time(&by_time(&records)),
        ReportKind::Products => print_products(&top_products(&records, config.top_n)?),
        ReportKind::Demographics => print_demographics(&demographics(&records)),
        ReportKind::Payments => print_payments(&payment_methods(&records)),
    }

    Ok(())
}

pub fn print_kpis(kpis: &KpiSet) {
    println!();
    println!("📊 Key Performance Indicators");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:28} │ {:>16}", "Total Revenue", format_currency(kpis.total_revenue));
    println!("   {:28} │ {:>16}", "Total Orders", format_count(kpis.total_orders as u64));
    println!(
        "   {:28} │ {:>16}",
        "Average Order Value",
        format_currency(kpis.average_order_value)
    );
    println!(
        "   {:28} │ {:>16}",
        "Total Quantity Sold",
        format_count(kpis.total_quantity)
    );
    println!(
        "   {:28} │ {:>16.2}",
        "Avg Quantity per Order", kpis.average_quantity_per_order
    );
    println!(
        "   {:28} │ {:>16}",
        "Total Discount Given",
        format_currency(kpis.total_discount)
    );
    println!("   {:28} │ {:>15.2}%", "Discount Rate", kpis.discount_rate);
    println!(
        "   {:28} │ {:>16}",
        "Unique Customers",
        format_count(kpis.unique_customers as u64)
    );
    println!(
        "   {:28} │ {:>16}",
        "Unique Products",
        format_count(kpis.unique_products as u64)
    );
    println!(
        "   {:28} │ {:>16}",
        "Unique Categories",
        format_count(kpis.unique_categories as u64)
    );
}

pub fn print_group_table(title: &str, key_header: &str, rows: &[GroupSummary]) {
    println!();
    println!("{}", title);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:20} │ {:>12} │ {:>9} │ {:>6} │ {:>6} │ {:>6}",
        key_header, "Revenue", "Avg", "Orders", "Qty", "Share"
    );
    println!("   ─────────────────────┼──────────────┼───────────┼────────┼────────┼────────");
    for row in rows {
        println!(
            "   {:20} │ {:>12.2} │ {:>9.2} │ {:>6} │ {:>6} │ {:>5.1}%",
            truncate(&row.key, 20),
            row.total_revenue,
            row.avg_order_value,
            row.order_count,
            row.total_quantity,
            row.revenue_share
        );
    }
}

pub fn print_time(time: &TimeAnalysis) {
    println!();
    println!("📈 Revenue over Time");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:10} │ {:>12} │ {:>6} │ {:>6}", "Month", "Revenue", "Orders", "Qty");
    println!("   ───────────┼──────────────┼────────┼───────");
    for m in &time.monthly {
        println!(
            "   {:10} │ {:>12.2} │ {:>6} │ {:>6}",
            m.label(),
            m.revenue,
            m.orders,
            m.quantity
        );
    }

    println!();
    println!("   {:10} │ {:>12} │ {:>6} │ {:>6}", "Quarter", "Revenue", "Orders", "Qty");
    println!("   ───────────┼──────────────┼────────┼───────");
    for q in &time.quarterly {
        println!(
            "   {:10} │ {:>12.2} │ {:>6} │ {:>6}",
            q.label(),
            q.revenue,
            q.orders,
            q.quantity
        );
    }

    println!();
    println!("   {:10} │ {:>12} │ {:>6} │ {:>6}", "Year", "Revenue", "Orders", "Qty");
    println!("   ───────────┼──────────────┼────────┼───────");
    for y in &time.yearly {
        println!(
            "   {:10} │ {:>12.2} │ {:>6} │ {:>6}",
            y.year, y.revenue, y.orders, y.quantity
        );
    }
}

pub fn print_products(rows: &[ProductSummary]) {
    println!();
    println!("🏆 Top Products");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>3} │ {:22} │ {:16} │ {:>12} │ {:>6} │ {:>9}",
        "#", "Product", "Category", "Revenue", "Orders", "Avg Price"
    );
    println!("   ────┼────────────────────────┼──────────────────┼──────────────┼────────┼──────────");
    for (i, row) in rows.iter().enumerate() {
        println!(
            "   {:>3} │ {:22} │ {:16} │ {:>12.2} │ {:>6} │ {:>9.2}",
            i + 1,
            truncate(&row.product_name, 22),
            truncate(&row.category, 16),
            row.total_revenue,
            row.order_count,
            row.avg_price
        );
    }
}

pub fn print_demographics(rows: &[DemographicSummary]) {
    println!();
    println!("👥 Customer Demographics");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:12} │ {:>9} │ {:>12} │ {:>9} │ {:>6}",
        "Age Group", "Customers", "Revenue", "Avg", "Orders"
    );
    println!("   ─────────────┼───────────┼──────────────┼───────────┼───────");
    for row in rows {
        println!(
            "   {:12} │ {:>9} │ {:>12.2} │ {:>9.2} │ {:>6}",
            truncate(&row.age_group, 12),
            row.unique_customers,
            row.total_revenue,
            row.avg_order_value,
            row.total_orders
        );
    }
}

pub fn print_payments(rows: &[PaymentSummary]) {
    println!();
    println!("💳 Payment Methods");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:16} │ {:>12} │ {:>6} │ {:>6}",
        "Method", "Revenue", "Orders", "Usage"
    );
    println!("   ─────────────────┼──────────────┼────────┼───────");
    for row in rows {
        println!(
            "   {:16} │ {:>12.2} │ {:>6} │ {:>5.1}%",
            truncate(&row.payment_method, 16),
            row.total_revenue,
            row.order_count,
            row.usage_share
        );
    }
}
