//! Dataset profiling: shape, missing values and numeric column statistics

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{RecordSet, SalesRecord, INPUT_COLUMNS};
use crate::stats::{describe, Summary};

/// Statistics for one numeric input column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub summary: Summary,
}

/// Overview of a loaded record set, before cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: Vec<String>,
    /// Only columns with at least one missing value are listed
    pub missing: Vec<(String, usize)>,
    /// Earliest and latest order dates
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub unique_orders: usize,
    pub unique_customers: usize,
    pub numeric: Vec<ColumnSummary>,
}

impl DatasetProfile {
    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|(_, n)| n).sum()
    }
}

const NUMERIC_COLUMNS: [(&str, fn(&SalesRecord) -> f64); 4] = [
    ("Quantity", |r| f64::from(r.quantity)),
    ("Unit_Price", |r| r.unit_price),
    ("Total_Amount", |r| r.total_amount),
    ("Discount", |r| r.discount),
];

/// Profile a record set
pub fn profile(records: &RecordSet) -> DatasetProfile {
    let rows = records.records();

    let missing_age = rows.iter().filter(|r| r.customer_age_group.is_none()).count();
    let missing = if missing_age > 0 {
        vec![("Customer_Age_Group".to_string(), missing_age)]
    } else {
        Vec::new()
    };

    let date_range = rows
        .iter()
        .map(|r| r.order_date)
        .min()
        .zip(rows.iter().map(|r| r.order_date).max());

    let numeric = NUMERIC_COLUMNS
        .iter()
        .filter_map(|(name, get)| {
            let values: Vec<f64> = rows.iter().map(get).collect();
            describe(&values).map(|summary| ColumnSummary {
                column: name.to_string(),
                summary,
            })
        })
        .collect();

    DatasetProfile {
        rows: rows.len(),
        columns: INPUT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        missing,
        date_range,
        unique_orders: rows
            .iter()
            .map(|r| r.order_id.as_str())
            .collect::<HashSet<_>>()
            .len(),
        unique_customers: rows
            .iter()
            .map(|r| r.customer_id.as_str())
            .collect::<HashSet<_>>()
            .len(),
        numeric,
    }
}
