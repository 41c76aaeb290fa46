//! Domain models for Tally

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Column names of the fixed input schema, in file order
pub const INPUT_COLUMNS: [&str; 12] = [
    "Order_ID",
    "Order_Date",
    "Customer_ID",
    "Product_Name",
    "Category",
    "Quantity",
    "Unit_Price",
    "Total_Amount",
    "Discount",
    "Region",
    "Payment_Method",
    "Customer_Age_Group",
];

/// One sales transaction as supplied by the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Order_ID")]
    pub order_id: String,
    #[serde(rename = "Order_Date")]
    pub order_date: NaiveDate,
    #[serde(rename = "Customer_ID")]
    pub customer_id: String,
    #[serde(rename = "Product_Name")]
    pub product_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Unit_Price")]
    pub unit_price: f64,
    /// Trusted as supplied; only ever capped by the outlier rule
    #[serde(rename = "Total_Amount")]
    pub total_amount: f64,
    #[serde(rename = "Discount")]
    pub discount: f64,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
    /// The only field the cleaner repairs when absent
    #[serde(rename = "Customer_Age_Group")]
    pub customer_age_group: Option<String>,
}

impl SalesRecord {
    /// Check the field-level invariants of a record
    fn validate(&self, row: usize) -> Result<()> {
        let required = [
            ("Order_ID", &self.order_id),
            ("Customer_ID", &self.customer_id),
            ("Product_Name", &self.product_name),
            ("Category", &self.category),
            ("Region", &self.region),
            ("Payment_Method", &self.payment_method),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::malformed_row(
                    row,
                    format!("missing required field {}", name),
                ));
            }
        }

        if self.quantity == 0 {
            return Err(Error::malformed_row(row, "Quantity must be positive"));
        }

        let amounts = [
            ("Unit_Price", self.unit_price),
            ("Total_Amount", self.total_amount),
            ("Discount", self.discount),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::malformed_row(
                    row,
                    format!("{} must be a non-negative number, got {}", name, value),
                ));
            }
        }

        Ok(())
    }
}

/// Validated, ordered collection of sales records
///
/// Serialized as a plain list; deserializing goes through [`RecordSet::new`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<SalesRecord>", into = "Vec<SalesRecord>")]
pub struct RecordSet {
    records: Vec<SalesRecord>,
}

impl RecordSet {
    /// Validate every record; the first violation aborts with MalformedInput
    pub fn new(records: Vec<SalesRecord>) -> Result<Self> {
        for (i, record) in records.iter().enumerate() {
            record.validate(i + 1)?;
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SalesRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<Vec<SalesRecord>> for RecordSet {
    type Error = Error;

    fn try_from(records: Vec<SalesRecord>) -> Result<Self> {
        Self::new(records)
    }
}

impl From<RecordSet> for Vec<SalesRecord> {
    fn from(set: RecordSet) -> Self {
        set.records
    }
}

/// A record after cleaning, with derived calendar and revenue columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    #[serde(rename = "Order_ID")]
    pub order_id: String,
    #[serde(rename = "Order_Date")]
    pub order_date: NaiveDate,
    #[serde(rename = "Customer_ID")]
    pub customer_id: String,
    #[serde(rename = "Product_Name")]
    pub product_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Unit_Price")]
    pub unit_price: f64,
    #[serde(rename = "Total_Amount")]
    pub total_amount: f64,
    #[serde(rename = "Discount")]
    pub discount: f64,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
    #[serde(rename = "Customer_Age_Group")]
    pub customer_age_group: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Month_Name")]
    pub month_name: String,
    #[serde(rename = "Quarter")]
    pub quarter: u32,
    #[serde(rename = "Day_of_Week")]
    pub day_of_week: String,
    /// `total_amount - discount`. Whether `total_amount` is gross or already
    /// net of discount depends on the data source and is not asserted here.
    #[serde(rename = "Revenue_After_Discount")]
    pub revenue_after_discount: f64,
}

impl CleanedRecord {
    /// Drop the derived columns, yielding a record that can be cleaned again
    pub fn to_sales_record(&self) -> SalesRecord {
        SalesRecord {
            order_id: self.order_id.clone(),
            order_date: self.order_date,
            customer_id: self.customer_id.clone(),
            product_name: self.product_name.clone(),
            category: self.category.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_amount: self.total_amount,
            discount: self.discount,
            region: self.region.clone(),
            payment_method: self.payment_method.clone(),
            customer_age_group: Some(self.customer_age_group.clone()),
        }
    }
}

/// Output of the cleaner; the input to every aggregation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CleanedRecordSet {
    records: Vec<CleanedRecord>,
}

impl CleanedRecordSet {
    /// Wrap records that have already been cleaned (or a filtered subset of them)
    pub fn from_records(records: Vec<CleanedRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CleanedRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleanedRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Strip derived columns so the set can be passed through the cleaner again
    pub fn to_record_set(&self) -> RecordSet {
        RecordSet {
            records: self.records.iter().map(|r| r.to_sales_record()).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CleanedRecordSet {
    type Item = &'a CleanedRecord;
    type IntoIter = std::slice::Iter<'a, CleanedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Fence values used by the outlier rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Counts of the actions the cleaner took (observability only)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub missing_filled: usize,
    pub duplicates_removed: usize,
    pub outliers_capped: usize,
    pub bounds: Option<OutlierBounds>,
}

impl CleaningReport {
    /// True when cleaning changed nothing
    pub fn is_noop(&self) -> bool {
        self.missing_filled == 0 && self.duplicates_removed == 0 && self.outliers_capped == 0
    }
}

/// Whole-dataset key performance indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub average_order_value: f64,
    pub total_quantity: u64,
    pub average_quantity_per_order: f64,
    pub total_discount: f64,
    /// Total discount as a percentage of total revenue (0 when revenue is 0)
    pub discount_rate: f64,
    pub unique_customers: usize,
    pub unique_products: usize,
    pub unique_categories: usize,
}

/// Revenue summary for a single-key grouping (category or region)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: String,
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub order_count: usize,
    pub total_quantity: u64,
    /// Percentage of the table's grand total revenue
    pub revenue_share: f64,
}

/// Revenue per calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
    pub orders: usize,
    pub quantity: u64,
}

impl MonthlySummary {
    /// `YYYY-MM` label
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Revenue per calendar quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlySummary {
    pub year: i32,
    pub quarter: u32,
    pub revenue: f64,
    pub orders: usize,
    pub quantity: u64,
}

impl QuarterlySummary {
    /// `YYYY-Qn` label
    pub fn label(&self) -> String {
        format!("{}-Q{}", self.year, self.quarter)
    }
}

/// Revenue per calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: i32,
    pub revenue: f64,
    pub orders: usize,
    pub quantity: u64,
}

/// Monthly, quarterly and yearly tables, each in chronological order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeAnalysis {
    pub monthly: Vec<MonthlySummary>,
    pub quarterly: Vec<QuarterlySummary>,
    pub yearly: Vec<YearlySummary>,
}

/// Revenue for one (product, category) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_name: String,
    pub category: String,
    pub total_revenue: f64,
    pub order_count: usize,
    pub total_quantity: u64,
    pub avg_price: f64,
}

/// Revenue for one customer age group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicSummary {
    pub age_group: String,
    pub unique_customers: usize,
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub total_orders: usize,
}

/// Revenue and usage for one payment method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub payment_method: String,
    pub total_revenue: f64,
    pub transaction_count: usize,
    pub order_count: usize,
    /// Percentage of all orders paid with this method
    pub usage_share: f64,
}

/// The seven analyses computed over one cleaned record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResults {
    pub kpis: KpiSet,
    pub by_category: Vec<GroupSummary>,
    pub by_region: Vec<GroupSummary>,
    pub by_time: TimeAnalysis,
    pub top_products: Vec<ProductSummary>,
    pub demographics: Vec<DemographicSummary>,
    pub payments: Vec<PaymentSummary>,
}
