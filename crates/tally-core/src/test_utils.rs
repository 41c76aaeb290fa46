//! Test utilities for tally-core
//!
//! Builders for sales records so tests only spell out the fields they care about.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;

use crate::clean::derive_record;
use crate::models::{CleanedRecordSet, SalesRecord};

static COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Fluent builder for a [`SalesRecord`] with sensible defaults
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: SalesRecord,
}

impl RecordBuilder {
    /// New record with a unique order id
    pub fn new() -> Self {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self {
            record: SalesRecord {
                order_id: format!("ORD{:06}", n),
                order_date: date(2024, 1, 15),
                customer_id: "CUST1000".to_string(),
                product_name: "Widget".to_string(),
                category: "Electronics".to_string(),
                quantity: 1,
                unit_price: 10.0,
                total_amount: 10.0,
                discount: 0.0,
                region: "Europe".to_string(),
                payment_method: "Credit Card".to_string(),
                customer_age_group: Some("26-35".to_string()),
            },
        }
    }

    pub fn order_id(mut self, id: &str) -> Self {
        self.record.order_id = id.to_string();
        self
    }

    pub fn date(mut self, year: i32, month: u32, day: u32) -> Self {
        self.record.order_date = date(year, month, day);
        self
    }

    pub fn customer(mut self, id: &str) -> Self {
        self.record.customer_id = id.to_string();
        self
    }

    pub fn product(mut self, name: &str) -> Self {
        self.record.product_name = name.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.record.category = category.to_string();
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.record.quantity = quantity;
        self
    }

    pub fn unit_price(mut self, price: f64) -> Self {
        self.record.unit_price = price;
        self
    }

    pub fn total(mut self, total: f64) -> Self {
        self.record.total_amount = total;
        self
    }

    pub fn discount(mut self, discount: f64) -> Self {
        self.record.discount = discount;
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        self.record.region = region.to_string();
        self
    }

    pub fn payment(mut self, method: &str) -> Self {
        self.record.payment_method = method.to_string();
        self
    }

    pub fn age_group(mut self, group: Option<&str>) -> Self {
        self.record.customer_age_group = group.map(|g| g.to_string());
        self
    }

    pub fn build(self) -> SalesRecord {
        self.record
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for a record with a category and total amount
pub fn record(category: &str, total: f64) -> SalesRecord {
    RecordBuilder::new().category(category).total(total).build()
}

/// Derive cleaned records directly, skipping dedup and outlier capping
pub fn cleaned_set(records: Vec<SalesRecord>) -> CleanedRecordSet {
    CleanedRecordSet::from_records(
        records
            .into_iter()
            .map(|r| derive_record(r, "Unknown"))
            .collect(),
    )
}
