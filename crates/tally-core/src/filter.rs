//! Record filter builder for narrowing a cleaned data set before re-aggregation
//!
//! Each dimension is optional; an unset or empty dimension matches everything.
//! Set dimensions combine with AND, values within a dimension with OR.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{CleanedRecord, CleanedRecordSet};

/// Builder for selecting a subset of cleaned records
///
/// The lifetime `'query` is how long the borrowed value lists must stay valid.
#[derive(Debug, Default, Clone)]
pub struct RecordFilter<'query> {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub categories: Option<&'query [String]>,
    pub regions: Option<&'query [String]>,
    pub payment_methods: Option<&'query [String]>,
}

impl<'query> RecordFilter<'query> {
    /// Create a filter that matches every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an inclusive date range; either end may be open
    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn categories(mut self, categories: Option<&'query [String]>) -> Self {
        self.categories = categories;
        self
    }

    pub fn regions(mut self, regions: Option<&'query [String]>) -> Self {
        self.regions = regions;
        self
    }

    pub fn payment_methods(mut self, methods: Option<&'query [String]>) -> Self {
        self.payment_methods = methods;
        self
    }

    /// True when no dimension restricts anything
    pub fn is_empty(&self) -> bool {
        self.from.is_none()
            && self.to.is_none()
            && self.categories.map_or(true, <[String]>::is_empty)
            && self.regions.map_or(true, <[String]>::is_empty)
            && self.payment_methods.map_or(true, <[String]>::is_empty)
    }

    /// Whether a single record passes every set dimension
    pub fn matches(&self, record: &CleanedRecord) -> bool {
        if self.from.is_some_and(|from| record.order_date < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.order_date > to) {
            return false;
        }
        contains(self.categories, &record.category)
            && contains(self.regions, &record.region)
            && contains(self.payment_methods, &record.payment_method)
    }

    /// Matching records, in their original order
    pub fn apply(&self, records: &CleanedRecordSet) -> CleanedRecordSet {
        let selected: Vec<CleanedRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        debug!(
            input = records.len(),
            selected = selected.len(),
            "Filter applied"
        );
        CleanedRecordSet::from_records(selected)
    }
}

fn contains(allowed: Option<&[String]>, value: &str) -> bool {
    match allowed {
        Some(values) if !values.is_empty() => values.iter().any(|v| v == value),
        _ => true,
    }
}
