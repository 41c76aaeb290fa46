//! Record cleaning
//!
//! Applies, in order:
//! 1. Missing customer age groups replaced with the sentinel label
//! 2. Exact duplicate rows removed (first occurrence kept)
//! 3. `total_amount` clamped to the IQR fences (rows are never dropped)
//! 4. Derived calendar and revenue columns added

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::models::{
    CleanedRecord, CleanedRecordSet, CleaningReport, OutlierBounds, RecordSet, SalesRecord,
};
use crate::stats::quantile_sorted;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Clean with the default configuration
pub fn clean(records: RecordSet) -> Result<(CleanedRecordSet, CleaningReport)> {
    Cleaner::new(AnalysisConfig::default())?.clean(records)
}

/// Applies the cleaning rules of one analysis configuration
#[derive(Debug, Clone)]
pub struct Cleaner {
    config: AnalysisConfig,
}

impl Cleaner {
    /// Create a cleaner; invalid configuration is rejected here
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Clean a record set, returning the cleaned records and what was changed
    pub fn clean(&self, records: RecordSet) -> Result<(CleanedRecordSet, CleaningReport)> {
        if records.is_empty() {
            return Err(Error::EmptyDataset(
                "cleaning received zero records".into(),
            ));
        }

        let mut report = CleaningReport {
            input_rows: records.len(),
            ..Default::default()
        };

        let mut rows = records.into_records();

        report.missing_filled = self.fill_missing(&mut rows);
        debug!(filled = report.missing_filled, "Filled missing age groups");

        let before = rows.len();
        let mut rows = remove_duplicates(rows);
        report.duplicates_removed = before - rows.len();
        debug!(removed = report.duplicates_removed, "Removed duplicate rows");

        let (bounds, capped) = cap_outliers(&mut rows, self.config.iqr_multiplier);
        report.bounds = bounds;
        report.outliers_capped = capped;
        if let Some(b) = bounds {
            debug!(
                q1 = b.q1,
                q3 = b.q3,
                lower = b.lower,
                upper = b.upper,
                capped,
                "Capped outliers in Total_Amount"
            );
        }

        let cleaned: Vec<CleanedRecord> = rows
            .into_iter()
            .map(|r| derive_record(r, &self.config.unknown_label))
            .collect();
        report.output_rows = cleaned.len();

        info!(
            input = report.input_rows,
            output = report.output_rows,
            missing_filled = report.missing_filled,
            duplicates_removed = report.duplicates_removed,
            outliers_capped = report.outliers_capped,
            "Cleaning complete"
        );

        Ok((CleanedRecordSet::from_records(cleaned), report))
    }

    fn fill_missing(&self, rows: &mut [SalesRecord]) -> usize {
        let mut filled = 0;
        for row in rows.iter_mut() {
            let missing = row
                .customer_age_group
                .as_deref()
                .map_or(true, |g| g.trim().is_empty());
            if missing {
                row.customer_age_group = Some(self.config.unknown_label.clone());
                filled += 1;
            }
        }
        filled
    }
}

/// Generate a fingerprint covering every field of a record
///
/// Records carry `f64` fields, so they cannot derive `Hash`/`Eq`; duplicate
/// removal keys on this digest of their canonical bytes instead.
///
/// Strings are length-prefixed so adjacent fields cannot run together;
/// `-0.0` is normalized to `0.0` so numerically equal rows match.
pub fn row_fingerprint(record: &SalesRecord) -> String {
    fn put_str(hasher: &mut Sha256, s: &str) {
        hasher.update((s.len() as u64).to_be_bytes());
        hasher.update(s.as_bytes());
    }

    let mut hasher = Sha256::new();
    put_str(&mut hasher, &record.order_id);
    put_str(&mut hasher, &record.order_date.to_string());
    put_str(&mut hasher, &record.customer_id);
    put_str(&mut hasher, &record.product_name);
    put_str(&mut hasher, &record.category);
    hasher.update(record.quantity.to_be_bytes());
    hasher.update((record.unit_price + 0.0).to_be_bytes());
    hasher.update((record.total_amount + 0.0).to_be_bytes());
    hasher.update((record.discount + 0.0).to_be_bytes());
    put_str(&mut hasher, &record.region);
    put_str(&mut hasher, &record.payment_method);
    match &record.customer_age_group {
        Some(group) => {
            hasher.update([1u8]);
            put_str(&mut hasher, group);
        }
        None => hasher.update([0u8]),
    }
    hex::encode(hasher.finalize())
}

fn remove_duplicates(rows: Vec<SalesRecord>) -> Vec<SalesRecord> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|r| seen.insert(row_fingerprint(r)))
        .collect()
}

/// Compute the IQR fences over `total_amount` and clamp values outside them
fn cap_outliers(rows: &mut [SalesRecord], multiplier: f64) -> (Option<OutlierBounds>, usize) {
    let mut totals: Vec<f64> = rows.iter().map(|r| r.total_amount).collect();
    totals.sort_by(|a, b| a.total_cmp(b));

    let (Some(q1), Some(q3)) = (quantile_sorted(&totals, 0.25), quantile_sorted(&totals, 0.75))
    else {
        return (None, 0);
    };
    let iqr = q3 - q1;
    let bounds = OutlierBounds {
        q1,
        q3,
        iqr,
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    };

    let mut capped = 0;
    for row in rows.iter_mut() {
        if row.total_amount < bounds.lower {
            row.total_amount = bounds.lower;
            capped += 1;
        } else if row.total_amount > bounds.upper {
            row.total_amount = bounds.upper;
            capped += 1;
        }
    }

    (Some(bounds), capped)
}

/// Attach derived columns to a record whose age group has been resolved
pub(crate) fn derive_record(record: SalesRecord, unknown_label: &str) -> CleanedRecord {
    let date = record.order_date;
    let month = date.month();
    let revenue_after_discount = record.total_amount - record.discount;

    CleanedRecord {
        customer_age_group: record
            .customer_age_group
            .unwrap_or_else(|| unknown_label.to_string()),
        order_id: record.order_id,
        order_date: date,
        customer_id: record.customer_id,
        product_name: record.product_name,
        category: record.category,
        quantity: record.quantity,
        unit_price: record.unit_price,
        total_amount: record.total_amount,
        discount: record.discount,
        region: record.region,
        payment_method: record.payment_method,
        year: date.year(),
        month,
        month_name: month_name(month).to_string(),
        quarter: quarter_of(date),
        day_of_week: weekday_name(date.weekday()).to_string(),
        revenue_after_discount,
    }
}

/// English month name for 1-12
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

/// Calendar quarter (1-4) of a date
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// English weekday name
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, record, RecordBuilder};

    fn totals(set: &CleanedRecordSet) -> Vec<f64> {
        set.iter().map(|r| r.total_amount).collect()
    }

    #[test]
    fn test_iqr_clamps_high_outlier() {
        let records = [10.0, 20.0, 30.0, 1000.0, 15.0]
            .iter()
            .map(|&t| record("Books", t))
            .collect();
        let (cleaned, report) = clean(RecordSet::new(records).unwrap()).unwrap();

        assert_eq!(totals(&cleaned), vec![10.0, 20.0, 30.0, 52.5, 15.0]);
        assert_eq!(report.outliers_capped, 1);
        let bounds = report.bounds.unwrap();
        assert_eq!(bounds.q1, 15.0);
        assert_eq!(bounds.q3, 30.0);
        assert_eq!(bounds.iqr, 15.0);
        assert_eq!(bounds.upper, 52.5);
        assert_eq!(bounds.lower, -7.5);
        assert_eq!(totals(&cleaned).iter().sum::<f64>(), 127.5);
    }

    #[test]
    fn test_iqr_clamps_low_outlier() {
        let records = [100.0, 101.0, 102.0, 103.0, 1.0]
            .iter()
            .map(|&t| record("Books", t))
            .collect();
        let (cleaned, report) = clean(RecordSet::new(records).unwrap()).unwrap();

        // Q1 = 100, Q3 = 102, IQR = 2, lower fence = 97
        assert_eq!(report.outliers_capped, 1);
        assert_eq!(cleaned.records()[4].total_amount, 97.0);
    }

    #[test]
    fn test_clamping_never_drops_rows() {
        let records: Vec<_> = [1.0, 2.0, 3.0, 4.0, 500.0, 900.0, 0.0]
            .iter()
            .map(|&t| record("Toys", t))
            .collect();
        let input_len = records.len();
        let (cleaned, report) = clean(RecordSet::new(records).unwrap()).unwrap();

        assert!(report.outliers_capped > 0);
        assert_eq!(cleaned.len(), input_len - report.duplicates_removed);
        assert_eq!(report.output_rows, cleaned.len());
    }

    #[test]
    fn test_exact_duplicates_removed() {
        let rec = record("Books", 25.0);
        let other = record("Books", 30.0);
        let set = RecordSet::new(vec![rec.clone(), other.clone(), rec.clone()]).unwrap();

        let (cleaned, report) = clean(set).unwrap();
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.records()[0].order_id, rec.order_id);
        assert_eq!(cleaned.records()[1].order_id, other.order_id);
    }

    #[test]
    fn test_same_order_id_different_fields_is_kept() {
        let a = RecordBuilder::new().order_id("ORD1").total(10.0).build();
        let b = RecordBuilder::new().order_id("ORD1").total(11.0).build();
        let (cleaned, report) = clean(RecordSet::new(vec![a, b]).unwrap()).unwrap();
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_missing_fill_happens_before_dedup() {
        let base = RecordBuilder::new().order_id("ORD-X").age_group(None).build();
        let mut filled = base.clone();
        filled.customer_age_group = Some("Unknown".to_string());

        let (cleaned, report) = clean(RecordSet::new(vec![base, filled]).unwrap()).unwrap();
        assert_eq!(report.missing_filled, 1);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(cleaned.records()[0].customer_age_group, "Unknown");
    }

    #[test]
    fn test_custom_sentinel_label() {
        let config = AnalysisConfig::default().with_unknown_label("N/A");
        let rec = RecordBuilder::new().age_group(None).build();
        let (cleaned, _) = Cleaner::new(config)
            .unwrap()
            .clean(RecordSet::new(vec![rec]).unwrap())
            .unwrap();
        assert_eq!(cleaned.records()[0].customer_age_group, "N/A");
    }

    #[test]
    fn test_derived_columns() {
        let rec = RecordBuilder::new()
            .date(2024, 8, 3)
            .total(120.0)
            .discount(20.0)
            .build();
        let (cleaned, _) = clean(RecordSet::new(vec![rec]).unwrap()).unwrap();
        let r = &cleaned.records()[0];

        assert_eq!(r.year, 2024);
        assert_eq!(r.month, 8);
        assert_eq!(r.month_name, "August");
        assert_eq!(r.quarter, 3);
        assert_eq!(r.day_of_week, "Saturday");
        assert_eq!(r.revenue_after_discount, 100.0);
    }

    #[test]
    fn test_derived_revenue_uses_clamped_total() {
        let mut records: Vec<_> = [10.0, 20.0, 30.0, 15.0]
            .iter()
            .map(|&t| record("Books", t))
            .collect();
        records.push(RecordBuilder::new().category("Books").total(1000.0).discount(2.5).build());
        let (cleaned, _) = clean(RecordSet::new(records).unwrap()).unwrap();
        assert_eq!(cleaned.records()[4].revenue_after_discount, 50.0);
    }

    #[test]
    fn test_clean_is_idempotent_on_clean_data() {
        let records = vec![
            RecordBuilder::new().date(2024, 1, 2).total(10.0).build(),
            RecordBuilder::new().date(2024, 2, 3).total(12.0).build(),
            RecordBuilder::new().date(2024, 3, 4).total(14.0).build(),
            RecordBuilder::new().date(2024, 4, 5).total(16.0).build(),
        ];
        let (first, first_report) = clean(RecordSet::new(records).unwrap()).unwrap();
        assert!(first_report.is_noop());

        let (second, second_report) = clean(first.to_record_set()).unwrap();
        assert!(second_report.is_noop());
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_record_is_untouched() {
        let (cleaned, report) = clean(RecordSet::new(vec![record("Books", 42.0)]).unwrap()).unwrap();
        assert_eq!(report.outliers_capped, 0);
        assert_eq!(cleaned.records()[0].total_amount, 42.0);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = clean(RecordSet::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset(_)));
    }

    #[test]
    fn test_invalid_config_rejected_before_cleaning() {
        let config = AnalysisConfig::default().with_iqr_multiplier(-1.0);
        assert!(matches!(Cleaner::new(config), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_zero_multiplier_clamps_to_quartiles() {
        let config = AnalysisConfig::default().with_iqr_multiplier(0.0);
        let records = [1.0, 2.0, 3.0, 4.0, 5.0]
            .iter()
            .map(|&t| record("Books", t))
            .collect();
        let (cleaned, report) = Cleaner::new(config)
            .unwrap()
            .clean(RecordSet::new(records).unwrap())
            .unwrap();
        assert_eq!(totals(&cleaned), vec![2.0, 2.0, 3.0, 4.0, 4.0]);
        assert_eq!(report.outliers_capped, 2);
    }

    #[test]
    fn test_fingerprint_treats_negative_zero_as_zero() {
        let a = RecordBuilder::new().order_id("A").discount(0.0).build();
        let mut b = a.clone();
        b.discount = -0.0;
        assert_eq!(row_fingerprint(&a), row_fingerprint(&b));
    }

    #[test]
    fn test_calendar_helpers() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(quarter_of(date(2024, 3, 31)), 1);
        assert_eq!(quarter_of(date(2024, 4, 1)), 2);
        assert_eq!(quarter_of(date(2024, 12, 31)), 4);
        assert_eq!(weekday_name(date(2024, 1, 15).weekday()), "Monday");
    }
}
