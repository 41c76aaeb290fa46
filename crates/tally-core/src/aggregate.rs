//! Grouped sales analyses
//!
//! Every table is built by accumulating running sums into a `BTreeMap` keyed
//! by the grouping tuple, visiting records in their stored order. Groups are
//! then stable-sorted by revenue to the cent (descending), so revenues that
//! report the same keep the key's natural order. Sums stay unrounded until
//! the output rows are built; share columns are apportioned so each table
//! sums to exactly 100.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::models::{
    AggregateResults, CleanedRecord, CleanedRecordSet, DemographicSummary, GroupSummary, KpiSet,
    MonthlySummary, PaymentSummary, ProductSummary, QuarterlySummary, TimeAnalysis,
    YearlySummary,
};
use crate::stats::{apportion_percentages, percentage, round2};

/// Aggregate with the default configuration
pub fn aggregate(records: &CleanedRecordSet) -> Result<AggregateResults> {
    Aggregator::new(AnalysisConfig::default())?.aggregate(records)
}

/// Computes the seven fixed analyses for one configuration
#[derive(Debug, Clone)]
pub struct Aggregator {
    config: AnalysisConfig,
}

impl Aggregator {
    /// Create an aggregator; invalid configuration is rejected here
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run every analysis over a non-empty record set
    pub fn aggregate(&self, records: &CleanedRecordSet) -> Result<AggregateResults> {
        let kpis = calculate_kpis(records)?;

        let results = AggregateResults {
            kpis,
            by_category: by_category(records),
            by_region: by_region(records),
            by_time: by_time(records),
            top_products: top_products(records, self.config.top_n)?,
            demographics: demographics(records),
            payments: payment_methods(records),
        };

        debug!(
            records = records.len(),
            categories = results.by_category.len(),
            regions = results.by_region.len(),
            months = results.by_time.monthly.len(),
            products = results.top_products.len(),
            "Aggregation complete"
        );

        Ok(results)
    }
}

/// Running totals for one group
#[derive(Debug, Default)]
struct Accumulator<'a> {
    revenue: f64,
    orders: usize,
    quantity: u64,
    unit_price_sum: f64,
    customers: HashSet<&'a str>,
}

impl<'a> Accumulator<'a> {
    fn add(&mut self, record: &'a CleanedRecord) {
        self.revenue += record.total_amount;
        self.orders += 1;
        self.quantity += u64::from(record.quantity);
        self.unit_price_sum += record.unit_price;
        self.customers.insert(record.customer_id.as_str());
    }

    /// Revenue at the precision the tables report
    fn revenue_cents(&self) -> i64 {
        (self.revenue * 100.0).round() as i64
    }

    fn mean_revenue(&self) -> f64 {
        if self.orders == 0 {
            0.0
        } else {
            self.revenue / self.orders as f64
        }
    }

    fn mean_unit_price(&self) -> f64 {
        if self.orders == 0 {
            0.0
        } else {
            self.unit_price_sum / self.orders as f64
        }
    }
}

fn group_by<'a, K, F>(records: &'a CleanedRecordSet, key: F) -> BTreeMap<K, Accumulator<'a>>
where
    K: Ord,
    F: Fn(&'a CleanedRecord) -> K,
{
    let mut groups: BTreeMap<K, Accumulator<'a>> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}

/// Stable sort by revenue to the cent, highest first; equal revenues keep key order
fn sort_by_revenue<K>(groups: BTreeMap<K, Accumulator<'_>>) -> Vec<(K, Accumulator<'_>)> {
    let mut sorted: Vec<_> = groups.into_iter().collect();
    sorted.sort_by_key(|(_, acc)| Reverse(acc.revenue_cents()));
    sorted
}

/// Calculate whole-dataset KPIs
pub fn calculate_kpis(records: &CleanedRecordSet) -> Result<KpiSet> {
    if records.is_empty() {
        return Err(Error::EmptyDataset(
            "cannot compute KPIs over zero records".into(),
        ));
    }

    let mut total_revenue = 0.0;
    let mut total_quantity: u64 = 0;
    let mut total_discount = 0.0;
    let mut customers = HashSet::new();
    let mut products = HashSet::new();
    let mut categories = HashSet::new();

    for r in records {
        total_revenue += r.total_amount;
        total_quantity += u64::from(r.quantity);
        total_discount += r.discount;
        customers.insert(r.customer_id.as_str());
        products.insert(r.product_name.as_str());
        categories.insert(r.category.as_str());
    }

    let orders = records.len();
    Ok(KpiSet {
        total_revenue,
        total_orders: orders,
        average_order_value: total_revenue / orders as f64,
        total_quantity,
        average_quantity_per_order: total_quantity as f64 / orders as f64,
        total_discount,
        discount_rate: percentage(total_discount, total_revenue),
        unique_customers: customers.len(),
        unique_products: products.len(),
        unique_categories: categories.len(),
    })
}

fn single_key_summary(groups: BTreeMap<&str, Accumulator<'_>>) -> Vec<GroupSummary> {
    // Apportioned in key order, so equal remainders go to the smaller key
    let revenues: Vec<f64> = groups.values().map(|g| g.revenue).collect();
    let shares = apportion_percentages(&revenues);

    let mut rows: Vec<_> = groups.into_iter().zip(shares).collect();
    rows.sort_by_key(|((_, acc), _)| Reverse(acc.revenue_cents()));

    rows.into_iter()
        .map(|((key, acc), share)| GroupSummary {
            key: key.to_string(),
            total_revenue: round2(acc.revenue),
            avg_order_value: round2(acc.mean_revenue()),
            order_count: acc.orders,
            total_quantity: acc.quantity,
            revenue_share: share,
        })
        .collect()
}

/// Revenue by product category
pub fn by_category(records: &CleanedRecordSet) -> Vec<GroupSummary> {
    single_key_summary(group_by(records, |r| r.category.as_str()))
}

/// Revenue by region
pub fn by_region(records: &CleanedRecordSet) -> Vec<GroupSummary> {
    single_key_summary(group_by(records, |r| r.region.as_str()))
}

/// Monthly, quarterly and yearly revenue in chronological order
///
/// Periods without orders are absent rather than zero-filled.
pub fn by_time(records: &CleanedRecordSet) -> TimeAnalysis {
    let monthly = group_by(records, |r| (r.year, r.month))
        .into_iter()
        .map(|((year, month), acc)| MonthlySummary {
            year,
            month,
            revenue: round2(acc.revenue),
            orders: acc.orders,
            quantity: acc.quantity,
        })
        .collect();

    let quarterly = group_by(records, |r| (r.year, r.quarter))
        .into_iter()
        .map(|((year, quarter), acc)| QuarterlySummary {
            year,
            quarter,
            revenue: round2(acc.revenue),
            orders: acc.orders,
            quantity: acc.quantity,
        })
        .collect();

    let yearly = group_by(records, |r| r.year)
        .into_iter()
        .map(|(year, acc)| YearlySummary {
            year,
            revenue: round2(acc.revenue),
            orders: acc.orders,
            quantity: acc.quantity,
        })
        .collect();

    TimeAnalysis {
        monthly,
        quarterly,
        yearly,
    }
}

/// Best-selling (product, category) pairs, truncated to `top_n`
///
/// The same product name under two categories is two distinct rows.
pub fn top_products(records: &CleanedRecordSet, top_n: usize) -> Result<Vec<ProductSummary>> {
    if top_n == 0 {
        return Err(Error::Configuration(
            "top_n must be greater than zero".into(),
        ));
    }

    let groups = group_by(records, |r| (r.product_name.as_str(), r.category.as_str()));
    Ok(sort_by_revenue(groups)
        .into_iter()
        .take(top_n)
        .map(|((product, category), acc)| ProductSummary {
            product_name: product.to_string(),
            category: category.to_string(),
            total_revenue: round2(acc.revenue),
            order_count: acc.orders,
            total_quantity: acc.quantity,
            avg_price: round2(acc.mean_unit_price()),
        })
        .collect())
}

/// Revenue by customer age group (the missing-value sentinel is its own group)
pub fn demographics(records: &CleanedRecordSet) -> Vec<DemographicSummary> {
    let groups = group_by(records, |r| r.customer_age_group.as_str());
    sort_by_revenue(groups)
        .into_iter()
        .map(|(group, acc)| DemographicSummary {
            age_group: group.to_string(),
            unique_customers: acc.customers.len(),
            total_revenue: round2(acc.revenue),
            avg_order_value: round2(acc.mean_revenue()),
            total_orders: acc.orders,
        })
        .collect()
}

/// Revenue and usage share by payment method
///
/// Ordered by revenue, then usage, then method name.
pub fn payment_methods(records: &CleanedRecordSet) -> Vec<PaymentSummary> {
    let groups = group_by(records, |r| r.payment_method.as_str());
    let orders: Vec<f64> = groups.values().map(|g| g.orders as f64).collect();
    let usage = apportion_percentages(&orders);

    let mut rows: Vec<_> = groups.into_iter().zip(usage).collect();
    // Stable: equal revenue and usage keep name order
    rows.sort_by_key(|((_, acc), _)| (Reverse(acc.revenue_cents()), Reverse(acc.orders)));

    rows.into_iter()
        .map(|((method, acc), usage_share)| PaymentSummary {
            payment_method: method.to_string(),
            total_revenue: round2(acc.revenue),
            transaction_count: acc.orders,
            order_count: acc.orders,
            usage_share,
        })
        .collect()
}
