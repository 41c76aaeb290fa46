//! Leader insights
//!
//! Each rule reads the first row of an aggregate table that is already sorted
//! by revenue, so the leader is whatever the aggregator ranked first.

use crate::error::{Error, Result};
use crate::export::{format_count, format_currency};
use crate::models::AggregateResults;

use super::engine::Insight;
use super::types::{Finding, InsightKind, LeaderData};

/// First row of a table, or EmptyDataset naming the table
pub(crate) fn leader<'a, T>(table: &'a [T], name: &str) -> Result<&'a T> {
    table
        .first()
        .ok_or_else(|| Error::EmptyDataset(format!("{} table is empty", name)))
}

fn to_data(data: &LeaderData) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(data)?)
}

/// Highest-revenue category
pub struct TopCategoryInsight;

impl Insight for TopCategoryInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::TopCategory
    }

    fn name(&self) -> &'static str {
        "Top Category"
    }

    fn extract(&self, results: &AggregateResults) -> Result<Finding> {
        let top = leader(&results.by_category, "category")?;
        let data = LeaderData {
            entity: top.key.clone(),
            revenue: top.total_revenue,
            revenue_share: Some(top.revenue_share),
            orders: Some(top.order_count),
            customers: None,
            usage_share: None,
        };

        Ok(Finding::new(
            self.kind(),
            "TOP PERFORMING CATEGORY",
            &top.key,
            format!("Focus marketing efforts and inventory on {}", top.key),
        )
        .with_fact(format!(
            "Revenue: {} ({:.2}% of total)",
            format_currency(top.total_revenue),
            top.revenue_share
        ))
        .with_fact(format!("Orders: {}", format_count(top.order_count as u64)))
        .with_data(to_data(&data)?))
    }
}

/// Highest-revenue region
pub struct TopRegionInsight;

impl Insight for TopRegionInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::TopRegion
    }

    fn name(&self) -> &'static str {
        "Top Region"
    }

    fn extract(&self, results: &AggregateResults) -> Result<Finding> {
        let top = leader(&results.by_region, "region")?;
        let data = LeaderData {
            entity: top.key.clone(),
            revenue: top.total_revenue,
            revenue_share: Some(top.revenue_share),
            orders: Some(top.order_count),
            customers: None,
            usage_share: None,
        };

        Ok(Finding::new(
            self.kind(),
            "TOP PERFORMING REGION",
            &top.key,
            format!(
                "Expand presence in {} and replicate success strategies",
                top.key
            ),
        )
        .with_fact(format!(
            "Revenue: {} ({:.2}% of total)",
            format_currency(top.total_revenue),
            top.revenue_share
        ))
        .with_data(to_data(&data)?))
    }
}

/// Highest-revenue product
pub struct TopProductInsight;

impl Insight for TopProductInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::TopProduct
    }

    fn name(&self) -> &'static str {
        "Top Product"
    }

    fn extract(&self, results: &AggregateResults) -> Result<Finding> {
        let top = leader(&results.top_products, "top products")?;
        let data = LeaderData {
            entity: top.product_name.clone(),
            revenue: top.total_revenue,
            revenue_share: None,
            orders: Some(top.order_count),
            customers: None,
            usage_share: None,
        };

        Ok(Finding::new(
            self.kind(),
            "TOP PRODUCT",
            &top.product_name,
            "Ensure adequate stock and consider bundling opportunities",
        )
        .with_fact(format!("Category: {}", top.category))
        .with_fact(format!("Revenue: {}", format_currency(top.total_revenue)))
        .with_fact(format!("Orders: {}", format_count(top.order_count as u64)))
        .with_data(to_data(&data)?))
    }
}

/// Highest-revenue customer age group
pub struct TopSegmentInsight;

impl Insight for TopSegmentInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::TopSegment
    }

    fn name(&self) -> &'static str {
        "Primary Customer Segment"
    }

    fn extract(&self, results: &AggregateResults) -> Result<Finding> {
        let top = leader(&results.demographics, "demographics")?;
        let data = LeaderData {
            entity: top.age_group.clone(),
            revenue: top.total_revenue,
            revenue_share: None,
            orders: Some(top.total_orders),
            customers: Some(top.unique_customers),
            usage_share: None,
        };

        Ok(Finding::new(
            self.kind(),
            "PRIMARY CUSTOMER SEGMENT",
            &top.age_group,
            format!(
                "Tailor marketing campaigns and product recommendations for {}",
                top.age_group
            ),
        )
        .with_fact(format!("Revenue: {}", format_currency(top.total_revenue)))
        .with_fact(format!(
            "Customers: {}",
            format_count(top.unique_customers as u64)
        ))
        .with_data(to_data(&data)?))
    }
}

/// Highest-revenue payment method
pub struct TopPaymentInsight;

impl Insight for TopPaymentInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::TopPaymentMethod
    }

    fn name(&self) -> &'static str {
        "Preferred Payment Method"
    }

    fn extract(&self, results: &AggregateResults) -> Result<Finding> {
        let top = leader(&results.payments, "payment methods")?;
        let data = LeaderData {
            entity: top.payment_method.clone(),
            revenue: top.total_revenue,
            revenue_share: None,
            orders: Some(top.order_count),
            customers: None,
            usage_share: Some(top.usage_share),
        };

        Ok(Finding::new(
            self.kind(),
            "PREFERRED PAYMENT METHOD",
            &top.payment_method,
            format!(
                "Ensure seamless {} experience and consider incentives",
                top.payment_method
            ),
        )
        .with_fact(format!("Usage: {:.2}% of all transactions", top.usage_share))
        .with_fact(format!("Revenue: {}", format_currency(top.total_revenue)))
        .with_data(to_data(&data)?))
    }
}
