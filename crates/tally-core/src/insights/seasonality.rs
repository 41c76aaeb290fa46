//! Seasonal trends insight
//!
//! Picks the best and worst months from the chronological monthly table. On
//! equal revenue the earliest month wins.

use crate::error::{Error, Result};
use crate::export::format_currency;
use crate::models::{AggregateResults, MonthlySummary};

use super::engine::Insight;
use super::types::{Finding, InsightKind, SeasonalData};

pub struct SeasonalTrendsInsight;

/// (best, worst) months; ties keep the first month encountered
pub fn month_extremes(monthly: &[MonthlySummary]) -> Option<(&MonthlySummary, &MonthlySummary)> {
    let first = monthly.first()?;
    let mut best = first;
    let mut worst = first;
    for month in &monthly[1..] {
        if month.revenue > best.revenue {
            best = month;
        }
        if month.revenue < worst.revenue {
            worst = month;
        }
    }
    Some((best, worst))
}

impl Insight for SeasonalTrendsInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::SeasonalTrends
    }

    fn name(&self) -> &'static str {
        "Seasonal Trends"
    }

    fn extract(&self, results: &AggregateResults) -> Result<Finding> {
        let monthly = &results.by_time.monthly;
        let (best, worst) = month_extremes(monthly)
            .ok_or_else(|| Error::EmptyDataset("monthly table is empty".into()))?;

        let data = SeasonalData {
            best_month: best.label(),
            best_revenue: best.revenue,
            worst_month: worst.label(),
            worst_revenue: worst.revenue,
        };

        Ok(Finding::new(
            self.kind(),
            "SEASONAL TRENDS",
            best.label(),
            "Plan inventory and promotions around peak months",
        )
        .with_fact(format!(
            "Best Month: {} (Revenue: {})",
            best.label(),
            format_currency(best.revenue)
        ))
        .with_fact(format!(
            "Worst Month: {} (Revenue: {})",
            worst.label(),
            format_currency(worst.revenue)
        ))
        .with_data(serde_json::to_value(&data)?))
    }
}
