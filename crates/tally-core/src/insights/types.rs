//! Core types for the insights synthesizer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{AggregateResults, KpiSet};

/// The fixed set of facts the synthesizer extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Highest-revenue product category
    TopCategory,
    /// Highest-revenue region
    TopRegion,
    /// Highest-revenue (product, category) pair
    TopProduct,
    /// Highest-revenue customer age group
    TopSegment,
    /// Highest-revenue payment method
    TopPaymentMethod,
    /// Best and worst calendar months
    SeasonalTrends,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::TopCategory => "top_category",
            InsightKind::TopRegion => "top_region",
            InsightKind::TopProduct => "top_product",
            InsightKind::TopSegment => "top_segment",
            InsightKind::TopPaymentMethod => "top_payment_method",
            InsightKind::SeasonalTrends => "seasonal_trends",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_category" => Ok(InsightKind::TopCategory),
            "top_region" => Ok(InsightKind::TopRegion),
            "top_product" => Ok(InsightKind::TopProduct),
            "top_segment" => Ok(InsightKind::TopSegment),
            "top_payment_method" => Ok(InsightKind::TopPaymentMethod),
            "seasonal_trends" => Ok(InsightKind::SeasonalTrends),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// One extracted fact with its recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule that produced this finding
    pub kind: InsightKind,
    /// Heading (e.g., "TOP PERFORMING CATEGORY")
    pub title: String,
    /// The entity the fact is about (e.g., "Electronics", "2024-03")
    pub entity: String,
    /// Supporting figures, one line each (e.g., "Orders: 1,204")
    pub facts: Vec<String>,
    pub recommendation: String,
    /// Rule-specific structured data
    pub data: serde_json::Value,
}

impl Finding {
    pub fn new(
        kind: InsightKind,
        title: impl Into<String>,
        entity: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            entity: entity.into(),
            facts: Vec::new(),
            recommendation: recommendation.into(),
            data: serde_json::Value::Null,
        }
    }

    /// Append a supporting figure
    pub fn with_fact(mut self, fact: impl Into<String>) -> Self {
        self.facts.push(fact.into());
        self
    }

    /// Add structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// Data for the single-entity leader findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderData {
    pub entity: String,
    pub revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_share: Option<f64>,
}

/// Data for the seasonal trends finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalData {
    pub best_month: String,
    pub best_revenue: f64,
    pub worst_month: String,
    pub worst_revenue: f64,
}

/// A titled group of templated recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicSection {
    pub title: String,
    pub points: Vec<String>,
}

/// Everything the synthesizer produces for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    /// Findings in rule order
    pub findings: Vec<Finding>,
    pub strategy: Vec<StrategicSection>,
    pub kpis: KpiSet,
    /// Copies of every aggregate table the findings were drawn from
    pub tables: AggregateResults,
}

impl InsightsReport {
    /// Look up the finding produced by a rule
    pub fn finding(&self, kind: InsightKind) -> Option<&Finding> {
        self.findings.iter().find(|f| f.kind == kind)
    }
}
