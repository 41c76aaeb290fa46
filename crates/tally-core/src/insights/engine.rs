//! Insight Engine - runs the registered rules over one set of aggregates

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{
    AggregateResults, DemographicSummary, GroupSummary, KpiSet, PaymentSummary, ProductSummary,
    TimeAnalysis,
};

use super::leaders::{
    TopCategoryInsight, TopPaymentInsight, TopProductInsight, TopRegionInsight, TopSegmentInsight,
};
use super::seasonality::SeasonalTrendsInsight;
use super::strategy::strategic_sections;
use super::types::{Finding, InsightKind, InsightsReport};

/// Trait for insight rules
pub trait Insight: Send + Sync {
    /// Which fact this rule extracts
    fn kind(&self) -> InsightKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Extract one finding; an empty source table is an EmptyDataset error
    fn extract(&self, results: &AggregateResults) -> Result<Finding>;
}

/// Runs insight rules in registration order
pub struct InsightEngine {
    insights: Vec<Box<dyn Insight>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the six built-in rules
    pub fn new() -> Self {
        let mut engine = Self { insights: vec![] };

        engine.register(Box::new(TopCategoryInsight));
        engine.register(Box::new(TopRegionInsight));
        engine.register(Box::new(TopProductInsight));
        engine.register(Box::new(TopSegmentInsight));
        engine.register(Box::new(TopPaymentInsight));
        engine.register(Box::new(SeasonalTrendsInsight));

        engine
    }

    /// Register an insight rule
    pub fn register(&mut self, insight: Box<dyn Insight>) {
        self.insights.push(insight);
    }

    /// Run every rule; the first failure aborts
    pub fn analyze_all(&self, results: &AggregateResults) -> Result<Vec<Finding>> {
        let mut findings = Vec::with_capacity(self.insights.len());
        for insight in &self.insights {
            let finding = insight.extract(results)?;
            debug!(
                insight = insight.kind().as_str(),
                entity = %finding.entity,
                "Insight extracted"
            );
            findings.push(finding);
        }
        Ok(findings)
    }

    /// Findings plus strategy sections, with copies of the source tables
    pub fn synthesize(&self, results: &AggregateResults) -> Result<InsightsReport> {
        let findings = self.analyze_all(results)?;
        let strategy = strategic_sections(results)?;

        info!(
            findings = findings.len(),
            sections = strategy.len(),
            "Insights synthesized"
        );

        Ok(InsightsReport {
            findings,
            strategy,
            kpis: results.kpis.clone(),
            tables: results.clone(),
        })
    }

    /// Registered rule kinds, in run order
    pub fn insight_kinds(&self) -> Vec<InsightKind> {
        self.insights.iter().map(|i| i.kind()).collect()
    }
}

/// Synthesize a report from the individual analysis tables
pub fn synthesize(
    kpis: &KpiSet,
    by_category: &[GroupSummary],
    by_region: &[GroupSummary],
    by_time: &TimeAnalysis,
    top_products: &[ProductSummary],
    demographics: &[DemographicSummary],
    payments: &[PaymentSummary],
) -> Result<InsightsReport> {
    let results = AggregateResults {
        kpis: kpis.clone(),
        by_category: by_category.to_vec(),
        by_region: by_region.to_vec(),
        by_time: by_time.clone(),
        top_products: top_products.to_vec(),
        demographics: demographics.to_vec(),
        payments: payments.to_vec(),
    };
    synthesize_results(&results)
}

/// Synthesize a report from a full aggregation result
pub fn synthesize_results(results: &AggregateResults) -> Result<InsightsReport> {
    InsightEngine::new().synthesize(results)
}
