//! Insights synthesis
//!
//! Turns aggregate tables into a narrative report. Each fact comes from a
//! pluggable rule that reads the leading row of an already-ranked table.
//!
//! ## Built-in rules
//!
//! - **Top category / region / product / segment / payment method**
//! - **Seasonal trends** - best and worst months
//!
//! Strategy sections are templated from the same tables and the KPIs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::insights::synthesize_results;
//!
//! let results = tally_core::aggregate(&cleaned)?;
//! let report = synthesize_results(&results)?;
//! ```

pub mod engine;
pub mod leaders;
pub mod seasonality;
pub mod strategy;
pub mod types;

pub use engine::{synthesize, synthesize_results, Insight, InsightEngine};
pub use leaders::{
    TopCategoryInsight, TopPaymentInsight, TopProductInsight, TopRegionInsight, TopSegmentInsight,
};
pub use seasonality::{month_extremes, SeasonalTrendsInsight};
pub use strategy::strategic_sections;
pub use types::{
    Finding, InsightKind, InsightsReport, LeaderData, SeasonalData, StrategicSection,
};
