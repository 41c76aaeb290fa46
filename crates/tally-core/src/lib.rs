//! Tally Core Library
//!
//! Cleaning, aggregation and insight synthesis for tabular sales records:
//! - CSV import into a validated record set
//! - Cleaning (missing age groups, duplicate rows, IQR outlier capping)
//! - Grouped analyses along category, region, time, product, demographic and
//!   payment-method axes, plus whole-dataset KPIs
//! - Insight extraction and templated strategy recommendations
//! - Rendering of results to CSV, JSON and plain text
//!
//! The library works on in-memory values only; reading and writing files is
//! left to the caller.

pub mod aggregate;
pub mod clean;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod import;
pub mod insights;
pub mod models;
pub mod profile;
pub mod stats;

/// Record builders for unit tests
#[cfg(test)]
mod test_utils;

pub use aggregate::{
    aggregate, by_category, by_region, by_time, calculate_kpis, demographics, payment_methods,
    top_products, Aggregator,
};
pub use clean::{clean, Cleaner};
pub use config::{load_config, AnalysisConfig};
pub use error::{Error, Result};
pub use filter::RecordFilter;
pub use import::parse_csv;
pub use insights::{synthesize, synthesize_results, Finding, InsightKind, InsightsReport};
pub use models::{
    AggregateResults, CleanedRecord, CleanedRecordSet, CleaningReport, DemographicSummary,
    GroupSummary, KpiSet, MonthlySummary, OutlierBounds, PaymentSummary, ProductSummary,
    QuarterlySummary, RecordSet, SalesRecord, TimeAnalysis, YearlySummary,
};
pub use profile::{profile, DatasetProfile};
