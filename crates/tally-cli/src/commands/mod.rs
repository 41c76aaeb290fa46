//! CLI command implementations
//!
//! Commands are organized by task:
//! - `analyze` - Full pipeline writing cleaned data and reports
//! - `clean` - Clean a file and optionally save the result
//! - `core` - Shared utilities (config resolution, loading, output)
//! - `info` - Dataset profile
//! - `insights` - Insights report
//! - `reports` - Single-table reports and the shared table printers

pub mod analyze;
pub mod clean;
pub mod core;
pub mod info;
pub mod insights;
pub mod reports;

// Re-export command functions for main.rs
pub use analyze::*;
pub use clean::*;
pub use core::*;
pub use info::*;
pub use insights::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
