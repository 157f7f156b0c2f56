//! Multi-platform e-commerce GST analytics core.
//!
//! Ingests marketplace export files (Meesho, Amazon MTR, Flipkart GSTR-1),
//! computes aggregate financial and tax metrics, and hands named scalars and
//! grouped tables to a presentation layer. The rendering side (uploads,
//! tabs, charts) lives in the host application; this crate owns loading,
//! normalization, aggregation, and cross-platform comparison only.

pub mod analysis;
pub mod comparator;
pub mod data_utils;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod schema;

pub use analysis::{AmazonAnalysis, FlipkartOverview, GroupedTable, MeeshoAnalysis};
pub use comparator::{compare, ComparisonInsight, ComparisonRow, ComparisonSummary};
pub use error::{AnalyticsError, Result};
pub use loader::{load_optional, load_table, load_table_from_path, OptionalLoad};
pub use pipeline::{run, DashboardReport, LoadNote, PlatformTables, Severity, UploadSet};
pub use schema::{Platform, PlatformSchema};
