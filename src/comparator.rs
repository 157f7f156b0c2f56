//! Cross-platform comparison.
//!
//! Collapses each platform's analysis into one row of totals, combined
//! figures across platforms, and - only when there is actually something to
//! compare - a best-platform insight.

use serde::Serialize;

use crate::analysis::aggregate::{percentage, round2};
use crate::analysis::{AmazonAnalysis, FlipkartOverview, MeeshoAnalysis};
use crate::schema::Platform;

/// One platform's totals. Unavailable aggregates default to 0.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub platform: Platform,
    pub sales: f64,
    pub tax: f64,
    pub orders: usize,
}

/// Best-performing platform by sales, with its share of combined sales.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonInsight {
    pub best_platform: Platform,
    pub best_sales: f64,
    pub market_share: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    /// One row per platform with data; empty when nothing was uploaded.
    pub rows: Vec<ComparisonRow>,
    pub combined_sales: f64,
    pub combined_tax: f64,
    pub combined_orders: usize,
    /// Present only with two or more platforms and nonzero combined sales.
    /// A single platform is never reported as "100% of itself".
    pub insight: Option<ComparisonInsight>,
}

pub fn compare(
    meesho: Option<&MeeshoAnalysis>,
    amazon: Option<&AmazonAnalysis>,
    flipkart: Option<&FlipkartOverview>,
) -> ComparisonSummary {
    let mut rows = Vec::new();

    if let Some(m) = meesho {
        rows.push(ComparisonRow {
            platform: Platform::Meesho,
            sales: m.total_sales,
            tax: m.total_tax,
            orders: m.total_orders,
        });
    }
    if let Some(a) = amazon {
        rows.push(ComparisonRow {
            platform: Platform::Amazon,
            sales: a.total_sales,
            tax: a.total_tax,
            orders: a.total_shipments,
        });
    }
    if let Some(f) = flipkart {
        // No monetary mapping for Flipkart; it still counts as a platform.
        rows.push(ComparisonRow {
            platform: Platform::Flipkart,
            sales: 0.0,
            tax: 0.0,
            orders: f.total_records,
        });
    }

    let combined_sales = round2(rows.iter().map(|r| r.sales).sum());
    let combined_tax = round2(rows.iter().map(|r| r.tax).sum());
    let combined_orders = rows.iter().map(|r| r.orders).sum();

    let insight = if rows.len() >= 2 {
        rows.iter()
            .max_by(|a, b| a.sales.total_cmp(&b.sales))
            .and_then(|best| {
                percentage(best.sales, combined_sales).map(|share| ComparisonInsight {
                    best_platform: best.platform,
                    best_sales: best.sales,
                    market_share: share,
                })
            })
    } else {
        None
    };

    ComparisonSummary {
        rows,
        combined_sales,
        combined_tax,
        combined_orders,
        insight,
    }
}
