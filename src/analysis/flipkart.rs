//! Flipkart GSTR-1 overview.
//!
//! No column mapping exists for this export format yet, so analysis is
//! limited to structure inspection: record count, column profile, and a
//! small head preview. Sales and tax default to 0 in the cross-platform
//! comparison until a mapping lands.

use polars::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

use super::frame_records;

const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlipkartOverview {
    pub total_records: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnProfile>,
    /// First few rows as JSON objects, for the "data structure" panel.
    pub preview: Vec<Map<String, Value>>,
}

pub fn analyze_flipkart(df: &DataFrame) -> FlipkartOverview {
    let columns: Vec<ColumnProfile> = df
        .schema()
        .iter_fields()
        .map(|field| ColumnProfile {
            name: field.name().to_string(),
            dtype: format!("{:?}", field.data_type()),
        })
        .collect();

    FlipkartOverview {
        total_records: df.height(),
        column_count: columns.len(),
        columns,
        preview: frame_records(&df.head(Some(PREVIEW_ROWS))),
    }
}
