//! Grouped-sum core shared by every platform analyzer.
//!
//! All aggregation in this crate is a single shape: group an in-memory table
//! by one categorical key and sum a handful of numeric columns. Missing
//! columns degrade (absent grouped table, zero scalar) instead of failing,
//! so one malformed export never takes down the rest of an analysis.

use crate::error::Result;
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use tracing::debug;

use super::GroupedTable;

/// Round to the 2-decimal contract used for every reported sum.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator * 100`, or `None` when the denominator is zero.
/// The undefined case must reach the rendering layer explicitly; it must
/// never raise or produce an infinity.
pub fn percentage(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(round2(numerator / denominator * 100.0))
}

/// Sum one column to a scalar. An absent column (or a platform with no such
/// column at all) contributes 0 rather than an error.
pub fn scalar_sum(df: &DataFrame, column: Option<&str>) -> f64 {
    let Some(name) = column else {
        return 0.0;
    };
    let Ok(col_data) = df.column(name) else {
        debug!(column = name, "column absent, scalar degrades to 0");
        return 0.0;
    };
    let Ok(as_float) = col_data.cast(&DataType::Float64) else {
        return 0.0;
    };
    let sum = as_float
        .f64()
        .map(|ca| ca.sum().unwrap_or(0.0))
        .unwrap_or(0.0);
    round2(sum)
}

/// Group `df` by `key` and sum every value column that is actually present,
/// rounded to 2 decimals, sorted ascending by key with nulls last.
///
/// Rows with a null group key are preserved as their own group. Returns
/// `Ok(None)` when the key column is absent or none of the value columns
/// exist - a degraded aggregate, not an error.
pub fn grouped_sum(
    df: &DataFrame,
    key: Option<&str>,
    value_columns: &[&str],
) -> Result<Option<GroupedTable>> {
    let Some(key) = key else {
        return Ok(None);
    };
    if df.column(key).is_err() {
        debug!(column = key, "grouping column absent, aggregate unavailable");
        return Ok(None);
    }

    let agg_exprs: Vec<Expr> = value_columns
        .iter()
        .filter(|c| df.column(c).is_ok())
        .map(|c| col(c).cast(DataType::Float64).sum().round(2).alias(c))
        .collect();
    if agg_exprs.is_empty() {
        return Ok(None);
    }

    let frame = df
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg(agg_exprs)
        .sort([key], SortMultipleOptions::default().with_nulls_last(true))
        .collect()?;

    Ok(Some(GroupedTable {
        key: key.to_string(),
        frame,
    }))
}

/// Derive a `month` column (`YYYY-MM`) from a `Date` column and group by it.
/// Present only when the date column is available; rows whose date failed the
/// permissive parse fall into the null month group.
pub fn monthly_grouped(
    df: &DataFrame,
    date_column: Option<&str>,
    value_columns: &[&str],
) -> Result<Option<GroupedTable>> {
    let Some(date_column) = date_column else {
        return Ok(None);
    };
    let Ok(col_data) = df.column(date_column) else {
        debug!(column = date_column, "date column absent, monthly aggregate unavailable");
        return Ok(None);
    };
    if !matches!(col_data.dtype(), DataType::Date) {
        return Ok(None);
    }

    let months: Vec<Option<String>> = col_data
        .date()?
        .into_iter()
        .map(|opt_days| opt_days.map(month_label))
        .collect();

    let mut with_month = df.clone();
    with_month.with_column(Series::new("month", months))?;
    grouped_sum(&with_month, Some("month"), value_columns)
}

/// Truncate days-since-epoch to month granularity, rendered as `YYYY-MM`.
fn month_label(days: i32) -> String {
    let date = NaiveDate::default() + Duration::days(days as i64);
    date.format("%Y-%m").to_string()
}
