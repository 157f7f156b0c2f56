//! Per-platform analyzers and their result types.
//!
//! Each analyzer is a pure function from a loaded table to a fixed set of
//! named aggregates - scalars plus grouped tables - consumed as-is by the
//! presentation layer. Re-running an analyzer on the identical table yields
//! identical results; nothing is cached or mutated across calls.

pub mod aggregate;
pub mod amazon;
pub mod flipkart;
pub mod meesho;

pub use amazon::{analyze_amazon, AmazonAnalysis};
pub use flipkart::{analyze_flipkart, ColumnProfile, FlipkartOverview};
pub use meesho::{analyze_meesho, MeeshoAnalysis};

use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// One grouped aggregate: a frame with one row per distinct value of the
/// grouping column `key` and summed numeric columns.
#[derive(Debug, Clone)]
pub struct GroupedTable {
    /// Name of the grouping column.
    pub key: String,
    pub frame: DataFrame,
}

impl GroupedTable {
    /// Rows as JSON objects for chart/table binding.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        frame_records(&self.frame)
    }
}

impl Serialize for GroupedTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GroupedTable", 2)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("rows", &self.records())?;
        state.end()
    }
}

/// Materialize a frame's rows as JSON objects.
pub(crate) fn frame_records(frame: &DataFrame) -> Vec<Map<String, Value>> {
    let columns = frame.get_columns();
    (0..frame.height())
        .map(|row| {
            let mut obj = Map::new();
            for series in columns {
                let value = series.get(row).unwrap_or(AnyValue::Null);
                obj.insert(series.name().to_string(), anyvalue_to_json(value));
            }
            obj
        })
        .collect()
}

fn anyvalue_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(v) => Value::Number(v.into()),
        AnyValue::Int16(v) => Value::Number(v.into()),
        AnyValue::Int32(v) => Value::Number(v.into()),
        AnyValue::Int64(v) => Value::Number(v.into()),
        AnyValue::UInt8(v) => Value::Number(v.into()),
        AnyValue::UInt16(v) => Value::Number(v.into()),
        AnyValue::UInt32(v) => Value::Number(v.into()),
        AnyValue::UInt64(v) => Value::Number(v.into()),
        AnyValue::Float32(v) => float_to_json(v as f64),
        AnyValue::Float64(v) => float_to_json(v),
        AnyValue::Date(days) => {
            let date = NaiveDate::default() + Duration::days(days as i64);
            Value::String(date.format("%Y-%m-%d").to_string())
        }
        other => Value::String(other.to_string()),
    }
}

fn float_to_json(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}
