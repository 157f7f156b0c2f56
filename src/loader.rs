//! Loader - raw CSV upload bytes to normalized DataFrames
//!
//! Header names are trimmed before any lookup, platform date columns are
//! coerced to `Date` permissively (unparseable values become null rather
//! than aborting the load), and monetary columns that arrived as formatted
//! strings are rebuilt as numeric.

use crate::data_utils::sanitize_metric_columns;
use crate::error::{AnalyticsError, Result};
use crate::schema::PlatformSchema;
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;
use tracing::{info, warn};

/// Formats tried, in order, when coercing a date-bearing column. Marketplace
/// exports are day-first; ISO dates appear in Meesho dumps.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Outcome of loading an optional secondary file (e.g. Meesho returns).
///
/// Callers can distinguish "absent by choice" from "failed to parse"; a
/// failed parse leaves the table absent, never partially populated.
#[derive(Debug)]
pub enum OptionalLoad {
    Loaded(DataFrame),
    Absent,
    Failed { warning: String },
}

impl OptionalLoad {
    pub fn table(&self) -> Option<&DataFrame> {
        match self {
            OptionalLoad::Loaded(df) => Some(df),
            _ => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            OptionalLoad::Failed { warning } => Some(warning),
            _ => None,
        }
    }
}

/// Parse one platform's primary export into a normalized table.
pub fn load_table(bytes: &[u8], schema: &PlatformSchema) -> Result<DataFrame> {
    load_table_inner(bytes, schema, true)
}

fn load_table_inner(
    bytes: &[u8],
    schema: &PlatformSchema,
    require_recognition: bool,
) -> Result<DataFrame> {
    let headers = preflight_headers(bytes)?;
    if require_recognition {
        check_recognition(&headers, schema)?;
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(500))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| AnalyticsError::Load(format!("malformed CSV: {e}")))?;

    trim_column_names(&mut df)?;
    let df = coerce_date_columns(df, schema.date_columns)?;
    let df = sanitize_metric_columns(df, &schema.metric_columns())?;

    info!(
        platform = %schema.platform,
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );
    Ok(df)
}

/// Convenience wrapper for path-based callers (the report binary, tests).
pub fn load_table_from_path(path: impl AsRef<Path>, schema: &PlatformSchema) -> Result<DataFrame> {
    let bytes = std::fs::read(path.as_ref())?;
    load_table(&bytes, schema)
}

/// Load a secondary file that the user may or may not have supplied. A parse
/// failure is a warning, not an error: analysis proceeds without the table.
/// Secondary exports vary in shape, so no schema recognition is enforced.
pub fn load_optional(bytes: Option<&[u8]>, schema: &PlatformSchema) -> OptionalLoad {
    let Some(bytes) = bytes else {
        return OptionalLoad::Absent;
    };
    match load_table_inner(bytes, schema, false) {
        Ok(df) => OptionalLoad::Loaded(df),
        Err(e) => {
            let warning = format!(
                "could not process optional {} file: {e}; it might be in a different format",
                schema.platform
            );
            warn!("{warning}");
            OptionalLoad::Failed { warning }
        }
    }
}

/// Read and trim the header row up front so lookups and duplicate detection
/// happen on normalized names before polars ever sees the file.
fn preflight_headers(bytes: &[u8]) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(AnalyticsError::Load(
            "file is empty or has no header row".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(AnalyticsError::Load(format!(
                "duplicate column name after trimming: '{header}'"
            )));
        }
    }

    Ok(headers)
}

/// A file that shares no column with the platform schema is almost certainly
/// the wrong export. Platforms with an empty schema (Flipkart) accept any
/// well-formed CSV.
fn check_recognition(headers: &[String], schema: &PlatformSchema) -> Result<()> {
    let known = schema.known_columns();
    if known.is_empty() {
        return Ok(());
    }
    let recognized = headers.iter().any(|h| known.contains(&h.as_str()));
    if !recognized {
        return Err(AnalyticsError::SchemaMismatch(format!(
            "file does not look like a {} export; found columns [{}], expected some of [{}]",
            schema.platform,
            headers.iter().join(", "),
            known.iter().join(", ")
        )));
    }
    Ok(())
}

fn trim_column_names(df: &mut DataFrame) -> Result<()> {
    let renames: Vec<(String, String)> = df
        .get_column_names()
        .iter()
        .filter(|name| name.trim() != **name)
        .map(|name| (name.to_string(), name.trim().to_string()))
        .collect();
    for (original, trimmed) in renames {
        df.rename(&original, &trimmed)?;
    }
    Ok(())
}

/// Replace each date-bearing string column with a `Date` column. Values that
/// match none of the known formats become null - a permissive parse, so a
/// file full of junk dates still loads.
fn coerce_date_columns(df: DataFrame, date_columns: &[&str]) -> Result<DataFrame> {
    let mut result = df;
    for col_name in date_columns {
        let Ok(col_data) = result.column(col_name) else {
            continue;
        };
        if !matches!(col_data.dtype(), DataType::String) {
            continue;
        }

        let str_col = col_data.str()?;
        let days: Int32Chunked = str_col
            .into_iter()
            .map(|opt| {
                opt.and_then(parse_date_cell)
                    .map(|d| (d - NaiveDate::default()).num_days() as i32)
            })
            .collect();
        let mut series = days.into_date().into_series();
        series.rename(col_name);
        result.replace(col_name, series)?;
    }
    Ok(result)
}

fn parse_date_cell(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}
