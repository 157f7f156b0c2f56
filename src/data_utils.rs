use crate::error::Result;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

/// Convert string columns containing formatted currency values to numeric.
///
/// Marketplace exports occasionally ship monetary columns as display strings
/// (`"₹1,234.56"`, `"1,00,000"`, `" 45.00 "`). Those columns fail polars'
/// numeric inference and land as `String`; summing them silently yields
/// nothing. For each designated metric column that parsed as a string and
/// looks like disguised numbers, rebuild it as `Float64` with unparseable
/// cells as null.
pub fn sanitize_metric_columns(df: DataFrame, metric_columns: &[&str]) -> Result<DataFrame> {
    let formatted_number = Regex::new(r"^[₹$]?\s*-?[\d,]+(\.\d+)?\s*$")
        .expect("formatted-number pattern is valid");
    let mut result = df;

    for col_name in metric_columns {
        let Ok(col_data) = result.column(col_name) else {
            continue;
        };
        if !matches!(col_data.dtype(), DataType::String) {
            continue;
        }

        let str_col = col_data.str()?;
        let looks_numeric = str_col
            .into_iter()
            .flatten()
            .any(|val| formatted_number.is_match(val));
        if !looks_numeric {
            continue;
        }

        let cleaned: Float64Chunked = str_col
            .into_iter()
            .map(|opt| opt.and_then(parse_formatted_number))
            .collect();
        let mut series = cleaned.into_series();
        series.rename(col_name);
        debug!(column = col_name, "sanitized formatted numeric column");
        result.replace(col_name, series)?;
    }

    Ok(result)
}

/// Strip currency symbols and grouping commas, then parse. Returns `None`
/// for cells that are not numbers at all.
fn parse_formatted_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '₹' | '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_currency_strings_become_floats() -> Result<()> {
        let df = df![
            "total_invoice_value" => ["₹1,234.56", " 100", "not a number"],
            "state" => ["UP", "MH", "DL"],
        ]?;

        let out = sanitize_metric_columns(df, &["total_invoice_value"])?;
        let col = out.column("total_invoice_value")?;
        assert!(matches!(col.dtype(), DataType::Float64));

        let values = col.f64()?;
        assert_eq!(values.get(0), Some(1234.56));
        assert_eq!(values.get(1), Some(100.0));
        assert_eq!(values.get(2), None);
        Ok(())
    }

    #[test]
    fn non_metric_string_columns_are_untouched() -> Result<()> {
        let df = df![
            "state" => ["UP", "MH"],
            "quantity" => [1i64, 2],
        ]?;

        let out = sanitize_metric_columns(df, &["quantity"])?;
        assert!(matches!(out.column("state")?.dtype(), DataType::String));
        assert!(matches!(out.column("quantity")?.dtype(), DataType::Int64));
        Ok(())
    }

    #[test]
    fn indian_grouping_commas_parse() {
        assert_eq!(parse_formatted_number("1,00,000"), Some(100000.0));
        assert_eq!(parse_formatted_number("₹ -250.75"), Some(-250.75));
        assert_eq!(parse_formatted_number("n/a"), None);
    }
}
