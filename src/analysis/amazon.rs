//! Amazon MTR analysis.
//!
//! Amazon reports mix shipments, refunds, and cancellations in one file;
//! summed metrics are computed over the Shipment partition only.

use crate::error::Result;
use crate::schema::AMAZON;
use polars::prelude::*;
use serde::Serialize;

use super::aggregate::{grouped_sum, monthly_grouped, percentage, round2, scalar_sum};
use super::GroupedTable;

const SHIPMENT: &str = "Shipment";
const REFUND: &str = "Refund";
const CANCEL: &str = "Cancel";

/// Named aggregates computed from an Amazon MTR export.
#[derive(Debug, Clone, Serialize)]
pub struct AmazonAnalysis {
    pub total_shipments: usize,
    pub total_refunds: usize,
    pub total_cancellations: usize,
    /// `refunds / shipments * 100`; `None` when there are no shipments.
    pub return_rate: Option<f64>,
    pub total_sales: f64,
    pub total_tax: f64,
    pub tax_exclusive_gross: f64,
    /// Sum across whichever tax-collected-at-source columns are present.
    pub total_tcs: f64,
    pub state_wise: Option<GroupedTable>,
    pub monthly: Option<GroupedTable>,
    pub product_performance: Option<GroupedTable>,
}

pub fn analyze_amazon(df: &DataFrame) -> Result<AmazonAnalysis> {
    let schema = &AMAZON;

    let shipments = partition(df, SHIPMENT)?;
    let total_shipments = shipments.height();
    let total_refunds = partition(df, REFUND)?.height();
    let total_cancellations = partition(df, CANCEL)?.height();

    if total_shipments == 0 {
        return Ok(AmazonAnalysis {
            total_shipments,
            total_refunds,
            total_cancellations,
            return_rate: None,
            total_sales: 0.0,
            total_tax: 0.0,
            tax_exclusive_gross: 0.0,
            total_tcs: 0.0,
            state_wise: None,
            monthly: None,
            product_performance: None,
        });
    }

    let sum_columns = schema.grouped_sum_columns();
    let total_tcs = round2(
        schema
            .tcs_columns
            .iter()
            .copied()
            .map(|c| scalar_sum(&shipments, Some(c)))
            .sum(),
    );

    Ok(AmazonAnalysis {
        total_shipments,
        total_refunds,
        total_cancellations,
        return_rate: percentage(total_refunds as f64, total_shipments as f64),
        total_sales: scalar_sum(&shipments, schema.order_value),
        total_tax: scalar_sum(&shipments, schema.tax_amount),
        tax_exclusive_gross: scalar_sum(&shipments, schema.taxable_value),
        total_tcs,
        state_wise: grouped_sum(&shipments, schema.state, &sum_columns)?,
        monthly: monthly_grouped(&shipments, schema.order_date, &sum_columns)?,
        product_performance: grouped_sum(&shipments, schema.product_code, &sum_columns)?,
    })
}

/// Rows whose transaction type equals `kind`. A file without the type column
/// degrades to "everything is a shipment": refund/cancel partitions come back
/// empty and sums run over the whole table.
fn partition(df: &DataFrame, kind: &str) -> Result<DataFrame> {
    let Some(type_column) = AMAZON.transaction_type else {
        unreachable!("Amazon schema always maps a transaction type column");
    };
    if df.column(type_column).is_err() {
        return if kind == SHIPMENT {
            Ok(df.clone())
        } else {
            Ok(df.clear())
        };
    }
    let filtered = df
        .clone()
        .lazy()
        .filter(col(type_column).eq(lit(kind)))
        .collect()?;
    Ok(filtered)
}
