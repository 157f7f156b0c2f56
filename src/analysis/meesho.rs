//! Meesho sales/returns analysis.

use crate::error::Result;
use crate::schema::MEESHO;
use polars::prelude::*;
use serde::Serialize;

use super::aggregate::{grouped_sum, monthly_grouped, percentage, scalar_sum};
use super::GroupedTable;

/// Named aggregates computed from a Meesho sales export.
#[derive(Debug, Clone, Serialize)]
pub struct MeeshoAnalysis {
    pub total_orders: usize,
    /// Row count of the returns table, when one was uploaded and parsed.
    pub returns_count: Option<usize>,
    pub total_sales: f64,
    pub total_tax: f64,
    pub taxable_sales: f64,
    /// `total_tax / total_sales * 100`; `None` (undefined) when sales are 0.
    pub average_tax_rate: Option<f64>,
    pub state_wise: Option<GroupedTable>,
    pub monthly: Option<GroupedTable>,
    pub product_performance: Option<GroupedTable>,
    pub tax_rate_analysis: Option<GroupedTable>,
}

/// Analyze a loaded Meesho sales table. Every row contributes exactly once;
/// missing columns degrade the dependent aggregate instead of failing.
pub fn analyze_meesho(
    sales: &DataFrame,
    returns: Option<&DataFrame>,
) -> Result<MeeshoAnalysis> {
    let schema = &MEESHO;
    let sum_columns = schema.grouped_sum_columns();

    let total_sales = scalar_sum(sales, schema.order_value);
    let total_tax = scalar_sum(sales, schema.tax_amount);

    Ok(MeeshoAnalysis {
        total_orders: sales.height(),
        returns_count: returns.map(|df| df.height()),
        total_sales,
        total_tax,
        taxable_sales: scalar_sum(sales, schema.taxable_value),
        average_tax_rate: percentage(total_tax, total_sales),
        state_wise: grouped_sum(sales, schema.state, &sum_columns)?,
        monthly: monthly_grouped(sales, schema.order_date, &sum_columns)?,
        product_performance: grouped_sum(sales, schema.product_code, &sum_columns)?,
        tax_rate_analysis: grouped_sum(sales, schema.tax_rate, &sum_columns)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worked_example() -> DataFrame {
        df![
            "total_invoice_value" => [100.0, 50.0, 200.0],
            "tax_amount" => [18.0, 9.0, 36.0],
            "end_customer_state_new" => ["UP", "UP", "MH"],
        ]
        .expect("valid test frame")
    }

    #[test]
    fn worked_example_totals() -> Result<()> {
        let analysis = analyze_meesho(&worked_example(), None)?;
        assert_eq!(analysis.total_orders, 3);
        assert_eq!(analysis.total_sales, 350.0);
        assert_eq!(analysis.total_tax, 63.0);
        assert_eq!(analysis.taxable_sales, 0.0); // column absent, degrades

        let states = analysis.state_wise.expect("state column present");
        let invoice = states.frame.column("total_invoice_value")?.f64()?;
        let tax = states.frame.column("tax_amount")?.f64()?;
        // Ascending by key: MH first, then UP.
        assert_eq!(invoice.get(0), Some(200.0));
        assert_eq!(tax.get(0), Some(36.0));
        assert_eq!(invoice.get(1), Some(150.0));
        assert_eq!(tax.get(1), Some(27.0));
        Ok(())
    }

    #[test]
    fn average_tax_rate_is_undefined_on_zero_sales() -> Result<()> {
        let empty = df![
            "total_invoice_value" => Vec::<f64>::new(),
            "end_customer_state_new" => Vec::<String>::new(),
        ]?;
        let analysis = analyze_meesho(&empty, None)?;
        assert_eq!(analysis.total_sales, 0.0);
        assert_eq!(analysis.average_tax_rate, None);
        Ok(())
    }

    #[test]
    fn returns_table_only_contributes_a_count() -> Result<()> {
        let returns = df!["suborder_id" => ["a", "b"]]?;
        let analysis = analyze_meesho(&worked_example(), Some(&returns))?;
        assert_eq!(analysis.returns_count, Some(2));
        // Sales figures are untouched by returns rows.
        assert_eq!(analysis.total_sales, 350.0);
        Ok(())
    }

    #[test]
    fn analysis_is_pure_across_calls() -> Result<()> {
        let df = worked_example();
        let first = analyze_meesho(&df, None)?;
        let second = analyze_meesho(&df, None)?;
        assert_eq!(
            serde_json::to_string(&first)?,
            serde_json::to_string(&second)?
        );
        Ok(())
    }
}
