//! Platform Schema Maps - fixed column-name expectations per marketplace export
//!
//! Every column string the crate looks up lives here. The three marketplaces
//! use distinct names for semantically equivalent fields (order value, tax
//! amount, destination state, HSN code, order date), so each platform gets
//! one named-constant `PlatformSchema` and the loader/analyzers are
//! parameterized by it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported marketplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Meesho,
    Amazon,
    Flipkart,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Meesho => write!(f, "Meesho"),
            Platform::Amazon => write!(f, "Amazon"),
            Platform::Flipkart => write!(f, "Flipkart"),
        }
    }
}

/// Column map for one marketplace export format.
///
/// A `None` entry means the platform's export has no column for that concern
/// (e.g. Flipkart GSTR-1 reports carry no mapped monetary columns); the
/// dependent aggregates degrade instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct PlatformSchema {
    pub platform: Platform,
    /// Invoice-level order value.
    pub order_value: Option<&'static str>,
    /// Total GST amount per row.
    pub tax_amount: Option<&'static str>,
    /// Taxable (tax-exclusive) value.
    pub taxable_value: Option<&'static str>,
    pub quantity: Option<&'static str>,
    /// Destination state of the shipment.
    pub state: Option<&'static str>,
    /// HSN/SAC product classification code.
    pub product_code: Option<&'static str>,
    /// GST rate bucket.
    pub tax_rate: Option<&'static str>,
    /// Column used for month-wise grouping.
    pub order_date: Option<&'static str>,
    /// Columns coerced to `Date` at load time (permissive parse).
    pub date_columns: &'static [&'static str],
    /// Shipment/Refund/Cancel partition column (Amazon MTR only).
    pub transaction_type: Option<&'static str>,
    /// Tax-collected-at-source columns (Amazon MTR only).
    pub tcs_columns: &'static [&'static str],
}

impl PlatformSchema {
    /// Every column name this schema knows about. Used by the loader to
    /// recognize whether an uploaded file plausibly matches the platform.
    pub fn known_columns(&self) -> Vec<&'static str> {
        let mut cols: Vec<&'static str> = [
            self.order_value,
            self.tax_amount,
            self.taxable_value,
            self.quantity,
            self.state,
            self.product_code,
            self.tax_rate,
            self.transaction_type,
        ]
        .into_iter()
        .flatten()
        .collect();
        cols.extend(self.date_columns);
        cols.extend(self.tcs_columns);
        cols
    }

    /// Monetary/quantity columns that must end up numeric; the loader runs
    /// the string-sanitation pass over these.
    pub fn metric_columns(&self) -> Vec<&'static str> {
        let mut cols: Vec<&'static str> = [
            self.order_value,
            self.tax_amount,
            self.taxable_value,
            self.quantity,
        ]
        .into_iter()
        .flatten()
        .collect();
        cols.extend(self.tcs_columns);
        cols
    }

    /// Value columns summed inside every grouped table (order value, tax,
    /// quantity) - whichever of them the file actually carries.
    pub fn grouped_sum_columns(&self) -> Vec<&'static str> {
        [self.order_value, self.tax_amount, self.quantity]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Meesho sales / returns export.
pub const MEESHO: PlatformSchema = PlatformSchema {
    platform: Platform::Meesho,
    order_value: Some("total_invoice_value"),
    tax_amount: Some("tax_amount"),
    taxable_value: Some("total_taxable_sale_value"),
    quantity: Some("quantity"),
    state: Some("end_customer_state_new"),
    product_code: Some("hsn_code"),
    tax_rate: Some("gst_rate"),
    order_date: Some("order_date"),
    date_columns: &["order_date"],
    transaction_type: None,
    tcs_columns: &[],
};

/// Amazon MTR (merchant tax report) export.
pub const AMAZON: PlatformSchema = PlatformSchema {
    platform: Platform::Amazon,
    order_value: Some("Invoice Amount"),
    tax_amount: Some("Total Tax Amount"),
    taxable_value: Some("Tax Exclusive Gross"),
    quantity: Some("Quantity"),
    state: Some("Ship To State"),
    product_code: Some("Hsn/sac"),
    tax_rate: None,
    order_date: Some("Order Date"),
    date_columns: &["Invoice Date", "Order Date", "Shipment Date"],
    transaction_type: Some("Transaction Type"),
    tcs_columns: &[
        "Tcs Igst Amount",
        "Tcs Cgst Amount",
        "Tcs Sgst Amount",
        "Tcs Utgst Amount",
    ],
};

/// Flipkart GSTR-1 export. No column mapping exists for this format yet, so
/// the schema is empty and the loader accepts any well-formed CSV; analysis
/// is limited to structure inspection.
pub const FLIPKART: PlatformSchema = PlatformSchema {
    platform: Platform::Flipkart,
    order_value: None,
    tax_amount: None,
    taxable_value: None,
    quantity: None,
    state: None,
    product_code: None,
    tax_rate: None,
    order_date: None,
    date_columns: &[],
    transaction_type: None,
    tcs_columns: &[],
};

/// Schema for a platform.
pub fn schema_for(platform: Platform) -> &'static PlatformSchema {
    match platform {
        Platform::Meesho => &MEESHO,
        Platform::Amazon => &AMAZON,
        Platform::Flipkart => &FLIPKART,
    }
}
