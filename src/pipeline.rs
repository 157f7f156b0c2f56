//! End-to-end pipeline: upload slots in, one `DashboardReport` out.
//!
//! The presentation layer re-runs this on every interaction; nothing is
//! cached between runs and no state outlives the returned report. A failed
//! primary file takes down only its own platform's analysis - the other
//! slots proceed.

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{error, info};

use crate::analysis::{
    analyze_amazon, analyze_flipkart, analyze_meesho, AmazonAnalysis, FlipkartOverview,
    MeeshoAnalysis,
};
use crate::comparator::{compare, ComparisonSummary};
use crate::error::Result;
use crate::loader::{load_optional, load_table, OptionalLoad};
use crate::schema::{Platform, AMAZON, FLIPKART, MEESHO};

/// Raw bytes per upload slot, as handed over by the host application.
#[derive(Debug, Default, Clone, Copy)]
pub struct UploadSet<'a> {
    pub meesho_sales: Option<&'a [u8]>,
    pub meesho_returns: Option<&'a [u8]>,
    pub amazon: Option<&'a [u8]>,
    pub flipkart: Option<&'a [u8]>,
}

impl UploadSet<'_> {
    pub fn is_empty(&self) -> bool {
        self.meesho_sales.is_none()
            && self.meesho_returns.is_none()
            && self.amazon.is_none()
            && self.flipkart.is_none()
    }
}

/// Loaded tables for one render. Absent slots stay `None`.
#[derive(Debug, Default)]
pub struct PlatformTables {
    pub meesho_sales: Option<DataFrame>,
    pub meesho_returns: Option<DataFrame>,
    pub amazon: Option<DataFrame>,
    pub flipkart: Option<DataFrame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Secondary file problems; analysis proceeds without the table.
    Warning,
    /// Primary file problems; that platform's analysis is unavailable.
    Error,
}

/// A user-visible note produced while loading one slot.
#[derive(Debug, Clone, Serialize)]
pub struct LoadNote {
    pub platform: Platform,
    pub severity: Severity,
    pub message: String,
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub meesho: Option<MeeshoAnalysis>,
    pub amazon: Option<AmazonAnalysis>,
    pub flipkart: Option<FlipkartOverview>,
    pub comparison: ComparisonSummary,
    pub notes: Vec<LoadNote>,
}

/// Load every provided slot. Failures become notes, never early returns.
pub fn load_tables(uploads: &UploadSet) -> (PlatformTables, Vec<LoadNote>) {
    let mut tables = PlatformTables::default();
    let mut notes = Vec::new();

    if let Some(bytes) = uploads.meesho_sales {
        match load_table(bytes, &MEESHO) {
            Ok(df) => tables.meesho_sales = Some(df),
            Err(e) => {
                error!(platform = %Platform::Meesho, "failed to load sales file: {e}");
                notes.push(LoadNote {
                    platform: Platform::Meesho,
                    severity: Severity::Error,
                    message: format!("Error loading Meesho data: {e}"),
                });
            }
        }
    }

    // Returns only matter when the sales file loaded; a lone returns file
    // has nothing to attach to.
    if tables.meesho_sales.is_some() {
        match load_optional(uploads.meesho_returns, &MEESHO) {
            OptionalLoad::Loaded(df) => tables.meesho_returns = Some(df),
            OptionalLoad::Absent => {}
            OptionalLoad::Failed { warning } => notes.push(LoadNote {
                platform: Platform::Meesho,
                severity: Severity::Warning,
                message: warning,
            }),
        }
    }

    if let Some(bytes) = uploads.amazon {
        match load_table(bytes, &AMAZON) {
            Ok(df) => tables.amazon = Some(df),
            Err(e) => {
                error!(platform = %Platform::Amazon, "failed to load MTR file: {e}");
                notes.push(LoadNote {
                    platform: Platform::Amazon,
                    severity: Severity::Error,
                    message: format!("Error loading Amazon data: {e}"),
                });
            }
        }
    }

    if let Some(bytes) = uploads.flipkart {
        match load_table(bytes, &FLIPKART) {
            Ok(df) => tables.flipkart = Some(df),
            Err(e) => {
                error!(platform = %Platform::Flipkart, "failed to load GSTR-1 file: {e}");
                notes.push(LoadNote {
                    platform: Platform::Flipkart,
                    severity: Severity::Error,
                    message: format!("Error loading Flipkart data: {e}"),
                });
            }
        }
    }

    (tables, notes)
}

/// Analyze already-loaded tables. Pure: identical tables produce an
/// identical report.
pub fn analyze(tables: &PlatformTables) -> Result<DashboardReport> {
    let meesho = tables
        .meesho_sales
        .as_ref()
        .map(|sales| analyze_meesho(sales, tables.meesho_returns.as_ref()))
        .transpose()?;
    let amazon = tables.amazon.as_ref().map(analyze_amazon).transpose()?;
    let flipkart = tables.flipkart.as_ref().map(analyze_flipkart);

    let comparison = compare(meesho.as_ref(), amazon.as_ref(), flipkart.as_ref());

    Ok(DashboardReport {
        meesho,
        amazon,
        flipkart,
        comparison,
        notes: Vec::new(),
    })
}

/// Full pipeline for one render: load, analyze, compare.
pub fn run(uploads: &UploadSet) -> Result<DashboardReport> {
    let (tables, notes) = load_tables(uploads);
    let mut report = analyze(&tables)?;
    report.notes = notes;
    info!(
        platforms = report.comparison.rows.len(),
        notes = report.notes.len(),
        "pipeline run complete"
    );
    Ok(report)
}
