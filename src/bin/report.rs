//! Offline report runner.
//!
//! Stands in for the host application: point it at export files, get the
//! full dashboard report as JSON on stdout. Owns no serving or upload
//! machinery of its own.

use anyhow::{Context, Result};
use clap::Parser;
use gst_analytics::pipeline::{self, UploadSet};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "gst-report")]
#[command(about = "Compute GST analytics across marketplace export files")]
struct Args {
    /// Meesho sales export (CSV)
    #[arg(long)]
    meesho_sales: Option<PathBuf>,

    /// Meesho returns export (CSV, optional)
    #[arg(long)]
    meesho_returns: Option<PathBuf>,

    /// Amazon MTR report (CSV)
    #[arg(long)]
    amazon: Option<PathBuf>,

    /// Flipkart GSTR-1 report (CSV)
    #[arg(long)]
    flipkart: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let meesho_sales = read_slot(args.meesho_sales.as_deref())?;
    let meesho_returns = read_slot(args.meesho_returns.as_deref())?;
    let amazon = read_slot(args.amazon.as_deref())?;
    let flipkart = read_slot(args.flipkart.as_deref())?;

    let uploads = UploadSet {
        meesho_sales: meesho_sales.as_deref(),
        meesho_returns: meesho_returns.as_deref(),
        amazon: amazon.as_deref(),
        flipkart: flipkart.as_deref(),
    };

    if uploads.is_empty() {
        anyhow::bail!("no input files; pass at least one of --meesho-sales, --amazon, --flipkart");
    }

    info!("running analytics pipeline");
    let report = pipeline::run(&uploads).context("pipeline failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_slot(path: Option<&std::path::Path>) -> Result<Option<Vec<u8>>> {
    path.map(|p| std::fs::read(p).with_context(|| format!("failed to read {}", p.display())))
        .transpose()
}
