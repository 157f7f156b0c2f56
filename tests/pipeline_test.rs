use gst_analytics::analysis::aggregate::scalar_sum;
use gst_analytics::pipeline::{self, Severity, UploadSet};
use gst_analytics::schema::{Platform, AMAZON, MEESHO};
use gst_analytics::{load_table, load_table_from_path};
use polars::prelude::ChunkAgg;
use std::fs;
use std::path::PathBuf;

const MEESHO_CSV: &str = "\
order_date,total_invoice_value,tax_amount,total_taxable_sale_value,quantity,end_customer_state_new,hsn_code,gst_rate
2024-01-15,100.0,18.0,82.0,1,UP,6204,18
2024-01-20,50.0,9.0,41.0,1,UP,6204,18
2024-02-03,200.0,36.0,164.0,2,MH,9404,18
";

const AMAZON_CSV: &str = "\
Transaction Type,Order Date,Invoice Amount,Total Tax Amount,Tax Exclusive Gross,Quantity,Ship To State,Hsn/sac,Tcs Igst Amount
Shipment,2024-01-10,100.0,18.0,82.0,1,KARNATAKA,6204,1.0
Shipment,2024-02-11,200.0,36.0,164.0,1,DELHI,9404,2.0
Refund,2024-02-15,50.0,9.0,41.0,1,DELHI,9404,0.5
";

const FLIPKART_CSV: &str = "\
gstin,taxable_value,igst
29ABCDE1234F1Z5,100.0,18.0
";

/// Fixture files on disk, the way the host application would hand them over.
fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("gst_analytics_tests").join(name);
    fs::create_dir_all(&dir).expect("temp dir is writable");
    dir
}

#[test]
fn full_pipeline_over_all_three_platforms() {
    let uploads = UploadSet {
        meesho_sales: Some(MEESHO_CSV.as_bytes()),
        amazon: Some(AMAZON_CSV.as_bytes()),
        flipkart: Some(FLIPKART_CSV.as_bytes()),
        ..Default::default()
    };
    let report = pipeline::run(&uploads).expect("pipeline runs");

    let meesho = report.meesho.as_ref().expect("meesho analyzed");
    assert_eq!(meesho.total_orders, 3);
    assert_eq!(meesho.total_sales, 350.0);
    assert_eq!(meesho.total_tax, 63.0);
    assert_eq!(meesho.taxable_sales, 287.0);
    assert_eq!(meesho.average_tax_rate, Some(18.0));

    let monthly = meesho.monthly.as_ref().expect("order_date present");
    assert_eq!(monthly.frame.height(), 2);
    let records = monthly.records();
    assert_eq!(records[0]["month"], serde_json::json!("2024-01"));
    assert_eq!(records[0]["total_invoice_value"], serde_json::json!(150.0));
    assert_eq!(records[1]["month"], serde_json::json!("2024-02"));
    assert_eq!(records[1]["total_invoice_value"], serde_json::json!(200.0));

    let amazon = report.amazon.as_ref().expect("amazon analyzed");
    assert_eq!(amazon.total_shipments, 2);
    assert_eq!(amazon.total_refunds, 1);
    assert_eq!(amazon.total_sales, 300.0);
    assert_eq!(amazon.total_tcs, 3.0);
    assert_eq!(amazon.return_rate, Some(50.0));

    let flipkart = report.flipkart.as_ref().expect("flipkart profiled");
    assert_eq!(flipkart.total_records, 1);
    assert_eq!(flipkart.column_count, 3);

    // Comparison: three rows, Meesho leads on sales.
    assert_eq!(report.comparison.rows.len(), 3);
    assert_eq!(report.comparison.combined_sales, 650.0);
    assert_eq!(report.comparison.combined_orders, 6);
    let insight = report.comparison.insight.as_ref().expect("multi-platform");
    assert_eq!(insight.best_platform, Platform::Meesho);
    assert_eq!(insight.market_share, 53.85);

    assert!(report.notes.is_empty());
}

#[test]
fn grouped_totals_are_conserved_through_the_load_path() {
    let df = load_table(MEESHO_CSV.as_bytes(), &MEESHO).expect("loads");
    let report = pipeline::run(&UploadSet {
        meesho_sales: Some(MEESHO_CSV.as_bytes()),
        ..Default::default()
    })
    .expect("pipeline runs");

    let meesho = report.meesho.expect("analyzed");
    for (table, label) in [
        (&meesho.state_wise, "state"),
        (&meesho.monthly, "month"),
        (&meesho.product_performance, "product"),
        (&meesho.tax_rate_analysis, "tax rate"),
    ] {
        let table = table.as_ref().unwrap_or_else(|| panic!("{label} table missing"));
        let grouped_total: f64 = table
            .frame
            .column("total_invoice_value")
            .expect("summed column")
            .f64()
            .expect("float column")
            .sum()
            .unwrap_or(0.0);
        let flat_total = scalar_sum(&df, Some("total_invoice_value"));
        assert!(
            (grouped_total - flat_total).abs() < 1e-9,
            "{label} grouping lost rows: {grouped_total} != {flat_total}"
        );
    }
}

#[test]
fn all_unparseable_dates_still_load_and_group_under_null() {
    let csv = "\
order_date,total_invoice_value
not-a-date,100.0
??,50.0
";
    let report = pipeline::run(&UploadSet {
        meesho_sales: Some(csv.as_bytes()),
        ..Default::default()
    })
    .expect("permissive date parse never fails the load");

    let meesho = report.meesho.expect("analyzed");
    assert_eq!(meesho.total_sales, 150.0);

    // Every row falls into the single null month group.
    let monthly = meesho.monthly.expect("date column exists, though null");
    assert_eq!(monthly.frame.height(), 1);
    let records = monthly.records();
    assert_eq!(records[0]["month"], serde_json::Value::Null);
    assert_eq!(records[0]["total_invoice_value"], serde_json::json!(150.0));
}

#[test]
fn currency_formatted_columns_are_sanitized_on_load() {
    let csv = "\
total_invoice_value,tax_amount,end_customer_state_new
\"₹1,000.50\",\"₹180.00\",UP
\"₹2,000.50\",\"₹360.00\",MH
";
    let df = load_table(csv.as_bytes(), &MEESHO).expect("loads");
    assert_eq!(scalar_sum(&df, Some("total_invoice_value")), 3001.0);
    assert_eq!(scalar_sum(&df, Some("tax_amount")), 540.0);
}

#[test]
fn path_based_loading_matches_byte_based_loading() {
    let dir = fixture_dir("path_vs_bytes");
    let path = dir.join("amazon.csv");
    fs::write(&path, AMAZON_CSV).expect("fixture written");

    let from_path = load_table_from_path(&path, &AMAZON).expect("loads from path");
    let from_bytes = load_table(AMAZON_CSV.as_bytes(), &AMAZON).expect("loads from bytes");
    assert!(from_path.equals_missing(&from_bytes));
}

#[test]
fn wrong_platform_upload_is_isolated_to_its_slot() {
    let uploads = UploadSet {
        meesho_sales: Some(AMAZON_CSV.as_bytes()),
        amazon: Some(AMAZON_CSV.as_bytes()),
        ..Default::default()
    };
    let report = pipeline::run(&uploads).expect("pipeline survives bad slots");

    assert!(report.meesho.is_none(), "Amazon file must not pass as Meesho");
    assert!(report.amazon.is_some());
    assert_eq!(report.notes.len(), 1);
    assert_eq!(report.notes[0].platform, Platform::Meesho);
    assert_eq!(report.notes[0].severity, Severity::Error);
}

#[test]
fn report_serializes_for_the_presentation_layer() {
    let report = pipeline::run(&UploadSet {
        meesho_sales: Some(MEESHO_CSV.as_bytes()),
        amazon: Some(AMAZON_CSV.as_bytes()),
        ..Default::default()
    })
    .expect("pipeline runs");

    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["meesho"]["total_sales"], serde_json::json!(350.0));
    assert_eq!(json["amazon"]["total_shipments"], serde_json::json!(2));
    assert_eq!(
        json["meesho"]["state_wise"]["key"],
        serde_json::json!("end_customer_state_new")
    );
    // Undefined ratios serialize as explicit nulls, never NaN.
    assert!(json["flipkart"].is_null());
    assert_eq!(json["comparison"]["rows"].as_array().map(|r| r.len()), Some(2));
}

#[test]
fn rerunning_the_pipeline_is_byte_identical() {
    let uploads = UploadSet {
        meesho_sales: Some(MEESHO_CSV.as_bytes()),
        amazon: Some(AMAZON_CSV.as_bytes()),
        flipkart: Some(FLIPKART_CSV.as_bytes()),
        ..Default::default()
    };
    let first = pipeline::run(&uploads).expect("first run");
    let second = pipeline::run(&uploads).expect("second run");
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
}
