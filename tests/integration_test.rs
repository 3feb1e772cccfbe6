use anyhow::Result;
use order_export::pipeline::ingestion::InMemoryWorkbook;
use order_export::types::{CellValue, Metadata};
use order_export::{ConvertConfig, Pipeline};
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn text(s: &str) -> CellValue {
    CellValue::text(s)
}

/// Two sheets with differently spelled headers, a duplicate order across
/// sheets and a row with no order number
fn scenario_workbook() -> InMemoryWorkbook {
    InMemoryWorkbook::new()
        .with_sheet(
            "1-2000",
            vec![
                vec![text("Order No"), text("Order Date"), text("Order Total (RM)"), text("State"), text("Item Brand")],
                vec![text("1001"), text("2024-01-05"), text("1,000.00"), text("W.P. Kuala Lumpur"), text("--Nestle")],
            ],
        )
        .with_sheet(
            "2001-4000",
            vec![
                vec![text("OrderNo"), text("OrderDate"), text("Order Total"), text("State"), text("Brand")],
                vec![CellValue::Number(1001.0), text("03/02/2024"), text("9,999"), text("Penang"), text("nan")],
                vec![CellValue::Empty, text("2024-02-10"), text("5.00"), text("Johor"), text("Zest")],
            ],
        )
}

#[test]
fn duplicate_order_scenario() -> Result<()> {
    let dir = tempdir()?;
    let mut config = ConvertConfig::default();
    config.output_dir = dir.path().join("data");

    let result = Pipeline::run(&mut scenario_workbook(), &config)?;
    assert_eq!(result.rows_merged, 3);
    assert_eq!(result.rows_dropped, 1);
    assert_eq!(result.records_written, 2);

    let orders: Value = serde_json::from_str(&fs::read_to_string(config.output_dir.join("orders.json"))?)?;
    let orders = orders.as_array().expect("orders.json holds an array");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["orderNo"], "1001");
    assert_eq!(orders[1]["orderNo"], "1001");
    assert_eq!(orders[0]["state"], "KUALA LUMPUR");
    assert_eq!(orders[1]["state"], "PENANG");
    assert_eq!(orders[0]["itemBrand"], "Nestle");
    assert!(orders[1]["itemBrand"].is_null());
    assert_eq!(orders[0]["orderDate"], "2024-01-05");
    assert_eq!(orders[1]["orderDate"], "2024-03-02");
    assert_eq!(orders[1]["orderMonth"], 3);
    assert_eq!(orders[0]["id"], 1);
    assert_eq!(orders[1]["id"], 2);

    let keys: Vec<&str> = orders[0].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys.len(),
        13,
        "unexpected record fields: {:?}",
        keys
    );

    let metadata: Metadata =
        serde_json::from_str(&fs::read_to_string(config.output_dir.join("metadata.json"))?)?;
    assert_eq!(metadata.total_revenue, 1000.0);
    assert_eq!(metadata.total_records, 2);
    assert_eq!(metadata.total_orders, 1);
    assert_eq!(metadata.total_records, orders.len());
    assert_eq!(metadata.states, vec!["KUALA LUMPUR", "PENANG"]);
    assert_eq!(metadata.brands, vec!["Nestle"]);
    assert_eq!(metadata.date_range.min.as_deref(), Some("2024-01-05"));
    assert_eq!(metadata.date_range.max.as_deref(), Some("2024-03-02"));

    Ok(())
}

#[test]
fn records_keep_source_sheet_and_non_empty_order_numbers() -> Result<()> {
    let config = ConvertConfig::default();
    let conversion = Pipeline::convert(&mut scenario_workbook(), &config)?;

    for record in &conversion.records {
        assert!(config.sheets.contains(&record.source_sheet));
        assert!(!record.order_no.is_empty());
    }
    assert_eq!(conversion.records[0].source_sheet, "1-2000");
    assert_eq!(conversion.records[1].source_sheet, "2001-4000");
    Ok(())
}

#[test]
fn rerunning_produces_identical_files() -> Result<()> {
    let dir = tempdir()?;
    let mut config = ConvertConfig::default();
    config.output_dir = dir.path().to_path_buf();

    let first = Pipeline::run(&mut scenario_workbook(), &config)?;
    let orders_before = fs::read(dir.path().join("orders.json"))?;
    let metadata_before = fs::read(dir.path().join("metadata.json"))?;

    let second = Pipeline::run(&mut scenario_workbook(), &config)?;
    assert_eq!(fs::read(dir.path().join("orders.json"))?, orders_before);
    assert_eq!(fs::read(dir.path().join("metadata.json"))?, metadata_before);
    assert_eq!(first.exports, second.exports);
    Ok(())
}

#[test]
fn sentinel_strings_never_reach_the_output() -> Result<()> {
    let dir = tempdir()?;
    let mut config = ConvertConfig::default();
    config.output_dir = dir.path().to_path_buf();

    let mut workbook = InMemoryWorkbook::new().with_sheet(
        "1-2000",
        vec![
            vec![text("Order No"), text("Order By"), text("Email"), text("Mobile No"), text("State"), text("Item Name")],
            vec![text("7"), text("nan"), text("None"), text("NaN"), text("NaT"), text("")],
            vec![text("8"), text(" Siti "), text("siti@example.com"), CellValue::Number(60123456789.0), text("none of the above"), text("Milo")],
        ],
    );
    Pipeline::run(&mut workbook, &config)?;

    let orders = fs::read_to_string(dir.path().join("orders.json"))?;
    for sentinel in ["\"nan\"", "\"None\"", "\"NaN\"", "\"NaT\"", "\"\""] {
        assert!(!orders.contains(sentinel), "{} leaked into {}", sentinel, orders);
    }
    let parsed: Value = serde_json::from_str(&orders)?;
    assert_eq!(parsed[1]["customerName"], "Siti");
    assert_eq!(parsed[1]["mobileNo"], "60123456789");
    assert!(parsed[1]["state"].is_null());
    // Sheet has no total or date columns
    assert_eq!(parsed[0]["orderTotal"], 0.0);
    assert!(parsed[0]["orderYear"].is_null());
    Ok(())
}

#[test]
fn config_file_overrides_headers_and_sheets() -> Result<()> {
    let dir = tempdir()?;
    let config_path = dir.path().join("export.toml");
    fs::write(
        &config_path,
        format!(
            "output_dir = {:?}\nsheets = [\"Orders\"]\n\n[columns]\norderNo = [\"Invoice #\"]\n",
            dir.path().join("out").display().to_string()
        ),
    )?;
    let config = ConvertConfig::load(&config_path)?;

    let mut workbook = InMemoryWorkbook::new().with_sheet(
        "Orders",
        vec![
            vec![text("Invoice #"), text("Order Total")],
            vec![text("INV-1"), text("RM 12.50")],
        ],
    );
    let result = Pipeline::run(&mut workbook, &config)?;
    assert_eq!(result.records_written, 1);
    assert_eq!(result.total_revenue, 12.5);
    assert!(dir.path().join("out").join("metadata.json").exists());
    Ok(())
}
