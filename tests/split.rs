use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use tempfile::TempDir;

use ordersplit::{split_sales, SplitError};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

// Copies a fixture into its own directory, so each test gets a fresh
// output location.
fn stage(fixture: &str, tmp: &TempDir) -> PathBuf {
    let staged = tmp.path().join("sales.csv");
    fs::copy(Path::new("testdata").join(fixture), &staged).unwrap();
    staged
}

fn sheet_cells(path: &Path, sheet_name: &str) -> calamine::Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook.worksheet_range(sheet_name).unwrap()
}

#[test]
fn splits_the_export_into_one_workbook_per_order() {
    let tmp = TempDir::new().unwrap();
    let sales_csv = stage("sample.csv", &tmp);

    let written = split_sales(&sales_csv, day()).unwrap();

    let orders_dir = tmp.path().join("Orders_2024-03-01");
    assert!(orders_dir.is_dir());
    assert_eq!(
        written,
        vec![
            orders_dir.join("Order_1.xlsx"),
            orders_dir.join("Order_2.xlsx")
        ]
    );

    let cells = sheet_cells(&written[0], "Order 1");
    // Header row: order id dropped, derived total appended.
    assert_eq!(cells.get_value((0, 0)), Some(&Data::String("ITEM NUMBER".into())));
    assert_eq!(cells.get_value((0, 1)), Some(&Data::String("PRODUCT NAME".into())));
    assert_eq!(cells.get_value((0, 4)), Some(&Data::String("TOTAL PRICE".into())));
    // Line items sorted by item number, regardless of file order.
    assert_eq!(cells.get_value((1, 0)), Some(&Data::Float(1.0)));
    assert_eq!(cells.get_value((1, 1)), Some(&Data::String("Gadget".into())));
    assert_eq!(cells.get_value((1, 3)), Some(&Data::Float(10.0)));
    assert_eq!(cells.get_value((1, 4)), Some(&Data::Float(10.0)));
    assert_eq!(cells.get_value((2, 0)), Some(&Data::Float(2.0)));
    assert_eq!(cells.get_value((2, 3)), Some(&Data::Float(5.0)));
    assert_eq!(cells.get_value((2, 4)), Some(&Data::Float(15.0)));
    // Summary row is last: marker in the item number column, sum in the
    // total column, everything else blank.
    assert_eq!(cells.get_value((3, 0)), Some(&Data::String("GRAND TOTAL".into())));
    assert_eq!(cells.get_value((3, 4)), Some(&Data::Float(25.0)));
    assert_eq!(cells.height(), 4);

    let cells = sheet_cells(&written[1], "Order 2");
    assert_eq!(cells.get_value((1, 0)), Some(&Data::Float(1.0)));
    assert_eq!(cells.get_value((1, 4)), Some(&Data::Float(15.0)));
    assert_eq!(cells.get_value((2, 0)), Some(&Data::String("GRAND TOTAL".into())));
    assert_eq!(cells.get_value((2, 4)), Some(&Data::Float(15.0)));
}

#[test]
fn rerunning_on_the_same_day_overwrites_rather_than_accumulates() {
    let tmp = TempDir::new().unwrap();
    let sales_csv = stage("sample.csv", &tmp);

    let first = split_sales(&sales_csv, day()).unwrap();
    let second = split_sales(&sales_csv, day()).unwrap();

    assert_eq!(first, second);
    let entries = fs::read_dir(tmp.path().join("Orders_2024-03-01")).unwrap();
    assert_eq!(entries.count(), 2, "re-run must not add artifacts");
    let cells = sheet_cells(&second[0], "Order 1");
    assert_eq!(cells.get_value((3, 4)), Some(&Data::Float(25.0)));
}

#[test]
fn workbooks_come_out_in_natural_order_of_order_id() {
    let tmp = TempDir::new().unwrap();
    let sales_csv = stage("multi.csv", &tmp);

    let written = split_sales(&sales_csv, day()).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["Order_1.xlsx", "Order_2.xlsx", "Order_10.xlsx"]);
}

#[test]
fn a_missing_required_column_aborts_with_no_artifacts() {
    let tmp = TempDir::new().unwrap();
    let sales_csv = stage("missing_price.csv", &tmp);

    let err = split_sales(&sales_csv, day()).unwrap_err();

    match err {
        SplitError::Schema(missing) => assert_eq!(missing, vec!["ITEM PRICE".to_string()]),
        other => panic!("expected schema error, got {other}"),
    }
    // The dated directory is created before validation, but stays empty.
    let orders_dir = tmp.path().join("Orders_2024-03-01");
    assert!(orders_dir.is_dir());
    assert_eq!(fs::read_dir(&orders_dir).unwrap().count(), 0);
}

#[test]
fn a_non_numeric_price_aborts_before_any_artifact_is_written() {
    let tmp = TempDir::new().unwrap();
    let sales_csv = stage("bad_price.csv", &tmp);

    let err = split_sales(&sales_csv, day()).unwrap_err();

    assert!(matches!(err, SplitError::DataType { .. }), "{err}");
    let orders_dir = tmp.path().join("Orders_2024-03-01");
    assert_eq!(fs::read_dir(&orders_dir).unwrap().count(), 0);
}
