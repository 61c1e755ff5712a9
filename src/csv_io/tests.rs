#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::io::Write;

use super::*;
use crate::models::{Category, Transaction};
use crate::validate::validate_transaction;

fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_export_writes_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let txns = vec![
        Transaction {
            id: "1".into(),
            amount: dec!(45.99),
            date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            description: "Grocery shopping, weekly".into(),
            category: Some(Category::FoodAndDining),
        },
        Transaction {
            id: "2".into(),
            amount: dec!(3),
            date: NaiveDate::from_ymd_opt(2023, 6, 16).unwrap(),
            description: "Gum".into(),
            category: None,
        },
    ];
    assert_eq!(export_csv(&path, &txns).unwrap(), 2);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "id,date,description,category,amount");
    assert_eq!(
        lines[1],
        "1,2023-06-15,\"Grocery shopping, weekly\",Food & Dining,45.99"
    );
    assert_eq!(lines[2], "2,2023-06-16,Gum,,3");
}

#[test]
fn test_export_then_import_yields_valid_drafts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.csv");
    let original = Transaction {
        id: "x".into(),
        amount: dec!(120.50),
        date: NaiveDate::from_ymd_opt(2023, 7, 2).unwrap(),
        description: "Electricity bill".into(),
        category: Some(Category::Utilities),
    };
    export_csv(&path, std::slice::from_ref(&original)).unwrap();

    let drafts = import_csv(&path).unwrap();
    assert_eq!(drafts.len(), 1);
    let fields = validate_transaction(&drafts[0]).unwrap();
    assert_eq!(fields.into_transaction("x".into()), original);
}

#[test]
fn test_import_without_id_or_category_columns() {
    let file = write_csv(
        "Date,Amount,Description\n2024-01-05,12.00,Coffee beans\n\n2024-01-06,\"$1,200.00\",Laptop\n",
    );
    let drafts = import_csv(file.path()).unwrap();
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].date, "2024-01-05");
    assert_eq!(drafts[0].amount, "12.00");
    assert_eq!(drafts[0].description, "Coffee beans");
    assert!(drafts[0].category.is_none());
    let laptop = validate_transaction(&drafts[1]).unwrap();
    assert_eq!(laptop.amount, dec!(1200.00));
}

#[test]
fn test_import_empty_category_is_absent() {
    let file = write_csv("date,description,category,amount\n2024-01-05,Tea, ,4\n");
    let drafts = import_csv(file.path()).unwrap();
    assert!(drafts[0].category.is_none());
}

#[test]
fn test_import_missing_required_column() {
    let file = write_csv("date,description\n2024-01-05,Tea\n");
    let err = import_csv(file.path()).unwrap_err();
    assert!(err.to_string().contains("'amount'"));
}

#[test]
fn test_import_header_only() {
    let file = write_csv("date,description,amount\n");
    assert!(import_csv(file.path()).is_err());
}

#[test]
fn test_import_into_ledger_skips_invalid_rows() {
    let file = write_csv(
        "date,description,category,amount\n\
         2024-03-01,Bus pass,Transportation,60\n\
         2024-03-02,Refund,,-5\n\
         2024-03-03,,Shopping,10\n\
         2024-03-04,Lamp,Shopping,35.50\n",
    );
    let db = crate::db::Database::open_in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let mut ledger = Ledger::open(db, today).unwrap();
    let before = ledger.transactions().len();

    let report = import_into(file.path(), &mut ledger).unwrap();
    assert_eq!(report.total, 4);
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped.len(), 2);
    assert!(report.skipped[0].starts_with("row 3:"));
    assert!(report.skipped[1].starts_with("row 4:"));
    assert_eq!(ledger.transactions().len(), before + 2);

    let lamp = ledger.transactions().last().unwrap();
    assert_eq!(lamp.description, "Lamp");
    assert_eq!(lamp.category, Some(Category::Shopping));
    assert_ne!(lamp.id, "4");
}

#[test]
fn test_skipped_rows_use_file_row_numbers() {
    let file = write_csv(
        "date,description,category,amount\n\
         2024-03-01,Bus pass,Transportation,60\n\
         \n\
         ,,,\n\
         2024-03-05,Broken,Shopping,abc\n",
    );
    let db = crate::db::Database::open_in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let mut ledger = Ledger::open(db, today).unwrap();

    let report = import_into(file.path(), &mut ledger).unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].starts_with("row 5:"));
}
