#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_new_assigns_unique_ids() {
    let a = Transaction::new(dec!(10), date(2024, 1, 1), "A".into(), None);
    let b = Transaction::new(dec!(10), date(2024, 1, 1), "A".into(), None);
    assert!(!a.id.is_empty());
    assert_ne!(a.id, b.id);
}

#[test]
fn test_missing_category_counts_as_other() {
    let txn = Transaction::new(dec!(5), date(2024, 1, 1), "Snack".into(), None);
    assert_eq!(txn.category_or_other(), Category::Other);
    assert!(txn.category.is_none());
}

#[test]
fn test_explicit_category_is_kept() {
    let txn = Transaction::new(
        dec!(5),
        date(2024, 1, 1),
        "Bus".into(),
        Some(Category::Transportation),
    );
    assert_eq!(txn.category_or_other(), Category::Transportation);
}

#[test]
fn test_short_id() {
    let mut txn = Transaction::new(dec!(1), date(2024, 1, 1), "x".into(), None);
    assert_eq!(txn.short_id().len(), 8);
    txn.id = "42".into();
    assert_eq!(txn.short_id(), "42");
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_parse() {
    assert_eq!(Category::parse("Food & Dining"), Some(Category::FoodAndDining));
    assert_eq!(Category::parse("food & dining"), Some(Category::FoodAndDining));
    assert_eq!(Category::parse("Food and Dining"), Some(Category::FoodAndDining));
    assert_eq!(Category::parse("  utilities "), Some(Category::Utilities));
    assert_eq!(
        Category::parse("gifts and donations"),
        Some(Category::GiftsAndDonations)
    );
    assert_eq!(Category::parse("Groceries"), None);
    assert_eq!(Category::parse(""), None);
}

#[test]
fn test_category_all() {
    let all = Category::all();
    assert_eq!(all.len(), 14);
    assert_eq!(all[0], Category::FoodAndDining);
    assert_eq!(all[13], Category::Other);
}

#[test]
fn test_category_roundtrip() {
    for c in Category::all() {
        let s = c.as_str();
        assert_eq!(Category::parse(s), Some(*c), "Roundtrip failed for {s}");
    }
}

#[test]
fn test_category_display() {
    assert_eq!(format!("{}", Category::PersonalCare), "Personal Care");
    assert_eq!(format!("{}", Category::Other), "Other");
}

#[test]
fn test_budgetable_categories() {
    assert!(!Category::Other.is_budgetable());
    assert!(!Category::Investments.is_budgetable());
    assert!(!Category::Income.is_budgetable());
    assert!(Category::Shopping.is_budgetable());
    assert_eq!(Category::budgetable().count(), 11);
    assert_eq!(Category::budgetable().last(), Some(Category::GiftsAndDonations));
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_total_budget() {
    let mut budgets = Budgets::new();
    assert_eq!(total_budget(&budgets), dec!(0));
    budgets.insert(Category::FoodAndDining, dec!(500));
    budgets.insert(Category::Shopping, dec!(200.50));
    assert_eq!(total_budget(&budgets), dec!(700.50));
}
