#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::analytics::FALLBACK_INSIGHT;
use crate::ui::app::InputMode;
use crate::models::Category;

fn setup() -> (App, Ledger<Database>) {
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let db = Database::open_in_memory().unwrap();
    let ledger = Ledger::open(db, today).unwrap();
    let mut app = App::new(today);
    app.refresh(&ledger);
    (app, ledger)
}

#[test]
fn test_add_with_category() {
    let (mut app, mut ledger) = setup();
    handle_command(
        "add 12.50 2024-03-02 Team lunch | food & dining",
        &mut app,
        &mut ledger,
    );
    let added = ledger.transactions().last().unwrap();
    assert_eq!(added.amount, dec!(12.50));
    assert_eq!(added.description, "Team lunch");
    assert_eq!(added.category, Some(Category::FoodAndDining));
    assert_eq!(app.status_message, "Added: Team lunch");
    assert_eq!(app.transaction_count, ledger.transactions().len());
}

#[test]
fn test_add_invalid_amount_reports_error() {
    let (mut app, mut ledger) = setup();
    let before = ledger.transactions().len();
    handle_command("add -3 2024-03-02 Nope", &mut app, &mut ledger);
    assert_eq!(ledger.transactions().len(), before);
    assert!(app.status_message.starts_with("Error:"));
}

#[test]
fn test_edit_selected_transaction() {
    let (mut app, mut ledger) = setup();
    app.screen = Screen::Transactions;
    app.transaction_index = 0;
    let id = app.selected_transaction().unwrap().id.clone();

    handle_command("edit description Wireless headphones", &mut app, &mut ledger);
    assert_eq!(ledger.find(&id).unwrap().description, "Wireless headphones");

    handle_command("edit category", &mut app, &mut ledger);
    assert!(ledger.find(&id).unwrap().category.is_none());
}

#[test]
fn test_delete_asks_for_confirmation() {
    let (mut app, mut ledger) = setup();
    app.screen = Screen::Transactions;
    let before = ledger.transactions().len();
    handle_command("delete", &mut app, &mut ledger);
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(ledger.transactions().len(), before);

    let action = app.pending_action.take().unwrap();
    apply_pending(action, &mut app, &mut ledger).unwrap();
    assert_eq!(ledger.transactions().len(), before - 1);
    assert_eq!(app.transactions.len(), before - 1);
}

#[test]
fn test_edit_and_delete_need_transactions_screen() {
    let (mut app, mut ledger) = setup();
    assert_eq!(app.screen, Screen::Dashboard);
    let before = ledger.transactions().to_vec();

    handle_command("delete", &mut app, &mut ledger);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
    assert_eq!(app.status_message, "No transaction selected");

    handle_command("edit description Changed", &mut app, &mut ledger);
    assert_eq!(app.status_message, "No transaction selected");
    assert_eq!(ledger.transactions(), before.as_slice());
}

#[test]
fn test_budget_and_clear_budget() {
    let (mut app, mut ledger) = setup();
    handle_command("budget Personal Care 80", &mut app, &mut ledger);
    assert_eq!(
        ledger.budgets().get(&Category::PersonalCare),
        Some(&dec!(80))
    );
    assert_eq!(app.budget_rows.len(), ledger.budgets().len());

    handle_command("clear-budget personal care", &mut app, &mut ledger);
    assert_eq!(
        app.pending_action,
        Some(PendingAction::ClearBudget {
            category: Category::PersonalCare
        })
    );
    let action = app.pending_action.take().unwrap();
    apply_pending(action, &mut app, &mut ledger).unwrap();
    assert!(!ledger.budgets().contains_key(&Category::PersonalCare));
}

#[test]
fn test_budget_rejects_other() {
    let (mut app, mut ledger) = setup();
    handle_command("budget Other 10", &mut app, &mut ledger);
    assert!(app.status_message.starts_with("Error:"));
    assert!(!ledger.budgets().contains_key(&Category::Other));
}

#[test]
fn test_set_budgets_replaces_form() {
    let (mut app, mut ledger) = setup();
    handle_command("set-budgets Travel=300; Shopping=; Housing=1200", &mut app, &mut ledger);
    let budgets = ledger.budgets();
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets.get(&Category::Travel), Some(&dec!(300)));
    assert_eq!(budgets.get(&Category::Housing), Some(&dec!(1200)));
}

#[test]
fn test_empty_ledger_shows_fallback_insight() {
    let (mut app, mut ledger) = setup();
    let ids: Vec<String> = ledger.transactions().iter().map(|t| t.id.clone()).collect();
    for id in ids {
        ledger.delete_transaction(&id).unwrap();
    }
    ledger.set_budgets(Default::default());
    app.refresh(&ledger);
    assert_eq!(app.insights, vec![FALLBACK_INSIGHT.to_string()]);
    assert_eq!(app.summary.top_category_label(), "None");
    assert!(app.budget_rows.is_empty());
    assert!(app.selected_transaction().is_none());
}

#[test]
fn test_export_and_import_round_trip() {
    let (mut app, mut ledger) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let path_str = path.to_str().unwrap();
    let before = ledger.transactions().len();

    handle_command(&format!("export {path_str}"), &mut app, &mut ledger);
    assert!(path.exists());

    handle_command(&format!("import {path_str}"), &mut app, &mut ledger);
    assert_eq!(ledger.transactions().len(), before * 2);
    assert_eq!(app.screen, Screen::Transactions);
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut ledger) = setup();
    handle_command("exprt", &mut app, &mut ledger);
    assert_eq!(
        app.status_message,
        "Unknown command: :exprt. Did you mean :export?"
    );
}

#[test]
fn test_quit() {
    let (mut app, mut ledger) = setup();
    handle_command("q", &mut app, &mut ledger);
    assert!(!app.running);
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("same", "same"), 0);
}
