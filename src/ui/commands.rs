use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use super::app::{App, PendingAction, Screen};
use crate::csv_io;
use crate::db::Database;
use crate::ledger::Ledger;
use crate::run::shellexpand;
use crate::validate::{self, TransactionDraft};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Ledger<Database>) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit finviz", cmd_quit, r);
    register_command!("quit", "Quit finviz", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add transaction (e.g. :add 12.50 2024-01-15 Lunch | Food & Dining)",
        cmd_add,
        r
    );
    register_command!(
        "edit",
        "Edit selected transaction (e.g. :edit amount 14.00)",
        cmd_edit,
        r
    );
    register_command!("delete", "Delete selected transaction", cmd_delete, r);
    register_command!(
        "budget",
        "Set budget (e.g. :budget Food & Dining 500)",
        cmd_budget,
        r
    );
    register_command!(
        "set-budgets",
        "Replace all budgets (e.g. :set-budgets Travel=300; Shopping=150)",
        cmd_set_budgets,
        r
    );
    register_command!(
        "clear-budget",
        "Remove a budget (selected row, or :clear-budget Travel)",
        cmd_clear_budget,
        r
    );
    register_command!(
        "export",
        "Export transactions to CSV (e.g. :export ~/finviz.csv)",
        cmd_export,
        r
    );
    register_command!(
        "i",
        "Import transactions from CSV (e.g. :i ~/bank.csv)",
        cmd_import,
        r
    );
    register_command!(
        "import",
        "Import transactions from CSV (e.g. :import ~/bank.csv)",
        cmd_import,
        r
    );

    r
});

/// Run one command line. Failures are reported on the status line; the
/// dashboard keeps running.
pub(crate) fn handle_command(input: &str, app: &mut App, ledger: &mut Ledger<Database>) {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, ledger) {
            app.set_status(format!("Error: {e:#}"));
        }
        app.refresh(ledger);
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_transactions(
    _args: &str,
    app: &mut App,
    _ledger: &mut Ledger<Database>,
) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    Ok(())
}

fn cmd_budgets(_args: &str, app: &mut App, _ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

/// `<amount> <date> <description> [| <category>]`
fn cmd_add(args: &str, app: &mut App, ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    let (fields, category) = match args.split_once('|') {
        Some((fields, category)) => (fields, Some(category.trim().to_string())),
        None => (args, None),
    };
    let parts: Vec<&str> = fields.split_whitespace().collect();
    if parts.len() < 3 {
        app.set_status("Usage: :add <amount> <date> <description> [| <category>]");
        return Ok(());
    }

    let draft = TransactionDraft {
        amount: parts[0].to_string(),
        date: parts[1].to_string(),
        description: parts[2..].join(" "),
        category,
    };
    let fields = validate::validate_transaction(&draft)?;
    let description = fields.description.clone();
    ledger.add_transaction(fields);
    app.set_status(format!("Added: {description}"));
    Ok(())
}

/// `<field> <value>` applied to the selected transaction.
fn cmd_edit(args: &str, app: &mut App, ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    let selected = app
        .selected_transaction()
        .filter(|_| app.screen == Screen::Transactions);
    let Some(txn) = selected else {
        app.set_status("No transaction selected");
        return Ok(());
    };
    let id = txn.id.clone();
    let mut draft = TransactionDraft::from(txn);

    let (field, value) = args.split_once(' ').unwrap_or((args, ""));
    let value = value.trim().to_string();
    match field {
        "amount" => draft.amount = value,
        "date" => draft.date = value,
        "description" | "desc" => draft.description = value,
        "category" | "cat" => draft.category = Some(value),
        _ => {
            app.set_status("Usage: :edit <amount|date|description|category> <value>");
            return Ok(());
        }
    }

    let fields = validate::validate_transaction(&draft)?;
    ledger.update_transaction(&id, fields)?;
    app.set_status(format!("Updated {field}"));
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    let selected = app
        .selected_transaction()
        .filter(|_| app.screen == Screen::Transactions);
    let Some(txn) = selected else {
        app.set_status("No transaction selected");
        return Ok(());
    };
    let action = PendingAction::DeleteTransaction {
        id: txn.id.clone(),
        description: txn.description.clone(),
    };
    let message = format!("Delete '{}'?", txn.description);
    app.confirm(message, action);
    Ok(())
}

/// `<category> <amount>`, the category may contain spaces.
fn cmd_budget(args: &str, app: &mut App, ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    let Some((name, amount)) = args.rsplit_once(' ') else {
        app.set_status("Usage: :budget <category> <amount>. Example: :budget Food & Dining 500");
        return Ok(());
    };
    let category = validate::parse_budget_category(name)?;
    let amount = validate::parse_budget_amount(amount)?;
    ledger.set_budget(category, amount)?;
    app.set_status(format!("Budget set: {category} = {}", super::util::format_amount(amount)));
    Ok(())
}

/// Whole budget form in one line: `Category=amount; ...`. Blank amounts are
/// dropped, and anything not listed is removed.
fn cmd_set_budgets(args: &str, app: &mut App, ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    let mut entries = Vec::new();
    for entry in args.split(';').filter(|e| !e.trim().is_empty()) {
        let Some((name, amount)) = entry.split_once('=') else {
            app.set_status(format!("Expected Category=amount, got '{}'", entry.trim()));
            return Ok(());
        };
        entries.push((name.trim().to_string(), amount.trim().to_string()));
    }
    let budgets = validate::parse_budget_form(&entries)?;
    let count = budgets.len();
    ledger.set_budgets(budgets);
    app.set_status(format!("Saved {count} budgets"));
    Ok(())
}

fn cmd_clear_budget(args: &str, app: &mut App, _ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    let category = if args.is_empty() {
        let selected = app
            .selected_budget()
            .map(|row| row.category)
            .filter(|_| app.screen == Screen::Budgets);
        let Some(category) = selected else {
            app.set_status("Usage: :clear-budget <category>");
            return Ok(());
        };
        category
    } else {
        validate::parse_budget_category(args)?
    };
    app.confirm(
        format!("Remove the {category} budget?"),
        PendingAction::ClearBudget { category },
    );
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!(
            "{home}/finviz-export-{}.csv",
            app.today.format(validate::DATE_FORMAT)
        )
    } else {
        shellexpand(args)
    };

    let count = csv_io::export_csv(Path::new(&path), ledger.transactions())?;
    if count == 0 {
        app.set_status("No transactions to export");
    } else {
        app.set_status(format!("Exported {count} transactions to {path}"));
    }
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, ledger: &mut Ledger<Database>) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <file.csv>");
        return Ok(());
    }
    let path = shellexpand(args);
    let report = csv_io::import_into(Path::new(&path), ledger)?;
    let mut msg = format!("Imported {} of {} rows", report.imported, report.total);
    if let Some(first) = report.skipped.first() {
        msg.push_str(&format!(" (skipped {first}"));
        if report.skipped.len() > 1 {
            msg.push_str(&format!(" and {} more", report.skipped.len() - 1));
        }
        msg.push(')');
    }
    app.set_status(msg);
    app.screen = Screen::Transactions;
    Ok(())
}

/// Carry out a confirmed [`PendingAction`].
pub(crate) fn apply_pending(
    action: PendingAction,
    app: &mut App,
    ledger: &mut Ledger<Database>,
) -> anyhow::Result<()> {
    match action {
        PendingAction::DeleteTransaction { id, description } => {
            ledger.delete_transaction(&id)?;
            app.set_status(format!("Deleted: {description}"));
        }
        PendingAction::ClearBudget { category } => {
            if ledger.clear_budget(category) {
                app.set_status(format!("Budget removed: {category}"));
            } else {
                app.set_status(format!("No budget set for {category}"));
            }
        }
    }
    app.refresh(ledger);
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
