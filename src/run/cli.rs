use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::analytics::{self, MonthKey};
use crate::csv_io;
use crate::db::Database;
use crate::ledger::Ledger;
use crate::models::Category;
use crate::ui::util::{format_amount, truncate};
use crate::validate::{self, TransactionDraft};

pub(crate) fn as_cli(
    args: &[String],
    ledger: &mut Ledger<Database>,
    today: NaiveDate,
) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "add" | "a" => cli_add(rest, ledger),
        "edit" | "e" => cli_edit(rest, ledger),
        "delete" | "rm" => cli_delete(rest, ledger),
        "list" | "ls" => cli_list(rest, ledger),
        "summary" | "s" => cli_summary(ledger, today),
        "series" => cli_series(ledger, today),
        "categories" => cli_categories(ledger),
        "budgets" => cli_budgets(ledger, today),
        "budget" => cli_budget(rest, ledger),
        "insights" | "i" => cli_insights(ledger, today),
        "export" => cli_export(rest, ledger, today),
        "import" => cli_import(rest, ledger),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("finviz {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("finviz — local-only personal finance dashboard");
    println!();
    println!("Usage: finviz [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive dashboard");
    println!("  add <amount> <date> <description>   Record a transaction (date: YYYY-MM-DD)");
    println!("    --category <name>                 Category (default: none)");
    println!("  edit <id> [--amount X] [--date D] [--description T] [--category C | --no-category]");
    println!("  delete <id>                         Delete a transaction (id prefix is enough)");
    println!("  list [--month YYYY-MM]              List transactions");
    println!("  summary                             Current month summary");
    println!("  series                              Spending over the last 6 months");
    println!("  categories                          All-time spending by category");
    println!("  budgets                             Budget vs. actual for this month");
    println!("  budget set <category> <amount>      Set a monthly budget");
    println!("  budget clear <category>             Remove a monthly budget");
    println!("  insights                            Spending insights");
    println!("  export [path]                       Export transactions to CSV");
    println!("  import <file.csv>                   Import transactions from CSV");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("Environment: FINVIZ_DB overrides the database path, RUST_LOG sets log level.");
}

// ── Argument helpers ─────────────────────────────────────────

const VALUE_FLAGS: &[&str] = &["--category", "--amount", "--date", "--description", "--month"];

/// Value following `flag`, if present.
pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

pub(crate) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor the values of known flags.
pub(crate) fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

// ── Transactions ─────────────────────────────────────────────

fn cli_add(args: &[String], ledger: &mut Ledger<Database>) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 3 {
        bail!("Usage: finviz add <amount> <date> <description> [--category <name>]");
    }
    let draft = TransactionDraft {
        amount: pos[0].to_string(),
        date: pos[1].to_string(),
        description: pos[2..].join(" "),
        category: flag_value(args, "--category").map(String::from),
    };
    let fields = validate::validate_transaction(&draft)?;
    let id = ledger.add_transaction(fields);
    println!("Added transaction {id}");
    Ok(())
}

fn cli_edit(args: &[String], ledger: &mut Ledger<Database>) -> Result<()> {
    let pos = positionals(args);
    let Some(key) = pos.first() else {
        bail!("Usage: finviz edit <id> [--amount X] [--date D] [--description T] [--category C]");
    };
    let existing = ledger.find(key)?;
    let id = existing.id.clone();
    let mut draft = TransactionDraft::from(existing);

    if let Some(amount) = flag_value(args, "--amount") {
        draft.amount = amount.to_string();
    }
    if let Some(date) = flag_value(args, "--date") {
        draft.date = date.to_string();
    }
    if let Some(description) = flag_value(args, "--description") {
        draft.description = description.to_string();
    }
    if has_flag(args, "--no-category") {
        draft.category = None;
    } else if let Some(category) = flag_value(args, "--category") {
        draft.category = Some(category.to_string());
    }

    let fields = validate::validate_transaction(&draft)?;
    ledger.update_transaction(&id, fields)?;
    println!("Updated transaction {id}");
    Ok(())
}

fn cli_delete(args: &[String], ledger: &mut Ledger<Database>) -> Result<()> {
    let Some(key) = args.first() else {
        bail!("Usage: finviz delete <id>");
    };
    let removed = ledger.delete_transaction(key)?;
    println!("Deleted: {} ({})", removed.description, format_amount(removed.amount));
    Ok(())
}

fn cli_list(args: &[String], ledger: &Ledger<Database>) -> Result<()> {
    let month = match flag_value(args, "--month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let txns: Vec<_> = match month {
        Some(m) => analytics::month_transactions(ledger.transactions(), m),
        None => ledger.transactions().iter().collect(),
    };
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<10} {:<10} {:<32} {:<18} {:>12}",
        "ID", "Date", "Description", "Category", "Amount"
    );
    println!("{}", "─".repeat(86));
    for txn in txns {
        println!(
            "{:<10} {:<10} {:<32} {:<18} {:>12}",
            txn.short_id(),
            txn.date.format(validate::DATE_FORMAT).to_string(),
            truncate(&txn.description, 32),
            txn.category.map(|c| c.as_str()).unwrap_or("—"),
            format_amount(txn.amount),
        );
    }
    Ok(())
}

pub(crate) fn parse_month(input: &str) -> Result<MonthKey> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), validate::DATE_FORMAT)
        .map_err(|_| anyhow::anyhow!("Invalid month '{input}' (expected YYYY-MM)"))?;
    Ok(MonthKey::of(date))
}

// ── Views ────────────────────────────────────────────────────

fn cli_summary(ledger: &Ledger<Database>, today: NaiveDate) -> Result<()> {
    let summary = analytics::monthly_summary(ledger.transactions(), today);

    println!("finviz — {}", summary.month.long_label());
    println!("{}", "─".repeat(40));
    println!("  Total Expenses:  {}", format_amount(summary.total_expenses));
    println!(
        "  Top Category:    {} ({})",
        summary.top_category_label(),
        format_amount(summary.top_category_amount)
    );
    println!("  Total Txns:      {}", ledger.transactions().len());

    println!();
    println!("Recent Transactions:");
    if summary.recent_transactions.is_empty() {
        println!("  No recent transactions");
    }
    for txn in &summary.recent_transactions {
        println!(
            "  {}  {:<28} {:>12}",
            txn.date.format(validate::DATE_FORMAT),
            truncate(&txn.description, 28),
            format_amount(txn.amount)
        );
    }
    Ok(())
}

fn cli_series(ledger: &Ledger<Database>, today: NaiveDate) -> Result<()> {
    let series = analytics::monthly_series(ledger.transactions(), today);
    let max = series
        .iter()
        .map(|p| p.total)
        .max()
        .unwrap_or_default();
    println!("Monthly Expenses");
    println!("{}", "─".repeat(52));
    for point in &series {
        println!(
            "  {:<9} {:>12}  {}",
            point.label,
            format_amount(point.total),
            crate::ui::util::bar(point.total, max, 24)
        );
    }
    Ok(())
}

fn cli_categories(ledger: &Ledger<Database>) -> Result<()> {
    let totals = analytics::category_totals(ledger.transactions());
    if totals.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    println!("Spending by Category (all time)");
    println!("{}", "─".repeat(40));
    for row in &totals {
        println!("  {:<24} {:>12}", row.category, format_amount(row.total));
    }
    Ok(())
}

fn cli_budgets(ledger: &Ledger<Database>, today: NaiveDate) -> Result<()> {
    let rows = analytics::budget_comparison(ledger.transactions(), ledger.budgets(), today);
    if rows.is_empty() {
        println!("No budgets set. Use: finviz budget set <category> <amount>");
        return Ok(());
    }
    println!("Budget vs. Actual — {}", MonthKey::of(today).long_label());
    println!(
        "  {:<20} {:>12} {:>12} {:>12} {:>12}",
        "Category", "Budget", "Spent", "Remaining", "Over"
    );
    println!("{}", "─".repeat(72));
    for row in &rows {
        println!(
            "  {:<20} {:>12} {:>12} {:>12} {:>12}",
            row.category.as_str(),
            format_amount(row.budget),
            format_amount(row.spent),
            format_amount(row.remaining),
            format_amount(row.overspent),
        );
    }
    Ok(())
}

fn cli_budget(args: &[String], ledger: &mut Ledger<Database>) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("set") if args.len() >= 3 => {
            let Some((amount, name)) = args[1..].split_last() else {
                bail!("Usage: finviz budget set <category> <amount>");
            };
            let category = validate::parse_budget_category(&name.join(" "))?;
            let amount = validate::parse_budget_amount(amount)?;
            ledger.set_budget(category, amount)?;
            println!("Budget set: {category} = {}", format_amount(amount));
            Ok(())
        }
        Some("clear") if args.len() >= 2 => {
            let category = validate::parse_budget_category(&args[1..].join(" "))?;
            if ledger.clear_budget(category) {
                println!("Budget cleared: {category}");
            } else {
                println!("No budget set for {category}");
            }
            Ok(())
        }
        _ => {
            let names: Vec<&str> = Category::budgetable().map(|c| c.as_str()).collect();
            bail!(
                "Usage: finviz budget set <category> <amount> | finviz budget clear <category>\nCategories: {}",
                names.join(", ")
            );
        }
    }
}

fn cli_insights(ledger: &Ledger<Database>, today: NaiveDate) -> Result<()> {
    println!("Spending Insights");
    println!("{}", "─".repeat(40));
    for line in analytics::insights(ledger.transactions(), ledger.budgets(), today) {
        println!("  • {line}");
    }
    Ok(())
}

// ── CSV ──────────────────────────────────────────────────────

fn cli_export(args: &[String], ledger: &Ledger<Database>, today: NaiveDate) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/finviz-export-{}.csv", today.format(validate::DATE_FORMAT))
        });

    let count = csv_io::export_csv(Path::new(&output_path), ledger.transactions())?;
    println!("Exported {count} transactions to {output_path}");
    Ok(())
}

fn cli_import(args: &[String], ledger: &mut Ledger<Database>) -> Result<()> {
    let Some(file_path) = args.first() else {
        bail!("Usage: finviz import <file.csv>");
    };
    let path = shellexpand(file_path);
    let path = Path::new(&path);
    if !path.exists() {
        bail!("File not found: {file_path}");
    }

    let report = csv_io::import_into(path, ledger)?;
    for skipped in &report.skipped {
        eprintln!("Skipping {skipped}");
    }
    println!(
        "Imported {} transactions ({} skipped)",
        report.imported,
        report.skipped.len()
    );
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
