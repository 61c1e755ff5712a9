//! Form-level validation. Raw user input comes in as strings and leaves as
//! typed fields; the analytics never see anything that failed here.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{Budgets, Category, Transaction};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest amount accepted for a transaction or a budget.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Unvalidated transaction input, as typed into a form or a CSV row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TransactionDraft {
    pub(crate) amount: String,
    pub(crate) date: String,
    pub(crate) description: String,
    pub(crate) category: Option<String>,
}

impl From<&Transaction> for TransactionDraft {
    fn from(txn: &Transaction) -> Self {
        Self {
            amount: txn.amount.to_string(),
            date: txn.date.format(DATE_FORMAT).to_string(),
            description: txn.description.clone(),
            category: txn.category.map(|c| c.as_str().to_string()),
        }
    }
}

/// A transaction that passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransactionFields {
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
    pub(crate) description: String,
    pub(crate) category: Option<Category>,
}

impl TransactionFields {
    pub(crate) fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            date: self.date,
            description: self.description,
            category: self.category,
        }
    }
}

pub(crate) fn validate_transaction(draft: &TransactionDraft) -> Result<TransactionFields> {
    let amount = parse_amount(&draft.amount)?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be a positive number");
    }
    if amount > MAX_AMOUNT {
        bail!("Amount must not exceed {MAX_AMOUNT}");
    }
    let date = parse_date(&draft.date)?;
    let description = draft.description.trim();
    if description.is_empty() {
        bail!("Description is required");
    }
    let category = match &draft.category {
        Some(name) => parse_category(name)?,
        None => None,
    };
    Ok(TransactionFields {
        amount,
        date,
        description: description.to_string(),
        category,
    })
}

/// Parse a currency amount, tolerating a leading `$` and thousands commas.
pub(crate) fn parse_amount(input: &str) -> Result<Decimal> {
    let cleaned = input.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        bail!("Amount is required");
    }
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount: '{}'", input.trim()))
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("Date is required");
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .with_context(|| format!("Invalid date: '{trimmed}' (expected YYYY-MM-DD)"))
}

/// Empty input means "no category".
pub(crate) fn parse_category(input: &str) -> Result<Option<Category>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match Category::parse(trimmed) {
        Some(c) => Ok(Some(c)),
        None => bail!(
            "Unknown category '{trimmed}'. Choose one of: {}",
            category_list()
        ),
    }
}

pub(crate) fn parse_budget_category(input: &str) -> Result<Category> {
    let category = parse_category(input)?.context("Category is required")?;
    if !category.is_budgetable() {
        bail!("'{category}' cannot have a budget");
    }
    Ok(category)
}

pub(crate) fn parse_budget_amount(input: &str) -> Result<Decimal> {
    let amount = parse_amount(input)?;
    if amount < Decimal::ZERO {
        bail!("Budget must be a positive number");
    }
    if amount > MAX_AMOUNT {
        bail!("Budget must not exceed {MAX_AMOUNT}");
    }
    Ok(amount)
}

/// Turn a filled-in budget form into a budget map. Blank fields mean
/// "no budget" and are dropped rather than stored as zero.
pub(crate) fn parse_budget_form(entries: &[(String, String)]) -> Result<Budgets> {
    let mut budgets = Budgets::new();
    for (name, value) in entries {
        if value.trim().is_empty() {
            continue;
        }
        let category = parse_budget_category(name)?;
        let amount =
            parse_budget_amount(value).with_context(|| format!("Budget for {category}"))?;
        budgets.insert(category, amount);
    }
    Ok(budgets)
}

fn category_list() -> String {
    Category::all()
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
