//! Derived views over a transaction list and a budget map.
//!
//! Everything here is pure: the caller passes the evaluation date and gets
//! freshly computed data back. Nothing is cached between calls.

mod insights;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{saturating_sum, Budgets, Category, Transaction};

pub(crate) use insights::{insights, FALLBACK_INSIGHT};

/// Number of entries in [`MonthlySummary::recent_transactions`].
pub(crate) const RECENT_LIMIT: usize = 3;

/// Number of points in [`monthly_series`].
pub(crate) const SERIES_MONTHS: usize = 6;

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct MonthKey {
    pub(crate) year: i32,
    /// 1-based, January = 1.
    pub(crate) month: u32,
}

impl MonthKey {
    pub(crate) fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Move by `delta` calendar months (negative goes back in time).
    pub(crate) fn shift(self, delta: i32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub(crate) fn previous(self) -> Self {
        self.shift(-1)
    }

    /// Short human label, e.g. "Oct 2026".
    pub(crate) fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }

    /// Long human label, e.g. "October 2026".
    pub(crate) fn long_label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthlySummary {
    pub(crate) month: MonthKey,
    pub(crate) total_expenses: Decimal,
    /// `None` when nothing was spent this month.
    pub(crate) top_category: Option<Category>,
    pub(crate) top_category_amount: Decimal,
    pub(crate) recent_transactions: Vec<Transaction>,
}

impl MonthlySummary {
    pub(crate) fn top_category_label(&self) -> &'static str {
        self.top_category.map(|c| c.as_str()).unwrap_or("None")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthlyPoint {
    pub(crate) month: MonthKey,
    pub(crate) label: String,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryTotal {
    pub(crate) category: Category,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetStatus {
    pub(crate) category: Category,
    pub(crate) budget: Decimal,
    pub(crate) spent: Decimal,
    pub(crate) remaining: Decimal,
    pub(crate) overspent: Decimal,
}

impl BudgetStatus {
    fn new(category: Category, budget: Decimal, spent: Decimal) -> Self {
        let remaining = budget.saturating_sub(spent).max(Decimal::ZERO);
        let overspent = if spent > budget {
            spent.saturating_sub(budget)
        } else {
            Decimal::ZERO
        };
        Self {
            category,
            budget,
            spent,
            remaining,
            overspent,
        }
    }

    pub(crate) fn is_over(&self) -> bool {
        self.spent > self.budget
    }
}

// ── Shared primitives ─────────────────────────────────────────

/// Transactions dated inside `month`, in their original order.
pub(crate) fn month_transactions(txns: &[Transaction], month: MonthKey) -> Vec<&Transaction> {
    txns.iter().filter(|t| month.contains(t.date)).collect()
}

pub(crate) fn month_total(txns: &[Transaction], month: MonthKey) -> Decimal {
    saturating_sum(
        txns.iter()
            .filter(|t| month.contains(t.date))
            .map(|t| t.amount),
    )
}

/// Sum per category, keyed in the order each category is first seen.
fn spending_by_category<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<(Category, Decimal)> {
    let mut totals: Vec<(Category, Decimal)> = Vec::new();
    for txn in txns {
        let category = txn.category_or_other();
        match totals.iter_mut().find(|(c, _)| *c == category) {
            Some((_, sum)) => *sum = sum.saturating_add(txn.amount),
            None => totals.push((category, txn.amount)),
        }
    }
    totals
}

fn spent_in(spending: &[(Category, Decimal)], category: Category) -> Decimal {
    spending
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, amt)| *amt)
        .unwrap_or(Decimal::ZERO)
}

// ── Views ─────────────────────────────────────────────────────

pub(crate) fn monthly_summary(txns: &[Transaction], today: NaiveDate) -> MonthlySummary {
    let month = MonthKey::of(today);
    let current = month_transactions(txns, month);

    let total_expenses = saturating_sum(current.iter().map(|t| t.amount));

    // First category to reach the maximum wins; later ties do not replace it.
    let mut top_category = None;
    let mut top_category_amount = Decimal::ZERO;
    for (category, amount) in spending_by_category(current.iter().copied()) {
        if amount > top_category_amount {
            top_category = Some(category);
            top_category_amount = amount;
        }
    }

    let mut recent: Vec<&Transaction> = txns.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    let recent_transactions = recent.into_iter().take(RECENT_LIMIT).cloned().collect();

    MonthlySummary {
        month,
        total_expenses,
        top_category,
        top_category_amount,
        recent_transactions,
    }
}

/// Spend per month for the six months ending with the month of `today`,
/// oldest first. Months without transactions are present with a zero total.
pub(crate) fn monthly_series(txns: &[Transaction], today: NaiveDate) -> Vec<MonthlyPoint> {
    let current = MonthKey::of(today);
    (0..SERIES_MONTHS as i32)
        .rev()
        .map(|back| {
            let month = current.shift(-back);
            MonthlyPoint {
                month,
                label: month.label(),
                total: month_total(txns, month),
            }
        })
        .collect()
}

/// All-time spend per category, largest first. Equal totals are ordered by
/// category name.
pub(crate) fn category_totals(txns: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = spending_by_category(txns)
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    totals
}

/// Current-month spend against every configured budget, most spent first.
/// Spending in categories without a budget does not appear.
pub(crate) fn budget_comparison(
    txns: &[Transaction],
    budgets: &Budgets,
    today: NaiveDate,
) -> Vec<BudgetStatus> {
    let mut rows = budget_statuses(txns, budgets, MonthKey::of(today));
    rows.sort_by(|a, b| b.spent.cmp(&a.spent));
    rows
}

/// Budget rows in budget-map order.
fn budget_statuses(txns: &[Transaction], budgets: &Budgets, month: MonthKey) -> Vec<BudgetStatus> {
    let spending = spending_by_category(month_transactions(txns, month));
    budgets
        .iter()
        .map(|(&category, &budget)| {
            BudgetStatus::new(category, budget, spent_in(&spending, category))
        })
        .collect()
}
