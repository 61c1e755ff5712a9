use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{budget_statuses, month_total, BudgetStatus, MonthKey};
use crate::models::{total_budget, Budgets, Transaction};

pub(crate) const FALLBACK_INSIGHT: &str =
    "Start adding transactions and setting budgets to see personalized insights.";

const MAX_BUDGET_WARNINGS: usize = 3;

/// Plain-language observations about the current month, in display order:
/// the month-over-month trend, up to three over-budget warnings, then praise
/// for staying under the total budget. Never empty.
pub(crate) fn insights(txns: &[Transaction], budgets: &Budgets, today: NaiveDate) -> Vec<String> {
    let month = MonthKey::of(today);
    let current_total = month_total(txns, month);
    let previous_total = month_total(txns, month.previous());

    let mut out = Vec::new();

    if let Some(line) = trend(current_total, previous_total) {
        out.push(line);
    }

    out.extend(
        over_budget(budget_statuses(txns, budgets, month))
            .iter()
            .filter_map(budget_warning),
    );

    if let Some(line) = under_budget(current_total, total_budget(budgets)) {
        out.push(line);
    }

    if out.is_empty() {
        out.push(FALLBACK_INSIGHT.to_string());
    }
    out
}

fn trend(current: Decimal, previous: Decimal) -> Option<String> {
    if previous <= Decimal::ZERO {
        return None;
    }
    let change = percent_of(current.saturating_sub(previous), previous)?;
    let direction = if change >= Decimal::ZERO {
        "increased"
    } else {
        "decreased"
    };
    Some(format!(
        "Your spending has {direction} by {}% compared to last month.",
        one_place(change.abs())
    ))
}

/// Categories over their limit, largest overage first, capped at three.
/// Zero limits have no meaningful percentage and are left out.
fn over_budget(mut rows: Vec<BudgetStatus>) -> Vec<BudgetStatus> {
    rows.retain(|r| r.is_over() && r.budget > Decimal::ZERO);
    rows.sort_by(|a, b| b.overspent.cmp(&a.overspent));
    rows.truncate(MAX_BUDGET_WARNINGS);
    rows
}

fn budget_warning(row: &BudgetStatus) -> Option<String> {
    let percent_over = percent_of(row.overspent, row.budget)?;
    Some(format!(
        "You've exceeded your {} budget by {}% (${}).",
        row.category,
        one_place(percent_over),
        two_places(row.overspent)
    ))
}

fn under_budget(current: Decimal, total: Decimal) -> Option<String> {
    if total <= Decimal::ZERO || current >= total {
        return None;
    }
    let saved = total.saturating_sub(current);
    let percent_saved = percent_of(saved, total)?;
    Some(format!(
        "Great job! You're under your total budget by ${} ({}%).",
        two_places(saved),
        one_place(percent_saved)
    ))
}

/// `part / whole * 100`, or `None` if it cannot be represented.
fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

fn one_place(value: Decimal) -> String {
    format!(
        "{:.1}",
        value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn two_places(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
