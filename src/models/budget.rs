use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{Category, Transaction};

/// Monthly spending limit per category. Categories without a limit are
/// absent rather than zero, and the same map applies to every month.
pub(crate) type Budgets = BTreeMap<Category, Decimal>;

/// Sum of every configured limit.
pub(crate) fn total_budget(budgets: &Budgets) -> Decimal {
    saturating_sum(budgets.values().copied())
}

/// Sum that stops at the representable bounds instead of overflowing.
pub(crate) fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Everything that gets persisted: the transaction list and the budget map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) budgets: Budgets,
}
