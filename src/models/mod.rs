mod budget;
mod category;
mod transaction;

pub(crate) use budget::{saturating_sum, total_budget, Budgets, Snapshot};
pub(crate) use category::Category;
pub(crate) use transaction::Transaction;

#[cfg(test)]
mod tests;
