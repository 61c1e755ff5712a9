//! The in-memory state container. Every mutation builds a new snapshot,
//! swaps it in, and hands it to the persistence layer.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::models::{Budgets, Category, Snapshot, Transaction};
use crate::validate::{TransactionFields, MAX_AMOUNT};

/// Where snapshots are loaded from and saved to.
pub(crate) trait Persistence {
    /// Previously saved state, or [`default_snapshot`] for whatever part was
    /// never saved.
    fn load_or_default(&self, today: NaiveDate) -> Result<Snapshot>;

    fn persist(&mut self, snapshot: &Snapshot) -> Result<()>;
}

pub(crate) struct Ledger<P: Persistence> {
    store: P,
    snapshot: Snapshot,
}

impl<P: Persistence> Ledger<P> {
    pub(crate) fn open(store: P, today: NaiveDate) -> Result<Self> {
        let snapshot = store.load_or_default(today)?;
        debug!(
            "Loaded {} transactions and {} budgets",
            snapshot.transactions.len(),
            snapshot.budgets.len()
        );
        Ok(Self { store, snapshot })
    }

    pub(crate) fn transactions(&self) -> &[Transaction] {
        &self.snapshot.transactions
    }

    pub(crate) fn budgets(&self) -> &Budgets {
        &self.snapshot.budgets
    }

    pub(crate) fn store(&self) -> &P {
        &self.store
    }

    /// Look up a transaction by full id or by an unambiguous id prefix.
    pub(crate) fn find(&self, key: &str) -> Result<&Transaction> {
        let key = key.trim();
        if key.is_empty() {
            bail!("Transaction id is required");
        }
        if let Some(txn) = self.transactions().iter().find(|t| t.id == key) {
            return Ok(txn);
        }
        let mut matches = self.transactions().iter().filter(|t| t.id.starts_with(key));
        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(txn),
            (None, _) => bail!("No transaction with id '{key}'"),
            (Some(_), Some(_)) => bail!("Id prefix '{key}' matches more than one transaction"),
        }
    }

    pub(crate) fn add_transaction(&mut self, fields: TransactionFields) -> String {
        let txn = new_transaction(fields);
        let id = txn.id.clone();
        debug!("Adding transaction {id}");
        let mut transactions = self.snapshot.transactions.clone();
        transactions.push(txn);
        self.replace_transactions(transactions);
        id
    }

    /// Append several transactions with a single save.
    pub(crate) fn add_transactions(&mut self, batch: Vec<TransactionFields>) -> usize {
        let count = batch.len();
        if count == 0 {
            return 0;
        }
        let mut transactions = self.snapshot.transactions.clone();
        transactions.extend(batch.into_iter().map(new_transaction));
        self.replace_transactions(transactions);
        count
    }

    /// Replace the whole record with the given id, keeping its position.
    pub(crate) fn update_transaction(&mut self, key: &str, fields: TransactionFields) -> Result<()> {
        let id = self.find(key)?.id.clone();
        debug!("Updating transaction {id}");
        let transactions = self
            .snapshot
            .transactions
            .iter()
            .map(|t| {
                if t.id == id {
                    fields.clone().into_transaction(id.clone())
                } else {
                    t.clone()
                }
            })
            .collect();
        self.replace_transactions(transactions);
        Ok(())
    }

    pub(crate) fn delete_transaction(&mut self, key: &str) -> Result<Transaction> {
        let removed = self.find(key)?.clone();
        debug!("Deleting transaction {}", removed.id);
        let transactions = self
            .snapshot
            .transactions
            .iter()
            .filter(|t| t.id != removed.id)
            .cloned()
            .collect();
        self.replace_transactions(transactions);
        Ok(removed)
    }

    pub(crate) fn set_budgets(&mut self, budgets: Budgets) {
        debug!("Replacing budgets ({} entries)", budgets.len());
        self.replace(Snapshot {
            transactions: self.snapshot.transactions.clone(),
            budgets,
        });
    }

    pub(crate) fn set_budget(&mut self, category: Category, amount: Decimal) -> Result<()> {
        if !category.is_budgetable() {
            bail!("'{category}' cannot have a budget");
        }
        if amount < Decimal::ZERO {
            bail!("Budget must be a positive number");
        }
        if amount > MAX_AMOUNT {
            bail!("Budget must not exceed {MAX_AMOUNT}");
        }
        let mut budgets = self.snapshot.budgets.clone();
        budgets.insert(category, amount);
        self.set_budgets(budgets);
        Ok(())
    }

    /// Returns whether a budget was removed.
    pub(crate) fn clear_budget(&mut self, category: Category) -> bool {
        if !self.snapshot.budgets.contains_key(&category) {
            return false;
        }
        let mut budgets = self.snapshot.budgets.clone();
        budgets.remove(&category);
        self.set_budgets(budgets);
        true
    }

    fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.replace(Snapshot {
            transactions,
            budgets: self.snapshot.budgets.clone(),
        });
    }

    /// Swap in a new snapshot and save it. Save failures are logged, not
    /// returned: the in-memory state stays authoritative for this session.
    fn replace(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        if let Err(e) = self.store.persist(&self.snapshot) {
            warn!("Failed to save changes: {e:#}");
        }
    }
}

fn new_transaction(fields: TransactionFields) -> Transaction {
    Transaction::new(fields.amount, fields.date, fields.description, fields.category)
}

/// Seed data used the first time the app runs.
pub(crate) fn default_snapshot(today: NaiveDate) -> Snapshot {
    Snapshot {
        transactions: default_transactions(today),
        budgets: default_budgets(),
    }
}

fn default_transactions(today: NaiveDate) -> Vec<Transaction> {
    let seed: [(&str, i64, Option<(i32, u32, u32)>, &str, Category); 4] = [
        ("1", 4599, Some((2023, 6, 15)), "Grocery shopping", Category::FoodAndDining),
        ("2", 12050, Some((2023, 7, 2)), "Electricity bill", Category::Utilities),
        ("3", 3500, Some((2023, 7, 10)), "Movie tickets", Category::Entertainment),
        ("4", 25000, None, "New headphones", Category::Shopping),
    ];
    seed.iter()
        .filter_map(|&(id, cents, ymd, description, category)| {
            let date = match ymd {
                Some((y, m, d)) => NaiveDate::from_ymd_opt(y, m, d)?,
                None => today,
            };
            Some(Transaction {
                id: id.to_string(),
                amount: Decimal::new(cents, 2),
                date,
                description: description.to_string(),
                category: Some(category),
            })
        })
        .collect()
}

fn default_budgets() -> Budgets {
    [
        (Category::FoodAndDining, 500),
        (Category::Transportation, 200),
        (Category::Utilities, 300),
        (Category::Entertainment, 150),
        (Category::Shopping, 200),
    ]
    .into_iter()
    .map(|(c, amt)| (c, Decimal::from(amt)))
    .collect()
}
