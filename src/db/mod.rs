mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::ledger::{default_snapshot, Persistence};
use crate::models::*;
use crate::validate::DATE_FORMAT;

pub(crate) struct Database {
    conn: Connection,
}

/// A transaction row before its text columns are decoded.
struct StoredTransaction {
    id: String,
    amount: String,
    date: String,
    description: String,
    category: Option<String>,
}

impl StoredTransaction {
    /// Why this row cannot be loaded as-is, if it cannot.
    fn problem(&self) -> Option<String> {
        if Decimal::from_str(&self.amount).is_err() {
            return Some(format!("bad amount '{}'", self.amount));
        }
        if NaiveDate::parse_from_str(&self.date, DATE_FORMAT).is_err() {
            return Some(format!("bad date '{}'", self.date));
        }
        match self.category.as_deref() {
            Some(name) if !name.is_empty() && Category::parse(name).is_none() => {
                Some(format!("unknown category '{name}'"))
            }
            _ => None,
        }
    }

    fn decode(self) -> Result<Transaction> {
        let amount = Decimal::from_str(&self.amount)
            .with_context(|| format!("bad amount '{}'", self.amount))?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .with_context(|| format!("bad date '{}'", self.date))?;
        let category = match self.category.as_deref() {
            None | Some("") => None,
            Some(name) => {
                let parsed = Category::parse(name);
                if parsed.is_none() {
                    warn!(
                        "Transaction {} has unknown category '{name}', treating as uncategorized",
                        self.id
                    );
                }
                parsed
            }
        };
        Ok(Transaction {
            id: self.id,
            amount,
            date,
            description: self.description,
            category,
        })
    }
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            for &(_, sql) in schema::MIGRATIONS {
                self.conn.execute_batch(sql)?;
            }
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn has_saved(&self, name: &str) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM saved_state WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?)
    }

    // ── Transactions ──────────────────────────────────────────

    /// Stored transactions in list order. Rows that no longer decode are
    /// skipped with a warning instead of failing the whole load. Those rows,
    /// and rows whose category is unknown (loaded as uncategorized), are
    /// copied verbatim into `quarantined_transactions` first.
    pub(crate) fn load_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, date, description, category FROM transactions ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredTransaction {
                id: row.get(0)?,
                amount: row.get(1)?,
                date: row.get(2)?,
                description: row.get(3)?,
                category: row.get(4)?,
            })
        })?;

        let mut txns = Vec::new();
        for row in rows {
            let stored = row?;
            if let Some(reason) = stored.problem() {
                self.quarantine_transaction(&stored, &reason)?;
            }
            let id = stored.id.clone();
            match stored.decode() {
                Ok(txn) => txns.push(txn),
                Err(e) => warn!("Skipping stored transaction {id}: {e:#}"),
            }
        }
        Ok(txns)
    }

    fn quarantine_transaction(&self, stored: &StoredTransaction, reason: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO quarantined_transactions
                     (id, amount, date, description, category, reason, quarantined_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    stored.id,
                    stored.amount,
                    stored.date,
                    stored.description,
                    stored.category,
                    reason,
                    chrono::Utc::now().to_rfc3339(),
                ],
            )
            .with_context(|| format!("Failed to quarantine transaction {}", stored.id))?;
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Stored budgets. Unknown categories and bad amounts are copied into
    /// `quarantined_budgets` and left out.
    pub(crate) fn load_budgets(&self) -> Result<Budgets> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, limit_amount FROM budgets")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut budgets = Budgets::new();
        for row in rows {
            let (name, amt_str) = row?;
            let Some(category) = Category::parse(&name) else {
                warn!("Skipping budget for unknown category '{name}'");
                let reason = format!("unknown category '{name}'");
                self.quarantine_budget(&name, &amt_str, &reason)?;
                continue;
            };
            match Decimal::from_str(&amt_str) {
                Ok(amount) => {
                    budgets.insert(category, amount);
                }
                Err(_) => {
                    warn!("Skipping budget for {category}: bad amount '{amt_str}'");
                    let reason = format!("bad amount '{amt_str}'");
                    self.quarantine_budget(&name, &amt_str, &reason)?;
                }
            }
        }
        Ok(budgets)
    }

    fn quarantine_budget(&self, category: &str, amount: &str, reason: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO quarantined_budgets
                     (category, limit_amount, reason, quarantined_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![category, amount, reason, chrono::Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to quarantine budget '{category}'"))?;
        Ok(())
    }

    /// Number of rows held in the quarantine tables: (transactions, budgets).
    pub(crate) fn quarantined_counts(&self) -> Result<(usize, usize)> {
        let count = |table: &str| -> Result<usize> {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or(0))
        };
        Ok((
            count("quarantined_transactions")?,
            count("quarantined_budgets")?,
        ))
    }

    // ── Snapshot ──────────────────────────────────────────────

    /// Replace everything stored with `snapshot` in one SQL transaction.
    pub(crate) fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        let saved_at = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM transactions", [])?;
        for (position, txn) in snapshot.transactions.iter().enumerate() {
            tx.execute(
                "INSERT INTO transactions (id, position, amount, date, description, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    txn.id,
                    position as i64,
                    txn.amount.to_string(),
                    txn.date.format(DATE_FORMAT).to_string(),
                    txn.description,
                    txn.category.map(|c| c.as_str()),
                ],
            )?;
        }
        tx.execute("DELETE FROM budgets", [])?;
        for (category, amount) in &snapshot.budgets {
            tx.execute(
                "INSERT INTO budgets (category, limit_amount) VALUES (?1, ?2)",
                params![category.as_str(), amount.to_string()],
            )?;
        }
        for name in [schema::TRANSACTIONS_KEY, schema::BUDGETS_KEY] {
            tx.execute(
                "INSERT INTO saved_state (name, saved_at) VALUES (?1, ?2)
                 ON CONFLICT(name) DO UPDATE SET saved_at = ?2",
                params![name, saved_at],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl Persistence for Database {
    fn load_or_default(&self, today: NaiveDate) -> Result<Snapshot> {
        let mut snapshot = default_snapshot(today);
        if self.has_saved(schema::TRANSACTIONS_KEY)? {
            snapshot.transactions = self.load_transactions()?;
        } else {
            info!("No saved transactions, starting from sample data");
        }
        if self.has_saved(schema::BUDGETS_KEY)? {
            snapshot.budgets = self.load_budgets()?;
        } else {
            info!("No saved budgets, starting from default budgets");
        }
        Ok(snapshot)
    }

    fn persist(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.save_snapshot(snapshot).context("Failed to save snapshot")?;
        info!(
            "Saved {} transactions and {} budgets",
            snapshot.transactions.len(),
            snapshot.budgets.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests;
