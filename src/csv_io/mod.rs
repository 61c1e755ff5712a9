use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::ledger::{Ledger, Persistence};
use crate::models::Transaction;
use crate::validate::{self, TransactionDraft, DATE_FORMAT};

const HEADERS: [&str; 5] = ["id", "date", "description", "category", "amount"];

/// Write transactions in list order. Returns the number of rows written.
pub(crate) fn export_csv(path: &Path, txns: &[Transaction]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    wtr.write_record(HEADERS)?;
    for txn in txns {
        let date = txn.date.format(DATE_FORMAT).to_string();
        let amount = txn.amount.to_string();
        wtr.write_record([
            txn.id.as_str(),
            date.as_str(),
            txn.description.as_str(),
            txn.category.map(|c| c.as_str()).unwrap_or(""),
            amount.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(txns.len())
}

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    description: usize,
    category: Option<usize>,
    amount: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).with_context(|| format!("CSV is missing the '{name}' column"))
        };
        Ok(Self {
            date: require("date")?,
            description: require("description")?,
            category: find("category"),
            amount: require("amount")?,
        })
    }
}

/// Read a CSV in the export layout. The `id` column is ignored: imported rows
/// are new transactions and get fresh ids when added. Rows come back
/// unvalidated.
pub(crate) fn import_csv(path: &Path) -> Result<Vec<TransactionDraft>> {
    Ok(read_rows(path)?.into_iter().map(|(_, draft)| draft).collect())
}

/// Drafts paired with their line in the file, counting the header as line 1.
/// Blank rows are skipped but still counted.
fn read_rows(path: &Path) -> Result<Vec<(usize, TransactionDraft)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let columns = Columns::from_headers(rdr.headers().context("Failed to read CSV header")?)?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {}", i + 2))?;
        let row = record
            .position()
            .and_then(|pos| usize::try_from(pos.line()).ok())
            .unwrap_or(i + 2);
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push((
            row,
            TransactionDraft {
                amount: field(columns.amount),
                date: field(columns.date),
                description: field(columns.description),
                category: columns.category.map(field).filter(|c| !c.trim().is_empty()),
            },
        ));
    }

    if rows.is_empty() {
        bail!("CSV file has no transactions");
    }
    Ok(rows)
}

/// Outcome of [`import_into`].
#[derive(Debug, Default)]
pub(crate) struct ImportReport {
    pub(crate) total: usize,
    pub(crate) imported: usize,
    /// One message per row that failed validation.
    pub(crate) skipped: Vec<String>,
}

/// Read `path`, validate every row, and add the valid ones to the ledger in
/// a single save.
pub(crate) fn import_into<P: Persistence>(path: &Path, ledger: &mut Ledger<P>) -> Result<ImportReport> {
    let rows = read_rows(path)?;
    let mut report = ImportReport {
        total: rows.len(),
        ..Default::default()
    };
    let mut valid = Vec::with_capacity(rows.len());
    for (row, draft) in &rows {
        match validate::validate_transaction(draft) {
            Ok(fields) => valid.push(fields),
            Err(e) => report.skipped.push(format!("row {row}: {e:#}")),
        }
    }
    report.imported = ledger.add_transactions(valid);
    log::info!(
        "Imported {} of {} rows from {}",
        report.imported,
        report.total,
        path.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests;
