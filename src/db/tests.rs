#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 3, 15)
}

fn sample_snapshot() -> Snapshot {
    let mut budgets = Budgets::new();
    budgets.insert(Category::Travel, dec!(400));
    budgets.insert(Category::Housing, dec!(1250.50));
    Snapshot {
        transactions: vec![
            Transaction {
                id: "b-second-by-date".into(),
                amount: dec!(19.99),
                date: date(2024, 3, 2),
                description: "Train ticket".into(),
                category: Some(Category::Travel),
            },
            Transaction {
                id: "a-first-by-date".into(),
                amount: dec!(1250.00),
                date: date(2024, 3, 1),
                description: "Rent".into(),
                category: None,
            },
        ],
        budgets,
    }
}

// ── Defaults ──────────────────────────────────────────────────

#[test]
fn test_fresh_database_loads_seed() {
    let db = Database::open_in_memory().unwrap();
    let snap = db.load_or_default(today()).unwrap();
    assert_eq!(snap, crate::ledger::default_snapshot(today()));
}

#[test]
fn test_saved_empty_state_does_not_reseed() {
    let mut db = Database::open_in_memory().unwrap();
    db.persist(&Snapshot::default()).unwrap();
    let snap = db.load_or_default(today()).unwrap();
    assert!(snap.transactions.is_empty());
    assert!(snap.budgets.is_empty());
}

#[test]
fn test_parts_fall_back_independently() {
    let db = Database::open_in_memory().unwrap();
    db.conn
        .execute(
            "INSERT INTO saved_state (name, saved_at) VALUES ('budgets', 'now')",
            [],
        )
        .unwrap();
    let snap = db.load_or_default(today()).unwrap();
    assert_eq!(snap.transactions.len(), 4);
    assert!(snap.budgets.is_empty());
}

// ── Round trip ────────────────────────────────────────────────

#[test]
fn test_snapshot_roundtrip_keeps_list_order() {
    let mut db = Database::open_in_memory().unwrap();
    let snap = sample_snapshot();
    db.persist(&snap).unwrap();
    let loaded = db.load_or_default(today()).unwrap();
    assert_eq!(loaded, snap);
    assert_eq!(loaded.transactions[0].id, "b-second-by-date");
    assert!(loaded.transactions[1].category.is_none());
}

#[test]
fn test_persist_replaces_previous_rows() {
    let mut db = Database::open_in_memory().unwrap();
    db.persist(&sample_snapshot()).unwrap();
    let mut smaller = sample_snapshot();
    smaller.transactions.truncate(1);
    smaller.budgets.remove(&Category::Housing);
    db.persist(&smaller).unwrap();

    assert_eq!(db.load_transactions().unwrap().len(), 1);
    assert_eq!(db.load_budgets().unwrap().len(), 1);
}

#[test]
fn test_undecodable_rows_are_skipped() {
    let mut db = Database::open_in_memory().unwrap();
    db.persist(&sample_snapshot()).unwrap();
    db.conn
        .execute(
            "INSERT INTO transactions (id, position, amount, date, description, category)
             VALUES ('bad-amount', 5, 'lots', '2024-03-01', 'x', NULL),
                    ('bad-date', 6, '1.00', '03/01/2024', 'x', NULL),
                    ('odd-cat', 7, '2.00', '2024-03-01', 'x', 'Groceries')",
            [],
        )
        .unwrap();
    db.conn
        .execute(
            "INSERT INTO budgets (category, limit_amount) VALUES ('Nope', '1'), ('Education', 'x')",
            [],
        )
        .unwrap();

    let txns = db.load_transactions().unwrap();
    let ids: Vec<&str> = txns.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b-second-by-date", "a-first-by-date", "odd-cat"]);
    assert!(txns[2].category.is_none());

    let budgets = db.load_budgets().unwrap();
    assert_eq!(budgets.len(), 2);

    assert_eq!(db.quarantined_counts().unwrap(), (3, 2));
}

#[test]
fn test_bad_rows_survive_reload_and_save() {
    let mut db = Database::open_in_memory().unwrap();
    db.persist(&sample_snapshot()).unwrap();
    db.conn
        .execute(
            "UPDATE transactions SET date = '2024-13-01' WHERE id = 'a-first-by-date'",
            [],
        )
        .unwrap();
    db.conn
        .execute(
            "INSERT INTO budgets (category, limit_amount) VALUES ('Pets', '40')",
            [],
        )
        .unwrap();

    let loaded = db.load_or_default(today()).unwrap();
    assert_eq!(loaded.transactions.len(), 1);
    db.persist(&loaded).unwrap();
    // A second cycle must not duplicate anything.
    let reloaded = db.load_or_default(today()).unwrap();
    db.persist(&reloaded).unwrap();

    assert_eq!(db.load_transactions().unwrap().len(), 1);
    assert_eq!(db.quarantined_counts().unwrap(), (1, 1));

    let (amount, date, description, reason): (String, String, String, String) = db
        .conn
        .query_row(
            "SELECT amount, date, description, reason FROM quarantined_transactions
             WHERE id = 'a-first-by-date'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .unwrap();
    assert_eq!(amount, "1250.00");
    assert_eq!(date, "2024-13-01");
    assert_eq!(description, "Rent");
    assert_eq!(reason, "bad date '2024-13-01'");

    let (category, limit): (String, String) = db
        .conn
        .query_row(
            "SELECT category, limit_amount FROM quarantined_budgets",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!((category.as_str(), limit.as_str()), ("Pets", "40"));
}

#[test]
fn test_version_one_database_gains_quarantine_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(schema::SCHEMA_V1).unwrap();
        conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.quarantined_counts().unwrap(), (0, 0));
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_on_disk_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finviz.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.persist(&sample_snapshot()).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.load_or_default(today()).unwrap(), sample_snapshot());
}

#[test]
fn test_ledger_over_database() {
    let db = Database::open_in_memory().unwrap();
    let mut ledger = crate::ledger::Ledger::open(db, today()).unwrap();
    ledger.clear_budget(Category::Shopping);
    let id = ledger.delete_transaction("1").unwrap().id;
    assert_eq!(id, "1");

    let stored = ledger.store().load_or_default(today()).unwrap();
    assert_eq!(stored.transactions.len(), 3);
    assert!(!stored.budgets.contains_key(&Category::Shopping));
}
