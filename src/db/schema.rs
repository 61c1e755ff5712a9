pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS saved_state (
    name      TEXT PRIMARY KEY,
    saved_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id           TEXT PRIMARY KEY,
    position     INTEGER NOT NULL,
    amount       TEXT NOT NULL,
    date         TEXT NOT NULL,
    description  TEXT NOT NULL,
    category     TEXT
);

CREATE INDEX IF NOT EXISTS idx_transactions_position ON transactions(position);

CREATE TABLE IF NOT EXISTS budgets (
    category      TEXT PRIMARY KEY,
    limit_amount  TEXT NOT NULL
);
"#;

/// Rows that could not be decoded on load, kept verbatim so a later save
/// does not drop them.
const QUARANTINE_V2: &str = r#"
CREATE TABLE IF NOT EXISTS quarantined_transactions (
    id              TEXT PRIMARY KEY,
    amount          TEXT NOT NULL,
    date            TEXT NOT NULL,
    description     TEXT NOT NULL,
    category        TEXT,
    reason          TEXT NOT NULL,
    quarantined_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS quarantined_budgets (
    category        TEXT PRIMARY KEY,
    limit_amount    TEXT NOT NULL,
    reason          TEXT NOT NULL,
    quarantined_at  TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 2;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[(1, QUARANTINE_V2)];

/// `saved_state` names. A part with no row has never been saved and loads
/// as the built-in seed.
pub(crate) const TRANSACTIONS_KEY: &str = "transactions";
pub(crate) const BUDGETS_KEY: &str = "budgets";
