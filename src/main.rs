mod analytics;
mod csv_io;
mod db;
mod ledger;
mod models;
mod run;
mod ui;
mod validate;

use anyhow::{Context, Result};
use env_logger::Env;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    log::info!("Using database {}", db_path.display());
    let db = db::Database::open(&db_path)?;
    let today = chrono::Local::now().date_naive();
    let mut ledger = ledger::Ledger::open(db, today)?;
    let (bad_txns, bad_budgets) = ledger.store().quarantined_counts()?;
    if bad_txns + bad_budgets > 0 {
        log::warn!(
            "{bad_txns} transaction(s) and {bad_budgets} budget(s) in {} could not be read and are kept in its quarantine tables",
            db_path.display()
        );
    }

    match args.len() {
        0 | 1 => run::as_tui(&mut ledger, today),
        _ => run::as_cli(&args, &mut ledger, today),
    }
}

/// `FINVIZ_DB` wins; otherwise the platform data directory.
fn get_db_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("FINVIZ_DB") {
        return Ok(PathBuf::from(path));
    }
    let proj_dirs = directories::ProjectDirs::from("com", "finviz", "finviz")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("finviz.db"))
}
