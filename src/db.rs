// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Brokerbooks", "brokerbooks"));

pub const DB_ENV: &str = "BROKERBOOKS_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("brokerbooks.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    debug!("Opening database at {}", path.display());
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        description TEXT NOT NULL,
        value TEXT NOT NULL,
        date TEXT NOT NULL,
        category TEXT NOT NULL,
        category_icon TEXT,
        counterparty TEXT,
        notes TEXT,
        is_recurring INTEGER NOT NULL DEFAULT 0,
        installments INTEGER,
        installment_number INTEGER,
        group_id TEXT,
        total_value TEXT,
        status TEXT NOT NULL DEFAULT 'pending' CHECK(status IN ('pending','paid','overdue')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        CHECK(NOT (is_recurring = 1 AND group_id IS NOT NULL))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_owner_date ON transactions(owner, date);
    CREATE INDEX IF NOT EXISTS idx_transactions_group ON transactions(group_id);

    -- Sparse month -> income goal per owner; rows are only upserted
    CREATE TABLE IF NOT EXISTS monthly_goals(
        owner TEXT NOT NULL,
        month TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY(owner, month)
    );
    "#,
    )?;
    Ok(())
}
