// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::TransactionStore;
use crate::utils::resolve_owner;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

/// The import layout followed by the stored-only columns, so an export
/// reads back through `import transactions` unchanged.
pub const EXPORT_COLUMNS: [&str; 13] = [
    "date",
    "type",
    "description",
    "value",
    "category",
    "party",
    "notes",
    "recurring",
    "installments",
    "icon",
    "status",
    "group_id",
    "total_value",
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let owner = resolve_owner(conn, sub)?;
    let rows = conn.transactions_for(&owner)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(EXPORT_COLUMNS)?;
            for t in &rows {
                let inst = t.installment.as_ref();
                wtr.write_record([
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.description.clone(),
                    t.value.to_string(),
                    t.category.clone(),
                    t.counterparty.clone().unwrap_or_default(),
                    t.notes.clone().unwrap_or_default(),
                    t.is_recurring.to_string(),
                    inst.map(|i| format!("{}/{}", i.installment_number, i.installments))
                        .unwrap_or_default(),
                    t.category_icon.clone().unwrap_or_default(),
                    t.status.to_string(),
                    inst.map(|i| i.group_id.clone()).unwrap_or_default(),
                    inst.map(|i| i.total_value.to_string()).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => {
            return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
        }
    }
    println!("Exported {} transaction(s) to {}", rows.len(), out);
    Ok(())
}
