// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::ValidationError;
use crate::finance::{TransactionForm, materialize};
use crate::models::{InstallmentInfo, NewTransaction, TransactionStatus};
use crate::store::TransactionStore;
use crate::utils::{parse_decimal, resolve_owner};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let owner = resolve_owner(conn, sub)?;
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_transactions(conn, &owner, Path::new(path))?;
            println!("Imported {} record(s) from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn flag(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

/// Parses an exported sibling position such as `2/3`.
fn sibling_position(raw: &str) -> Result<(u32, u32)> {
    let (n, total) = raw
        .split_once('/')
        .ok_or_else(|| anyhow!("installments: '{}' is not n/N", raw))?;
    let n: u32 = n.trim().parse().with_context(|| format!("installments: '{}'", raw))?;
    let total: u32 = total
        .trim()
        .parse()
        .with_context(|| format!("installments: '{}'", raw))?;
    if total < 2 || n == 0 || n > total {
        return Err(anyhow!("installments: '{}' is out of range", raw));
    }
    Ok((n, total))
}

/// Marks `rows` as the exported sibling `raw` of a source group, mapping
/// the source group id onto a fresh one.
fn position_siblings(
    rows: &mut [NewTransaction],
    raw: &str,
    source_group: Option<String>,
    total_value: Option<String>,
    groups: &mut HashMap<String, String>,
) -> Result<()> {
    let (n, total) = sibling_position(raw)?;
    let source = source_group.ok_or(ValidationError::Missing { field: "group_id" })?;
    let total_value =
        parse_decimal(&total_value.ok_or(ValidationError::Missing { field: "total_value" })?)?;
    let group_id = groups
        .entry(source)
        .or_insert_with(|| Uuid::new_v4().to_string())
        .clone();
    for r in rows.iter_mut() {
        r.installment = Some(InstallmentInfo {
            installments: total,
            installment_number: n,
            group_id: group_id.clone(),
            total_value,
        });
    }
    Ok(())
}

/// Columns: date, type, description, value, category, party, notes,
/// recurring, installments, icon, then optionally status, group_id and
/// total_value as written by the exporter.
///
/// `installments` is either a count to split the row into, or an exported
/// `n/N` position. Positioned rows are stored as they are and their group
/// ids are replaced with fresh ones, one per source group.
///
/// Every row is validated before anything is written; the file lands as
/// one batch or not at all.
pub fn import_transactions(conn: &mut Connection, owner: &str, path: &Path) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;

    let mut groups: HashMap<String, String> = HashMap::new();
    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let rec = result.with_context(|| format!("Read CSV line {}", line))?;
        let col = |idx: usize| {
            rec.get(idx)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let position = col(8).filter(|s| s.contains('/'));
        let form = TransactionForm {
            date: col(0),
            kind: col(1),
            description: col(2),
            value: col(3),
            category: col(4),
            counterparty: col(5),
            notes: col(6),
            recurring: col(7).as_deref().is_some_and(flag),
            installments: if position.is_some() { None } else { col(8) },
            category_icon: col(9),
        };
        let request = form
            .validate()
            .with_context(|| format!("Line {} rejected", line))?;
        let mut rows = materialize(&request)?;

        if let Some(raw) = position {
            if form.recurring {
                return Err(ValidationError::ConflictingModes)
                    .with_context(|| format!("Line {} rejected", line));
            }
            position_siblings(&mut rows, &raw, col(11), col(12), &mut groups)
                .with_context(|| format!("Line {} rejected", line))?;
        }

        if let Some(raw) = col(10) {
            let status = raw
                .parse::<TransactionStatus>()
                .map_err(|reason| ValidationError::Invalid {
                    field: "status",
                    reason,
                })
                .with_context(|| format!("Line {} rejected", line))?;
            for r in rows.iter_mut() {
                r.status = status;
            }
        }
        records.extend(rows);
    }
    let ids = conn.insert_batch(owner, &records)?;
    info!("Imported {} record(s) from {}", ids.len(), path.display());
    Ok(ids.len())
}
