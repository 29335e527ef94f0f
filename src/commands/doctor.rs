// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionStatus};
use crate::store::TransactionStore;
use crate::utils::{pretty_table, resolve_owner};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, m)?;
    let all = conn.transactions_for(&owner)?;
    let rows = find_issues(&all, chrono::Local::now().date_naive());
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Diagnostics only; statuses are never changed here.
pub fn find_issues(all: &[Transaction], today: NaiveDate) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Pending one-off records whose date has passed
    for t in all {
        if !t.is_recurring && t.status == TransactionStatus::Pending && t.date < today {
            rows.push(vec![
                "pending_past_due".into(),
                format!("#{} {} {} ({})", t.id, t.date, t.description, t.kind),
            ]);
        }
    }

    // 2) Installment groups missing siblings
    let mut groups: BTreeMap<&str, (u32, Vec<u32>)> = BTreeMap::new();
    for t in all {
        if let Some(i) = &t.installment {
            let entry = groups
                .entry(i.group_id.as_str())
                .or_insert((i.installments, Vec::new()));
            entry.1.push(i.installment_number);
        }
    }
    for (group, (expected, mut numbers)) in groups {
        numbers.sort_unstable();
        numbers.dedup();
        let missing: Vec<String> = (1..=expected)
            .filter(|n| numbers.binary_search(n).is_err())
            .map(|n| n.to_string())
            .collect();
        if !missing.is_empty() {
            rows.push(vec![
                "incomplete_installments".into(),
                format!("group {} missing {}", group, missing.join(",")),
            ]);
        }
    }
    rows
}
