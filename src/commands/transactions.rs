// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::finance::{MonthWindow, TransactionForm, expand, materialize};
use crate::models::{Transaction, TransactionKind, TransactionStatus};
use crate::store::TransactionStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table, resolve_owner};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("status", sub)) => set_status(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("group", sub)) => group(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn form_from_args(sub: &clap::ArgMatches) -> TransactionForm {
    let get = |k: &str| sub.get_one::<String>(k).cloned();
    TransactionForm {
        kind: get("type"),
        description: get("description"),
        value: get("value"),
        date: get("date"),
        category: get("category"),
        category_icon: get("icon"),
        counterparty: get("party"),
        notes: get("notes"),
        recurring: sub.get_flag("recurring"),
        installments: get("installments"),
    }
}

/// Validates, materializes and persists one submission. Returns new ids.
pub fn add_from_form(conn: &mut Connection, owner: &str, form: &TransactionForm) -> Result<Vec<i64>> {
    let request = form.validate().context("Transaction rejected")?;
    let records = materialize(&request)?;
    conn.insert_batch(owner, &records)
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let form = form_from_args(sub);
    let ids = add_from_form(conn, &owner, &form)?;
    let desc = form.description.as_deref().unwrap_or_default().trim();
    if ids.len() > 1 {
        println!(
            "Recorded '{}' as {} installments (ids {}..={})",
            desc,
            ids.len(),
            ids[0],
            ids[ids.len() - 1]
        );
    } else if form.recurring {
        println!("Recorded recurring '{}' (id {})", desc, ids[0]);
    } else {
        println!("Recorded '{}' (id {})", desc, ids[0]);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub category: String,
    pub value: String,
    pub status: String,
    pub party: String,
    pub plan: String,
}

fn plan_label(t: &Transaction) -> String {
    if t.is_recurring {
        return "recurring".into();
    }
    match &t.installment {
        Some(i) => format!("{}/{}", i.installment_number, i.installments),
        None => String::new(),
    }
}

fn to_row(t: &Transaction, date: NaiveDate) -> TransactionRow {
    TransactionRow {
        id: t.id,
        date: date.to_string(),
        kind: t.kind.to_string(),
        description: t.description.clone(),
        category: t.category.clone(),
        value: fmt_money(&t.value),
        status: t.status.label_for(t.kind).to_string(),
        party: t.counterparty.clone().unwrap_or_default(),
        plan: plan_label(t),
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let owner = resolve_owner(conn, sub)?;
    let all = conn.transactions_for(&owner)?;

    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionKind>().map_err(anyhow::Error::msg))
        .transpose()?;
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<TransactionStatus>().map_err(anyhow::Error::msg))
        .transpose()?;
    let keep = |t: &Transaction| {
        kind.is_none_or(|k| t.kind == k) && status.is_none_or(|s| t.status == s)
    };

    let mut dated: Vec<(NaiveDate, &Transaction)> = match sub.get_one::<String>("month") {
        Some(month) => {
            let window = MonthWindow::from_key(month)?;
            expand(&all, &window)
                .into_iter()
                .map(|o| (o.effective_date, o.transaction))
                .collect()
        }
        None => all.iter().map(|t| (t.date, t)).collect(),
    };
    dated.retain(|(_, t)| keep(*t));
    dated.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.id.cmp(&a.1.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        dated.truncate(*limit);
    }
    Ok(dated.into_iter().map(|(d, t)| to_row(t, d)).collect())
}

fn print_rows(data: &[TransactionRow]) {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.clone(),
                r.kind.clone(),
                r.description.clone(),
                r.category.clone(),
                r.value.clone(),
                r.status.clone(),
                r.party.clone(),
                r.plan.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID",
                "Date",
                "Type",
                "Description",
                "Category",
                "Value",
                "Status",
                "Client/Provider",
                "Plan"
            ],
            rows,
        )
    );
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        print_rows(&data);
    }
    Ok(())
}

fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    conn.update_status(&owner, id, TransactionStatus::Paid)?;
    info!("Transaction {} settled by {}", id, owner);
    println!("Transaction {} marked as settled", id);
    Ok(())
}

fn set_status(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let raw = sub.get_one::<String>("to").unwrap();
    let status = raw
        .parse::<TransactionStatus>()
        .map_err(|e| anyhow!("Invalid status: {}", e))?;
    conn.update_status(&owner, id, status)?;
    println!("Transaction {} is now {}", id, status);
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let value = parse_decimal(sub.get_one::<String>("value").unwrap())?;
    if value <= rust_decimal::Decimal::ZERO {
        return Err(anyhow!("Value must be greater than zero, got {}", value));
    }
    conn.update_value(&owner, id, value)?;
    println!("Transaction {} value set to {}", id, fmt_money(&value));
    Ok(())
}

fn group(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let owner = resolve_owner(conn, sub)?;
    let group_id = sub.get_one::<String>("group_id").unwrap().trim();
    let siblings = conn.transactions_in_group(&owner, group_id)?;
    if siblings.is_empty() {
        return Err(anyhow!("Installment group '{}' not found", group_id));
    }
    let data: Vec<TransactionRow> = siblings.iter().map(|t| to_row(t, t.date)).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        print_rows(&data);
    }
    Ok(())
}
