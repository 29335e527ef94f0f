// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::feed::SnapshotFeed;
use crate::finance::{MonthWindow, MonthlyReport, aggregate, expand_range, monthly_report};
use crate::models::Transaction;
use crate::store::TransactionStore;
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table, resolve_owner};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("watch", sub)) => watch(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Report for `month` over a snapshot that was already fetched.
pub fn report_from_snapshot(
    conn: &Connection,
    owner: &str,
    all: &[Transaction],
    month: &MonthWindow,
) -> Result<MonthlyReport> {
    let goal = conn.monthly_goal(owner, &month.key())?;
    monthly_report(all, month.start, goal).with_context(|| format!("Report for {}", month.key()))
}

pub fn summary_for(conn: &Connection, owner: &str, month: &str) -> Result<MonthlyReport> {
    let window = MonthWindow::from_key(month)?;
    let all = conn.transactions_for(owner)?;
    report_from_snapshot(conn, owner, &all, &window)
}

fn print_summary(r: &MonthlyReport) {
    let rows = vec![
        vec![
            "Income".to_string(),
            fmt_money(&r.current.total_income),
            fmt_money(&r.previous.total_income),
            fmt_pct(&r.change.income),
        ],
        vec![
            "Expense".to_string(),
            fmt_money(&r.current.total_expense),
            fmt_money(&r.previous.total_expense),
            fmt_pct(&r.change.expense),
        ],
        vec![
            "Balance".to_string(),
            fmt_money(&r.current.balance),
            fmt_money(&r.previous.balance),
            fmt_pct(&r.change.balance),
        ],
    ];
    println!("Month {}", r.month);
    println!(
        "{}",
        pretty_table(&["Metric", "This month", "Previous", "Change"], rows)
    );
    let goal = r.goal.unwrap_or(Decimal::ZERO);
    println!(
        "Goal {} | received {} | progress {}",
        fmt_money(&goal),
        fmt_money(&r.current.received_income),
        fmt_pct(&r.goal_progress)
    );
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let month = sub.get_one::<String>("month").unwrap();
    let report = summary_for(conn, &owner, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        print_summary(&report);
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let month = sub.get_one::<String>("month").unwrap();
    let report = summary_for(conn, &owner, month)?;
    let cats = &report.current.by_category;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), cats)? {
        let rows = cats
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(&c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CashflowRow {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// One row per month, oldest first, ending with `to`.
pub fn cashflow_rows(
    conn: &Connection,
    owner: &str,
    to: &MonthWindow,
    months: usize,
) -> Result<Vec<CashflowRow>> {
    let all = conn.transactions_for(owner)?;
    let windows = to.trailing(months)?;
    expand_range(&all, &windows)
        .into_iter()
        .map(|(w, occ)| {
            let s = aggregate(&occ).with_context(|| format!("Cash flow for {}", w.key()))?;
            Ok(CashflowRow {
                month: w.key(),
                income: s.total_income,
                expense: s.total_expense,
                balance: s.balance,
            })
        })
        .collect()
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let months = *sub.get_one::<usize>("months").unwrap_or(&12);
    let to = match sub.get_one::<String>("to") {
        Some(m) => MonthWindow::from_key(m)?,
        None => MonthWindow::containing(chrono::Local::now().date_naive()),
    };
    let data = cashflow_rows(conn, &owner, &to, months)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .rev()
            .map(|r| {
                vec![
                    r.month.clone(),
                    fmt_money(&r.income),
                    fmt_money(&r.expense),
                    fmt_money(&r.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Balance"], rows)
        );
    }
    Ok(())
}

fn watch(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let window = MonthWindow::from_key(sub.get_one::<String>("month").unwrap())?;
    let interval = Duration::from_secs(*sub.get_one::<u64>("interval").unwrap_or(&2));
    let ticks = sub.get_one::<usize>("ticks").copied();
    let mut feed = SnapshotFeed::new(owner.clone());
    feed.watch(conn, interval, ticks, |snapshot| {
        let report = report_from_snapshot(conn, &owner, snapshot, &window)?;
        print_summary(&report);
        Ok(())
    })
}
