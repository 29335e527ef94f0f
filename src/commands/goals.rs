// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::MonthlyGoal;
use crate::store::TransactionStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_month, pretty_table, resolve_owner};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount < Decimal::ZERO {
        return Err(anyhow!("Goal must not be negative, got {}", amount));
    }
    conn.set_monthly_goal(&owner, &month, amount)?;
    println!("Goal for {} set to {}", month, fmt_money(&amount));
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let goal = MonthlyGoal {
        value: conn.monthly_goal(&owner, &month)?.unwrap_or(Decimal::ZERO),
        month,
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goal)? {
        println!("{}: {}", goal.month, fmt_money(&goal.value));
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(conn, sub)?;
    let goals = conn.monthly_goals(&owner)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goals)? {
        let rows = goals
            .iter()
            .map(|g| vec![g.month.clone(), fmt_money(&g.value)])
            .collect();
        println!("{}", pretty_table(&["Month", "Goal"], rows));
    }
    Ok(())
}
