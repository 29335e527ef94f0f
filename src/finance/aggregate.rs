// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly roll-ups over expanded occurrences.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::expand::{Occurrence, expand};
use super::window::MonthWindow;
use crate::models::{Transaction, TransactionKind, TransactionStatus};

pub const TOP_CATEGORIES: usize = 4;
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusTotal {
    pub status: TransactionStatus,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub by_category: Vec<CategoryTotal>,
    pub by_status: Vec<StatusTotal>,
    /// Income already received; the only income that counts toward a goal.
    pub received_income: Decimal,
}

fn overflow(what: &str) -> anyhow::Error {
    anyhow!("Amount overflow while computing {}", what)
}

fn add(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(what))
}

pub fn aggregate(occurrences: &[Occurrence<'_>]) -> Result<MonthlySummary> {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut received_income = Decimal::ZERO;
    let mut categories: Vec<CategoryTotal> = Vec::new();
    let mut by_status: Vec<StatusTotal> = Vec::new();

    for occ in occurrences {
        let t = occ.transaction;
        let status_entry = match by_status.iter_mut().position(|s| s.status == t.status) {
            Some(i) => &mut by_status[i],
            None => {
                by_status.push(StatusTotal {
                    status: t.status,
                    income: Decimal::ZERO,
                    expense: Decimal::ZERO,
                });
                let last = by_status.len() - 1;
                &mut by_status[last]
            }
        };
        match t.kind {
            TransactionKind::Income => {
                total_income = add(total_income, t.value, "total income")?;
                status_entry.income = add(status_entry.income, t.value, "income by status")?;
                if t.status == TransactionStatus::Paid {
                    received_income = add(received_income, t.value, "received income")?;
                }
            }
            TransactionKind::Expense => {
                total_expense = add(total_expense, t.value, "total expense")?;
                status_entry.expense = add(status_entry.expense, t.value, "expense by status")?;
                match categories.iter_mut().find(|c| c.category == t.category) {
                    Some(c) => c.total = add(c.total, t.value, "category total")?,
                    None => categories.push(CategoryTotal {
                        category: t.category.clone(),
                        total: t.value,
                    }),
                }
            }
        }
    }
    by_status.sort_by_key(|s| s.status);

    Ok(MonthlySummary {
        balance: total_income
            .checked_sub(total_expense)
            .ok_or_else(|| overflow("balance"))?,
        total_income,
        total_expense,
        by_category: top_categories(categories)?,
        by_status,
        received_income,
    })
}

/// Keeps the largest categories and folds the rest into "Other". A real
/// category already named "Other" absorbs the remainder.
///
/// The sort is stable, so equal totals keep first-seen order.
pub fn top_categories(mut categories: Vec<CategoryTotal>) -> Result<Vec<CategoryTotal>> {
    categories.sort_by(|a, b| b.total.cmp(&a.total));
    if categories.len() <= TOP_CATEGORIES {
        return Ok(categories);
    }
    let rest = categories.split_off(TOP_CATEGORIES);
    let other = rest
        .iter()
        .try_fold(Decimal::ZERO, |acc, c| add(acc, c.total, "other categories"))?;
    if other.is_zero() {
        return Ok(categories);
    }
    match categories.iter_mut().find(|c| c.category == OTHER_CATEGORY) {
        Some(existing) => {
            existing.total = add(existing.total, other, "other categories")?;
            categories.sort_by(|a, b| b.total.cmp(&a.total));
        }
        None => categories.push(CategoryTotal {
            category: OTHER_CATEGORY.to_string(),
            total: other,
        }),
    }
    Ok(categories)
}

/// Period-over-period change in percent. A zero baseline reads as +100%
/// when anything came in, 0% otherwise.
pub fn pct_change(current: Decimal, previous: Decimal) -> Result<Decimal> {
    if previous.is_zero() {
        return Ok(if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        });
    }
    current
        .checked_sub(previous)
        .and_then(|d| d.checked_div(previous))
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow("period change"))
}

/// Uncapped: beating the goal yields more than 100.
pub fn goal_progress(received: Decimal, goal: Decimal) -> Result<Decimal> {
    if goal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    received
        .checked_div(goal)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow("goal progress"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodChange {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub month: String,
    pub window: MonthWindow,
    pub current: MonthlySummary,
    pub previous: MonthlySummary,
    pub change: PeriodChange,
    pub goal: Option<Decimal>,
    pub goal_progress: Decimal,
}

/// Summary of the month containing `reference`, compared with the month
/// before it and measured against `goal`.
pub fn monthly_report(
    all: &[Transaction],
    reference: NaiveDate,
    goal: Option<Decimal>,
) -> Result<MonthlyReport> {
    let window = MonthWindow::containing(reference);
    let previous_window = window.previous()?;
    let current = aggregate(&expand(all, &window))?;
    let previous = aggregate(&expand(all, &previous_window))?;
    let change = PeriodChange {
        income: pct_change(current.total_income, previous.total_income)?,
        expense: pct_change(current.total_expense, previous.total_expense)?,
        balance: pct_change(current.balance, previous.balance)?,
    };
    let progress = goal_progress(current.received_income, goal.unwrap_or(Decimal::ZERO))?;
    Ok(MonthlyReport {
        month: window.key(),
        window,
        current,
        previous,
        change,
        goal,
        goal_progress: progress,
    })
}
