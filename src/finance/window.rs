// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Inclusive first/last calendar day of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    pub fn containing(date: NaiveDate) -> MonthWindow {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        MonthWindow { start, end }
    }

    /// Parses a `YYYY-MM` key.
    pub fn from_key(key: &str) -> Result<MonthWindow> {
        let key = key.trim();
        let first = NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{}', expected YYYY-MM", key))?;
        Ok(MonthWindow::containing(first))
    }

    pub fn key(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn previous(&self) -> Result<MonthWindow> {
        self.start
            .checked_sub_months(Months::new(1))
            .map(MonthWindow::containing)
            .ok_or_else(|| anyhow!("No month before {}", self.key()))
    }

    pub fn next(&self) -> Result<MonthWindow> {
        self.start
            .checked_add_months(Months::new(1))
            .map(MonthWindow::containing)
            .ok_or_else(|| anyhow!("No month after {}", self.key()))
    }

    /// Whole months from `self` to `later`; zero or negative when `later`
    /// is not after `self`.
    pub fn months_until(&self, later: &MonthWindow) -> i32 {
        (later.start.year() - self.start.year()) * 12 + later.start.month() as i32
            - self.start.month() as i32
    }

    /// `count` consecutive windows ending with `self`, oldest first.
    pub fn trailing(&self, count: usize) -> Result<Vec<MonthWindow>> {
        let mut out = Vec::with_capacity(count);
        let mut cur = *self;
        for i in 0..count {
            out.push(cur);
            if i + 1 < count {
                cur = cur.previous()?;
            }
        }
        out.reverse();
        Ok(out)
    }
}

pub fn month_window(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let w = MonthWindow::containing(reference);
    (w.start, w.end)
}
