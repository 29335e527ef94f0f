// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use serde::Serialize;
use tracing::trace;

use super::window::MonthWindow;
use crate::models::Transaction;

/// A transaction as it appears inside one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Occurrence<'a> {
    /// Effective date within the month. Equals the stored date except for
    /// recurring records, which are re-anchored onto the month.
    pub effective_date: NaiveDate,
    #[serde(flatten)]
    pub transaction: &'a Transaction,
}

/// Re-anchors a recurring record's date onto `window`, keeping the
/// day-of-month. Days past the end of a shorter month land on its last day.
pub fn reanchor(anchor: NaiveDate, window: &MonthWindow) -> Option<NaiveDate> {
    let offset = MonthWindow::containing(anchor).months_until(window);
    if offset < 0 {
        return None;
    }
    anchor.checked_add_months(Months::new(offset as u32))
}

/// Occurrences of `all` that fall within `window`, in input order.
pub fn expand<'a>(all: &'a [Transaction], window: &MonthWindow) -> Vec<Occurrence<'a>> {
    let mut out = Vec::new();
    for t in all {
        if t.is_recurring {
            if t.date > window.end {
                continue;
            }
            if let Some(date) = reanchor(t.date, window) {
                trace!(
                    "Recurring transaction id={} re-anchored from {} to {}",
                    t.id, t.date, date
                );
                out.push(Occurrence {
                    effective_date: date,
                    transaction: t,
                });
            }
        } else if window.contains(t.date) {
            out.push(Occurrence {
                effective_date: t.date,
                transaction: t,
            });
        }
    }
    out
}

/// One expansion per window, keyed by the window.
pub fn expand_range<'a>(
    all: &'a [Transaction],
    windows: &[MonthWindow],
) -> Vec<(MonthWindow, Vec<Occurrence<'a>>)> {
    windows.iter().map(|w| (*w, expand(all, w))).collect()
}
