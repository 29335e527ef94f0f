// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod expand;
pub mod installments;
pub mod request;
pub mod window;

pub use aggregate::{
    MonthlyReport, MonthlySummary, aggregate, goal_progress, monthly_report, pct_change,
};
pub use expand::{Occurrence, expand, expand_range};
pub use installments::{materialize, materialize_with_group};
pub use request::{NewTransactionRequest, TransactionDraft, TransactionForm};
pub use window::{MonthWindow, month_window};
