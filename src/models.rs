// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "revenue" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

/// Settlement state of a transaction.
///
/// `Paid` covers both "paid" expenses and "received" income; see
/// [`TransactionStatus::label_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Paid,
    Overdue,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Overdue => "overdue",
        }
    }

    pub fn label_for(&self, kind: TransactionKind) -> &'static str {
        match (self, kind) {
            (TransactionStatus::Paid, TransactionKind::Income) => "received",
            (s, _) => s.as_str(),
        }
    }

    /// Transitions are only ever user-driven: nothing leaves `Pending`
    /// because a due date went by.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, next),
            (Pending, Paid) | (Pending, Overdue) | (Overdue, Paid)
        ) || *self == next
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "paid" | "received" => Ok(TransactionStatus::Paid),
            "overdue" => Ok(TransactionStatus::Overdue),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentInfo {
    pub installments: u32,
    pub installment_number: u32,
    pub group_id: String,
    pub total_value: Decimal,
}

/// A stored transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner: String,
    pub kind: TransactionKind,
    pub description: String,
    pub value: Decimal,
    pub date: NaiveDate,
    pub category: String,
    pub category_icon: Option<String>,
    pub counterparty: Option<String>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub installment: Option<InstallmentInfo>,
    pub status: TransactionStatus,
}

/// A record ready to be persisted; the store assigns `id` and `owner`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub description: String,
    pub value: Decimal,
    pub date: NaiveDate,
    pub category: String,
    pub category_icon: Option<String>,
    pub counterparty: Option<String>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub installment: Option<InstallmentInfo>,
    pub status: TransactionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyGoal {
    pub month: String, // YYYY-MM
    pub value: Decimal,
}
