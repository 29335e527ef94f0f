// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use brokerbooks::db;
use brokerbooks::models::{Transaction, TransactionKind, TransactionStatus};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

pub fn tx(id: i64, kind: TransactionKind, value: &str, on: &str, category: &str) -> Transaction {
    Transaction {
        id,
        owner: "broker".into(),
        kind,
        description: format!("tx {}", id),
        value: dec(value),
        date: date(on),
        category: category.into(),
        category_icon: None,
        counterparty: None,
        notes: None,
        is_recurring: false,
        installment: None,
        status: TransactionStatus::Pending,
    }
}

pub fn income(id: i64, value: &str, on: &str) -> Transaction {
    tx(id, TransactionKind::Income, value, on, "Commission")
}

pub fn expense(id: i64, value: &str, on: &str, category: &str) -> Transaction {
    tx(id, TransactionKind::Expense, value, on, category)
}

pub fn recurring(mut t: Transaction) -> Transaction {
    t.is_recurring = true;
    t
}

pub fn with_status(mut t: Transaction, status: TransactionStatus) -> Transaction {
    t.status = status;
    t
}
