// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use brokerbooks::commands::{doctor, reports};
use brokerbooks::finance::{MonthWindow, TransactionForm, materialize};
use brokerbooks::models::{TransactionKind, TransactionStatus};
use brokerbooks::store::TransactionStore;
use common::{date, dec, expense, income, recurring, setup, with_status};
use rusqlite::Connection;

fn add(conn: &mut Connection, kind: &str, value: &str, on: &str, category: &str, recurring: bool) -> Vec<i64> {
    let form = TransactionForm {
        kind: Some(kind.into()),
        description: Some(format!("{} {}", category, on)),
        value: Some(value.into()),
        date: Some(on.into()),
        category: Some(category.into()),
        recurring,
        ..Default::default()
    };
    let recs = materialize(&form.validate().unwrap()).unwrap();
    conn.insert_batch("ana", &recs).unwrap()
}

#[test]
fn summary_uses_stored_goal_and_received_income() {
    let mut conn = setup();
    let paid = add(&mut conn, "income", "250", "2024-03-04", "Commission", false)[0];
    add(&mut conn, "income", "400", "2024-03-18", "Commission", false);
    add(&mut conn, "expense", "1500", "2024-01-10", "Rent", true);
    add(&mut conn, "income", "200", "2024-02-11", "Commission", false);
    conn.update_status("ana", paid, TransactionStatus::Paid).unwrap();
    conn.set_monthly_goal("ana", "2024-03", dec("1000")).unwrap();

    let r = reports::summary_for(&conn, "ana", "2024-03").unwrap();
    assert_eq!(r.current.total_income, dec("650"));
    assert_eq!(r.current.total_expense, dec("1500"));
    assert_eq!(r.current.balance, dec("-850"));
    assert_eq!(r.goal, Some(dec("1000")));
    assert_eq!(r.goal_progress, dec("25"));
    // 650 vs 200 last month
    assert_eq!(r.change.income, dec("225"));
    // rent recurs in February too
    assert_eq!(r.change.expense, dec("0"));
}

#[test]
fn summary_without_goal_has_zero_progress() {
    let mut conn = setup();
    let id = add(&mut conn, "income", "100", "2024-03-04", "Commission", false)[0];
    conn.update_status("ana", id, TransactionStatus::Paid).unwrap();
    let r = reports::summary_for(&conn, "ana", "2024-03").unwrap();
    assert!(r.goal.is_none());
    assert!(r.goal_progress.is_zero());
}

#[test]
fn cashflow_rolls_up_trailing_months() {
    let mut conn = setup();
    add(&mut conn, "income", "1000", "2024-01-05", "Commission", false);
    add(&mut conn, "expense", "100", "2024-02-01", "Software", true);
    add(&mut conn, "income", "300", "2024-03-20", "Commission", false);

    let to = MonthWindow::from_key("2024-03").unwrap();
    let rows = reports::cashflow_rows(&conn, "ana", &to, 4).unwrap();
    let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, vec!["2023-12", "2024-01", "2024-02", "2024-03"]);
    assert!(rows[0].income.is_zero());
    assert_eq!(rows[1].income, dec("1000"));
    assert_eq!(rows[2].expense, dec("100"));
    assert_eq!(rows[3].expense, dec("100"));
    assert_eq!(rows[3].balance, dec("200"));
}

#[test]
fn doctor_flags_past_due_and_broken_groups() {
    let mut a = income(1, "100", "2024-01-10");
    a.installment = Some(brokerbooks::models::InstallmentInfo {
        installments: 3,
        installment_number: 1,
        group_id: "g1".into(),
        total_value: dec("300"),
    });
    let mut c = a.clone();
    c.id = 3;
    c.date = date("2024-03-10");
    c.installment.as_mut().unwrap().installment_number = 3;

    let all = vec![
        with_status(a, TransactionStatus::Paid),
        with_status(c, TransactionStatus::Paid),
        expense(4, "50", "2024-05-01", "Fuel"),
        recurring(expense(5, "70", "2024-01-01", "Rent")),
        with_status(expense(6, "20", "2024-05-01", "Fuel"), TransactionStatus::Overdue),
    ];
    let issues = doctor::find_issues(&all, date("2024-06-01"));
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0][0], "pending_past_due");
    assert!(issues[0][1].starts_with("#4 "));
    assert_eq!(issues[1], vec!["incomplete_installments", "group g1 missing 2"]);
    // the scan never touches statuses
    assert_eq!(all[2].status, TransactionStatus::Pending);
    assert_eq!(all[2].kind, TransactionKind::Expense);
}
