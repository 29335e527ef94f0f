// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use brokerbooks::errors::ValidationError;
use brokerbooks::models::TransactionStatus;
use brokerbooks::store::TransactionStore;
use brokerbooks::{cli, commands::transactions, utils};
use common::{date, dec, setup};
use rusqlite::Connection;

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["brokerbooks"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => transactions::handle(conn, tx_m),
        _ => panic!("no tx subcommand"),
    }
}

fn list_rows(conn: &Connection, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["brokerbooks", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(conn, list_m).unwrap();
        }
    }
    panic!("no list subcommand");
}

#[test]
fn add_installments_via_cli() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "tx", "add", "--type", "expense", "--description", "Portal listing",
            "--value", "300", "--date", "2024-01-15", "--category", "Marketing",
            "--installments", "3",
        ],
    )
    .unwrap();
    let stored = conn.transactions_for(utils::DEFAULT_USER).unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[2].date, date("2024-03-15"));
    assert!(stored.iter().all(|t| t.value == dec("100")));

    let feb = list_rows(&conn, &["--month", "2024-02"]);
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].plan, "2/3");
    assert_eq!(feb[0].value, "100.00");
}

#[test]
fn add_rejects_invalid_value() {
    let mut conn = setup();
    let err = run(
        &mut conn,
        &[
            "tx", "add", "--type", "income", "--description", "Sale",
            "--value=-10", "--date", "2024-01-15", "--category", "Commission",
        ],
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>().and_then(|e| e.field()),
        Some("value")
    );
    assert!(conn.transactions_for(utils::DEFAULT_USER).unwrap().is_empty());
}

#[test]
fn user_flag_scopes_records() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "tx", "add", "--user", "carla", "--type", "income", "--description", "Rental fee",
            "--value", "800", "--date", "2024-01-05", "--category", "Rental", "--recurring",
        ],
    )
    .unwrap();
    assert!(conn.transactions_for(utils::DEFAULT_USER).unwrap().is_empty());
    let rows = list_rows(&conn, &["--user", "carla", "--month", "2024-06"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2024-06-05");
    assert_eq!(rows[0].plan, "recurring");
}

#[test]
fn stored_profile_is_default_owner() {
    let mut conn = setup();
    utils::set_current_user(&conn, "dora").unwrap();
    run(
        &mut conn,
        &[
            "tx", "add", "--type", "expense", "--description", "Fuel",
            "--value", "60", "--date", "2024-02-02", "--category", "Car",
        ],
    )
    .unwrap();
    assert_eq!(conn.transactions_for("dora").unwrap().len(), 1);
}

#[test]
fn pay_marks_received_and_list_filters() {
    let mut conn = setup();
    for (desc, kind) in [("Commission", "income"), ("Ads", "expense"), ("Bonus", "income")] {
        run(
            &mut conn,
            &[
                "tx", "add", "--type", kind, "--description", desc,
                "--value", "10", "--date", "2024-04-01", "--category", "General",
            ],
        )
        .unwrap();
    }
    let id = conn.transactions_for(utils::DEFAULT_USER).unwrap()[0]
        .id
        .to_string();
    run(&mut conn, &["tx", "pay", "--id", id.as_str()]).unwrap();
    assert_eq!(
        conn.transactions_for(utils::DEFAULT_USER).unwrap()[0].status,
        TransactionStatus::Paid
    );

    let received = list_rows(&conn, &["--status", "received"]);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].status, "received");

    let incomes = list_rows(&conn, &["--type", "income", "--limit", "1"]);
    assert_eq!(incomes.len(), 1);
    // newest id first on equal dates
    assert_eq!(incomes[0].description, "Bonus");

    let err = run(
        &mut conn,
        &["tx", "status", "--id", id.as_str(), "--to", "pending"],
    );
    assert!(err.is_err());
}

#[test]
fn edit_rejects_non_positive_value() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "tx", "add", "--type", "expense", "--description", "Sign",
            "--value", "25", "--date", "2024-04-01", "--category", "Marketing",
        ],
    )
    .unwrap();
    let id = conn.transactions_for(utils::DEFAULT_USER).unwrap()[0].id.to_string();
    assert!(run(&mut conn, &["tx", "edit", "--id", id.as_str(), "--value", "0"]).is_err());
    run(&mut conn, &["tx", "edit", "--id", id.as_str(), "--value", " 30.5 "]).unwrap();
    assert_eq!(
        conn.transactions_for(utils::DEFAULT_USER).unwrap()[0].value,
        dec("30.5")
    );
}
