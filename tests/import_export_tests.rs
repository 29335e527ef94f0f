// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use brokerbooks::commands::{exporter, importer};
use brokerbooks::models::TransactionStatus;
use brokerbooks::store::TransactionStore;
use brokerbooks::{cli, utils};
use common::{date, dec, setup};
use std::fs;
use tempfile::tempdir;

const HEADER: &str = "date,type,description,value,category,party,notes,recurring,installments,icon\n";

#[test]
fn import_materializes_each_row() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    fs::write(
        &path,
        format!(
            "{}{}{}{}",
            HEADER,
            "2024-01-15,expense,Portal listing,300,Marketing,ZAP,,no,3,\n",
            "2024-01-05, income ,Rental admin fee,800,Rental,Joao,,yes,,\n",
            "2024-01-20,income,Sale commission,12000.50,Commission,,Apto 42,,,house\n",
        ),
    )
    .unwrap();

    let n = importer::import_transactions(&mut conn, "ana", &path).unwrap();
    assert_eq!(n, 5);
    let all = conn.transactions_for("ana").unwrap();
    assert_eq!(all.iter().filter(|t| t.installment.is_some()).count(), 3);
    let rental = all.iter().find(|t| t.is_recurring).unwrap();
    assert_eq!(rental.counterparty.as_deref(), Some("Joao"));
    let sale = all.iter().find(|t| t.value == dec("12000.50")).unwrap();
    assert_eq!(sale.category_icon.as_deref(), Some("house"));
    assert_eq!(sale.notes.as_deref(), Some("Apto 42"));
    assert_eq!(sale.date, date("2024-01-20"));
}

#[test]
fn import_is_all_or_nothing() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(
        &path,
        format!(
            "{}{}{}",
            HEADER,
            "2024-01-15,expense,Portal listing,300,Marketing,,,,3,\n",
            "2024-01-16,expense,Broken,,Marketing,,,,,\n",
        ),
    )
    .unwrap();
    let err = importer::import_transactions(&mut conn, "ana", &path).unwrap_err();
    assert!(err.to_string().contains("Line 3"));
    assert!(conn.transactions_for("ana").unwrap().is_empty());
}

#[test]
fn import_rejects_recurring_installments() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.csv");
    fs::write(
        &path,
        format!("{}{}", HEADER, "2024-01-15,expense,Both,300,Marketing,,,true,3,\n"),
    )
    .unwrap();
    assert!(importer::import_transactions(&mut conn, "ana", &path).is_err());
}

#[test]
fn export_json_and_csv() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.csv");
    fs::write(
        &src,
        format!("{}{}", HEADER, "2024-01-15,expense,Portal listing,300,Marketing,,,,3,\n"),
    )
    .unwrap();
    importer::import_transactions(&mut conn, utils::DEFAULT_USER, &src).unwrap();

    let json_out = dir.path().join("out.json");
    let json_str = json_out.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "brokerbooks",
        "export",
        "transactions",
        "--format",
        "json",
        "--out",
        json_str.as_str(),
    ]);
    if let Some(("export", m)) = matches.subcommand() {
        exporter::handle(&conn, m).unwrap();
    } else {
        panic!("export command not parsed");
    }
    let items: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    let arr = items.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[1]["date"], "2024-02-15");
    assert_eq!(arr[1]["installment"]["installment_number"], 2);
    assert_eq!(arr[1]["status"], "pending");

    let csv_out = dir.path().join("out.csv");
    let csv_str = csv_out.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "brokerbooks",
        "export",
        "transactions",
        "--out",
        csv_str.as_str(),
    ]);
    if let Some(("export", m)) = matches.subcommand() {
        exporter::handle(&conn, m).unwrap();
    }
    let text = fs::read_to_string(&csv_out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[3].starts_with("2024-03-15,expense,Portal listing,"));
    assert!(lines[3].contains(",3/3,"));
}

fn export_csv(conn: &rusqlite::Connection, out: &std::path::Path) {
    let out = out.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "brokerbooks",
        "export",
        "transactions",
        "--out",
        out.as_str(),
    ]);
    match matches.subcommand() {
        Some(("export", m)) => exporter::handle(conn, m).unwrap(),
        _ => panic!("export command not parsed"),
    }
}

#[test]
fn csv_export_reads_back_through_import() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.csv");
    fs::write(
        &src,
        format!(
            "{}{}{}{}",
            HEADER,
            "2024-01-15,expense,Portal listing,300,Marketing,ZAP,,,3,megaphone\n",
            "2024-01-05,income,Rental admin fee,800,Rental,Joao,,yes,,\n",
            "2024-01-20,income,Sale commission,12000.50,Commission,,Apto 42,,,\n",
        ),
    )
    .unwrap();
    importer::import_transactions(&mut conn, utils::DEFAULT_USER, &src).unwrap();
    let before = conn.transactions_for(utils::DEFAULT_USER).unwrap();
    let first = before
        .iter()
        .find(|t| t.installment.as_ref().is_some_and(|i| i.installment_number == 1))
        .unwrap();
    conn.update_status(utils::DEFAULT_USER, first.id, TransactionStatus::Paid)
        .unwrap();

    let out = dir.path().join("out.csv");
    export_csv(&conn, &out);
    let n = importer::import_transactions(&mut conn, "bob", &out).unwrap();
    assert_eq!(n, 5);

    let after = conn.transactions_for("bob").unwrap();
    let siblings: Vec<_> = after.iter().filter(|t| t.installment.is_some()).collect();
    assert_eq!(siblings.len(), 3);
    let group = &siblings[0].installment.as_ref().unwrap().group_id;
    assert_ne!(group, &first.installment.as_ref().unwrap().group_id);
    for (i, t) in siblings.iter().enumerate() {
        let info = t.installment.as_ref().unwrap();
        assert_eq!(&info.group_id, group);
        assert_eq!(info.installments, 3);
        assert_eq!(info.installment_number, i as u32 + 1);
        assert_eq!(info.total_value, dec("300"));
        assert_eq!(t.value, dec("100"));
        assert_eq!(t.category_icon.as_deref(), Some("megaphone"));
        assert!(!t.is_recurring);
    }
    assert_eq!(siblings[0].status, TransactionStatus::Paid);
    assert_eq!(siblings[1].status, TransactionStatus::Pending);
    assert_eq!(siblings[2].date, date("2024-03-15"));
    assert_eq!(after.iter().filter(|t| t.is_recurring).count(), 1);
}

#[test]
fn import_rejects_positioned_row_without_group() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("orphan.csv");
    fs::write(
        &path,
        format!("{}{}", HEADER, "2024-01-15,expense,Portal listing,100,Marketing,,,,2/3,\n"),
    )
    .unwrap();
    let err = importer::import_transactions(&mut conn, "ana", &path).unwrap_err();
    assert!(err.to_string().contains("Line 2"));
    assert!(conn.transactions_for("ana").unwrap().is_empty());
}
