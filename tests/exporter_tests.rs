// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use magicbudget::ledger::SqliteLedger;
use magicbudget::models::Recurrence;
use magicbudget::{cli, commands::exporter};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> SqliteLedger {
    let ledger = SqliteLedger::in_memory().unwrap();
    ledger
        .add_transaction(
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            "Corner Shop",
            dec("12.34"),
            false,
        )
        .unwrap();
    ledger
        .add_obligation("Rent", dec("730"), false, Recurrence::Monthly, 2023)
        .unwrap();
    ledger
}

fn run(ledger: &SqliteLedger, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(
        std::iter::once("magicbudget").chain(args.iter().copied()),
    );
    match matches.subcommand() {
        Some(("export", sub)) => exporter::handle(ledger, sub),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn export_transactions_csv() {
    let ledger = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let out_str = out.to_string_lossy().to_string();
    run(&ledger, &["export", "transactions", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[1], "date");
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][2], "Corner Shop");
    assert_eq!(&records[0][3], "-12.34");
}

#[test]
fn export_fixed_json_carries_influence() {
    let ledger = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("fixed.json");
    let out_str = out.to_string_lossy().to_string();
    run(&ledger, &["export", "fixed", "--format", "json", "--out", &out_str]).unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let first = &v.as_array().unwrap()[0];
    assert_eq!(first["description"], "Rent");
    assert_eq!(first["recurrence"], "monthly");
    assert_eq!(first["influence_year"], 2023);
    let influence: Decimal = first["influence"].as_str().unwrap().parse().unwrap();
    assert_eq!(influence, dec("-24"));
}

#[test]
fn unknown_format_is_an_error() {
    let ledger = setup();
    let dir = tempdir().unwrap();
    let out_str = dir.path().join("x.xml").to_string_lossy().to_string();
    let err = run(&ledger, &["export", "transactions", "--format", "xml", "--out", &out_str])
        .unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
}
