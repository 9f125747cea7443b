// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use magicbudget::ledger::SqliteLedger;
use magicbudget::store::LedgerStore;
use magicbudget::{cli, commands::transactions};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
}

fn run(ledger: &SqliteLedger, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(
        std::iter::once("magicbudget").chain(args.iter().copied()),
    );
    match matches.subcommand() {
        Some(("tx", sub)) => transactions::handle(ledger, sub, today()),
        _ => panic!("no tx subcommand"),
    }
}

#[test]
fn expenses_are_stored_negative_and_income_positive() {
    let ledger = SqliteLedger::in_memory().unwrap();
    run(&ledger, &["tx", "add", "--description", "Coffee", "--amount", "3.20"]).unwrap();
    run(&ledger, &["tx", "add", "-d", "Refund", "-a", "-7", "--income"]).unwrap();
    run(&ledger, &["tx", "add", "-d", "Typo", "-a", "-5"]).unwrap();

    let rows = ledger.transactions_on(today()).unwrap();
    let amounts: Vec<Decimal> = rows.iter().map(|t| t.amount).collect();
    // newest first
    assert_eq!(amounts, vec![dec("-5"), dec("7"), dec("-3.20")]);
    assert!(rows[1].is_income);
    assert_eq!(ledger.transaction_sum_on(today()).unwrap(), dec("-1.20"));
}

#[test]
fn explicit_date_is_respected() {
    let ledger = SqliteLedger::in_memory().unwrap();
    run(
        &ledger,
        &["tx", "add", "-d", "Books", "-a", "20", "--date", "2024-12-30"],
    )
    .unwrap();
    assert!(ledger.transactions_on(today()).unwrap().is_empty());
    let all = ledger.transactions_between(None, None).unwrap();
    assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
}

#[test]
fn bad_input_is_rejected() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let err = run(&ledger, &["tx", "add", "-d", "X", "-a", "ten"]).unwrap_err();
    assert!(err.to_string().contains("Invalid decimal"));
    let err = run(&ledger, &["tx", "add", "-d", "X", "-a", "1", "--date", "03/01/2025"]).unwrap_err();
    assert!(err.to_string().contains("Invalid date"));
}

#[test]
fn edit_resigns_amount_and_keeps_date() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let tx = ledger
        .add_transaction(today(), "Lunch", dec("9"), false)
        .unwrap();
    let id = tx.id.to_string();
    run(
        &ledger,
        &["tx", "edit", "--id", &id, "-d", "Lunch paid back", "-a", "9", "--income"],
    )
    .unwrap();
    let edited = ledger.transaction(tx.id).unwrap();
    assert_eq!(edited.amount, dec("9"));
    assert_eq!(edited.description, "Lunch paid back");
    assert_eq!(edited.date, today());

    assert!(run(&ledger, &["tx", "edit", "--id", "99", "-d", "X", "-a", "1"]).is_err());
}

#[test]
fn list_filters_by_range_oldest_first() {
    let ledger = SqliteLedger::in_memory().unwrap();
    for d in 1..=3 {
        ledger
            .add_transaction(NaiveDate::from_ymd_opt(2025, 1, d).unwrap(), "P", dec("10"), false)
            .unwrap();
    }
    let rows = ledger
        .transactions_between(NaiveDate::from_ymd_opt(2025, 1, 2), None)
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    run(&ledger, &["tx", "list", "--from", "2025-01-02", "--json"]).unwrap();
}
