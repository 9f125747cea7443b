// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use magicbudget::amortize::{amortize, refresh_influence};
use magicbudget::error::EngineError;
use magicbudget::ledger::SqliteLedger;
use magicbudget::models::Recurrence;
use magicbudget::store::LedgerStore;
use magicbudget::{cli, commands::fixed};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
}

fn run(ledger: &SqliteLedger, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(
        std::iter::once("magicbudget").chain(args.iter().copied()),
    );
    match matches.subcommand() {
        Some(("fixed", sub)) => fixed::handle(ledger, sub, today()),
        _ => panic!("no fixed subcommand"),
    }
}

#[test]
fn add_stores_amortized_influence() {
    let ledger = SqliteLedger::in_memory().unwrap();
    run(
        &ledger,
        &["fixed", "add", "--description", "Rent", "--amount", "730", "--recurrence", "monthly"],
    )
    .unwrap();
    let obs = ledger.recurring_obligations().unwrap();
    assert_eq!(obs.len(), 1);
    assert_eq!(obs[0].amount, dec("730"));
    assert_eq!(obs[0].influence(), dec("-24"));
    assert_eq!(obs[0].influence_year(), 2023);
}

#[test]
fn edit_rederives_influence_with_the_new_fields() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let ob = ledger
        .add_obligation("Rent", dec("730"), false, Recurrence::Monthly, 2023)
        .unwrap();
    let id = ob.id.to_string();
    run(
        &ledger,
        &[
            "fixed", "edit", "--id", &id, "--description", "Side gig", "--amount", "365",
            "--recurrence", "twice a year", "--income",
        ],
    )
    .unwrap();
    let stored = ledger.obligation(ob.id).unwrap();
    assert_eq!(stored.description, "Side gig");
    assert_eq!(stored.recurrence, Recurrence::TwiceAYear);
    assert!(stored.is_income);
    assert_eq!(stored.influence(), dec("2"));
    assert_eq!(
        stored.influence(),
        amortize(stored.amount, stored.recurrence, stored.is_income, 2023).unwrap()
    );
}

#[test]
fn unknown_recurrence_is_rejected() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let err = run(
        &ledger,
        &["fixed", "add", "--description", "Gym", "--amount", "30", "--recurrence", "weekly"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unsupported recurrence"));
    assert!(ledger.recurring_obligations().unwrap().is_empty());
}

#[test]
fn editing_a_missing_obligation_fails() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let err = ledger
        .update_obligation(42, "Ghost", dec("1"), false, Recurrence::Yearly, 2023)
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { id: 42, .. }));
}

#[test]
fn refresh_reamortizes_only_stale_rows() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let old = ledger
        .add_obligation("Salary", dec("3660"), true, Recurrence::Yearly, 2023)
        .unwrap();
    ledger
        .add_obligation("Phone", dec("366"), false, Recurrence::Yearly, 2024)
        .unwrap();

    assert_eq!(fixed::refresh_stale(&ledger, 2024).unwrap(), 1);
    let refreshed = ledger.obligation(old.id).unwrap();
    assert_eq!(refreshed.influence(), dec("10"));
    assert_eq!(refreshed.influence_year(), 2024);
    assert_eq!(ledger.recurring_influence_sum().unwrap(), dec("9"));

    assert_eq!(fixed::refresh_stale(&ledger, 2024).unwrap(), 0);
}

#[test]
fn refresh_of_missing_row_reports_not_found() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let ghost = magicbudget::models::RecurringObligation::new(
        7,
        "Ghost",
        dec("100"),
        false,
        Recurrence::Yearly,
        2023,
    )
    .unwrap();
    assert!(matches!(
        refresh_influence(&ledger, &ghost, 2024),
        Err(EngineError::NotFound { id: 7, .. })
    ));
}

#[test]
fn refresh_from_an_outdated_read_leaves_the_edit_intact() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let ob = ledger
        .add_obligation("Rent", dec("730"), false, Recurrence::Monthly, 2023)
        .unwrap();
    let snapshot = ledger.obligation(ob.id).unwrap();
    ledger
        .update_obligation(ob.id, "Rent", dec("1460"), false, Recurrence::Monthly, 2023)
        .unwrap();

    assert!(matches!(
        refresh_influence(&ledger, &snapshot, 2024),
        Err(EngineError::StaleObligation { id }) if id == ob.id
    ));
    let stored = ledger.obligation(ob.id).unwrap();
    assert_eq!(stored.amount, dec("1460"));
    assert_eq!(stored.influence(), dec("-48"));
    assert_eq!(
        stored.influence(),
        amortize(stored.amount, stored.recurrence, stored.is_income, stored.influence_year())
            .unwrap()
    );
}

#[test]
fn refresh_stale_picks_up_the_latest_fields() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let ob = ledger
        .add_obligation("Rent", dec("730"), false, Recurrence::Monthly, 2023)
        .unwrap();
    ledger
        .update_obligation(ob.id, "Rent", dec("1464"), false, Recurrence::Monthly, 2023)
        .unwrap();

    assert_eq!(fixed::refresh_stale(&ledger, 2024).unwrap(), 1);
    let stored = ledger.obligation(ob.id).unwrap();
    assert_eq!(stored.influence(), dec("-48"));
    assert_eq!(stored.influence_year(), 2024);
}

#[test]
fn amount_too_large_to_amortize_is_an_error() {
    let ledger = SqliteLedger::in_memory().unwrap();
    let err = run(
        &ledger,
        &[
            "fixed", "add", "--description", "Big", "--amount", "79228162514264337593543950335",
            "--recurrence", "monthly",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("overflow"));
    assert!(ledger.recurring_obligations().unwrap().is_empty());
}
