// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::SqliteLedger;
use crate::models::Transaction;
use crate::store::LedgerStore;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use chrono::NaiveDate;

pub fn handle(ledger: &SqliteLedger, m: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub, today)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("today", sub)) => {
            let data = ledger.transactions_on(today)?;
            print_transactions(sub, &data)?;
        }
        _ => {}
    }
    Ok(())
}

fn add(ledger: &SqliteLedger, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today,
    };
    let description = sub.get_one::<String>("description").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let income = sub.get_flag("income");

    let tx = ledger.add_transaction(date, description, amount, income)?;
    println!(
        "Recorded {} on {} for '{}' (id {})",
        fmt_money(&tx.amount),
        tx.date,
        tx.description,
        tx.id
    );
    Ok(())
}

fn edit(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let description = sub.get_one::<String>("description").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let income = sub.get_flag("income");

    let tx = ledger
        .update_transaction(id, description, amount, income)
        .with_context(|| format!("Editing transaction {}", id))?;
    println!("Updated transaction {}: {} '{}'", tx.id, fmt_money(&tx.amount), tx.description);
    Ok(())
}

fn list(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let data = ledger.transactions_between(from, to)?;
    print_transactions(sub, &data)
}

fn print_transactions(sub: &clap::ArgMatches, data: &[Transaction]) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.description.clone(),
                    fmt_money(&t.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Date", "Description", "Amount"], rows));
    }
    Ok(())
}
