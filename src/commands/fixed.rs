// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amortize::refresh_influence;
use crate::error::EngineError;
use crate::ledger::SqliteLedger;
use crate::models::Recurrence;
use crate::store::LedgerStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

pub fn handle(ledger: &SqliteLedger, m: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub, today)?,
        Some(("edit", sub)) => edit(ledger, sub, today)?,
        Some(("list", sub)) => list(ledger, sub, today)?,
        Some(("refresh", _)) => {
            let n = refresh_stale(ledger, today.year())?;
            println!("Re-amortized {} obligation(s) for {}", n, today.year());
        }
        _ => {}
    }
    Ok(())
}

struct Entry<'a> {
    description: &'a str,
    amount: rust_decimal::Decimal,
    income: bool,
    recurrence: Recurrence,
}

fn entry(sub: &clap::ArgMatches) -> Result<Entry<'_>> {
    Ok(Entry {
        description: sub.get_one::<String>("description").unwrap().trim(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        income: sub.get_flag("income"),
        recurrence: sub.get_one::<String>("recurrence").unwrap().parse()?,
    })
}

fn add(ledger: &SqliteLedger, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let e = entry(sub)?;
    let ob = ledger.add_obligation(e.description, e.amount, e.income, e.recurrence, today.year())?;
    println!(
        "Added {} '{}' {} -> {} per day (id {})",
        ob.recurrence,
        ob.description,
        fmt_money(&ob.amount),
        fmt_money(&ob.influence()),
        ob.id
    );
    Ok(())
}

fn edit(ledger: &SqliteLedger, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let e = entry(sub)?;
    let ob = ledger
        .update_obligation(id, e.description, e.amount, e.income, e.recurrence, today.year())
        .with_context(|| format!("Editing obligation {}", id))?;
    println!(
        "Updated obligation {}: {} per day",
        ob.id,
        fmt_money(&ob.influence())
    );
    Ok(())
}

fn list(ledger: &SqliteLedger, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let data = ledger.recurring_obligations()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|o| {
                let mut per_day = fmt_money(&o.influence());
                if o.is_stale(today.year()) {
                    per_day.push_str(&format!(" (from {})", o.influence_year()));
                }
                vec![
                    o.id.to_string(),
                    o.description.clone(),
                    fmt_money(&o.amount),
                    if o.is_income { "income" } else { "cost" }.to_string(),
                    o.recurrence.to_string(),
                    per_day,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Description", "Amount", "Kind", "Recurrence", "Per day"], rows)
        );
    }
    Ok(())
}

/// Re-amortizes every obligation whose influence was computed for another year.
/// A row edited after it was listed is read again before retrying.
pub fn refresh_stale(ledger: &SqliteLedger, year: i32) -> Result<usize> {
    let mut n = 0;
    for ob in ledger.recurring_obligations()? {
        if !ob.is_stale(year) {
            continue;
        }
        match refresh_influence(ledger, &ob, year) {
            Ok(_) => n += 1,
            Err(EngineError::StaleObligation { id }) => {
                let current = ledger.obligation(id)?;
                if current.is_stale(year) {
                    refresh_influence(ledger, &current, year)
                        .with_context(|| format!("Refreshing obligation {}", id))?;
                    n += 1;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(n)
}
