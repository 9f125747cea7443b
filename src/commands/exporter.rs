// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::SqliteLedger;
use crate::store::LedgerStore;
use anyhow::{Result, bail};
use serde_json::json;

pub fn handle(ledger: &SqliteLedger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ledger, sub),
        Some(("fixed", sub)) => export_fixed(ledger, sub),
        _ => Ok(()),
    }
}

fn export_transactions(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let rows = ledger.transactions_between(None, None)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "description", "amount", "income"])?;
            for t in &rows {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.is_income.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date.to_string(), "description": t.description,
                        "amount": t.amount.to_string(), "income": t.is_income
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transaction(s) to {}", rows.len(), out);
    Ok(())
}

fn export_fixed(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let rows = ledger.recurring_obligations()?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "description",
                "amount",
                "income",
                "recurrence",
                "influence",
                "influence_year",
            ])?;
            for o in &rows {
                wtr.write_record([
                    o.id.to_string(),
                    o.description.clone(),
                    o.amount.to_string(),
                    o.is_income.to_string(),
                    o.recurrence.to_string(),
                    o.influence().to_string(),
                    o.influence_year().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => std::fs::write(out, serde_json::to_string_pretty(&rows)?)?,
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} obligation(s) to {}", rows.len(), out);
    Ok(())
}
