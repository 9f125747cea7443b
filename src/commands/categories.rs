// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::SqliteLedger;
use crate::models::CategoryMapping;
use crate::period::Period;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle(ledger: &SqliteLedger, m: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let mappings = sub
                .get_many::<String>("map")
                .unwrap()
                .map(|s| parse_mapping(s))
                .collect::<Result<Vec<_>>>()?;
            let n = ledger.upsert_mappings(&mappings)?;
            println!("Saved {} mapping(s)", n);
        }
        Some(("list", sub)) => {
            let data = ledger.descriptions()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|(d, l)| vec![d, l.unwrap_or_default()])
                    .collect();
                println!("{}", pretty_table(&["Description", "Category"], rows));
            }
        }
        Some(("show", sub)) => {
            let label = sub.get_one::<String>("label").unwrap().trim();
            let data = detail(ledger, label, today)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|d| vec![d.description.clone(), fmt_money(&d.amount)])
                    .collect();
                println!("{}", pretty_table(&["Description", label], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

/// `DESCRIPTION=LABEL`; the last `=` separates so descriptions may contain one.
pub fn parse_mapping(s: &str) -> Result<CategoryMapping> {
    let (pattern, label) = s
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Invalid mapping '{}', expected DESCRIPTION=LABEL", s))?;
    let (pattern, label) = (pattern.trim(), label.trim());
    if pattern.is_empty() || label.is_empty() {
        return Err(anyhow!("Invalid mapping '{}', expected DESCRIPTION=LABEL", s));
    }
    Ok(CategoryMapping {
        id: None,
        pattern: pattern.to_string(),
        label: label.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct DetailRow {
    pub description: String,
    pub amount: rust_decimal::Decimal,
}

/// Year-to-date sums per description for one category.
pub fn detail(ledger: &SqliteLedger, label: &str, today: NaiveDate) -> Result<Vec<DetailRow>> {
    let (from, to) = Period::Type.window(today);
    Ok(ledger
        .category_detail(label, from, to)?
        .into_iter()
        .map(|(description, amount)| DetailRow {
            description,
            amount,
        })
        .collect())
}
