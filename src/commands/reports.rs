// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::SqliteLedger;
use crate::magic::{base_magic_number, current_magic_number, period_series, total_expenses};
use crate::models::SummaryEntry;
use crate::period::Period;
use crate::report::{overview, stats_report};
use crate::rollup::category_breakdown;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, series_rows};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(
    ledger: &SqliteLedger,
    name: &str,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match name {
        "summary" => summary(ledger, sub, today),
        "series" => series(ledger, sub, today),
        "magic" => magic(ledger, sub, today),
        "stats" => stats(ledger, sub, today),
        "overview" => print_overview(ledger, sub, today),
        _ => Ok(()),
    }
}

fn period(sub: &clap::ArgMatches) -> Result<Period> {
    Ok(sub.get_one::<String>("period").unwrap().parse::<Period>()?)
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub period: Period,
    pub total: Decimal,
    pub entries: Vec<SummaryEntry>,
}

/// Mapped entries and the period total for `week`, `month` or `year`.
pub fn build_summary(ledger: &SqliteLedger, period: Period, today: NaiveDate) -> Result<Summary> {
    let total = total_expenses(ledger, period, today)?;
    let (from, to) = period.window(today);
    Ok(Summary {
        period,
        total,
        entries: ledger.summary_entries(from, to)?,
    })
}

fn summary(ledger: &SqliteLedger, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let data = build_summary(ledger, period(sub)?, today)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .entries
            .iter()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    e.label.clone(),
                    e.description.clone(),
                    fmt_money(&e.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Category", "Description", "Amount"], rows)
        );
        println!("Total this {}: {}", data.period, fmt_money(&-data.total));
    }
    Ok(())
}

fn series(ledger: &SqliteLedger, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    match period(sub)? {
        Period::Type => {
            let data = category_breakdown(ledger, Period::Type, today)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.label.clone(),
                            fmt_money(&c.value),
                            format!("{}%", fmt_money(&c.percentage)),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Category", "Sum", "Share"], rows));
            }
        }
        p if p.grouping().is_some() => {
            let data = period_series(ledger, p, today)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                println!("{}", pretty_table(&["Bucket", "Sum"], series_rows(&data)));
            }
        }
        p => bail!("Period '{}' has no series (use daily|monthly|yearly|type)", p),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct MagicNumbers {
    base: Decimal,
    current: Decimal,
}

fn magic(ledger: &SqliteLedger, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let data = MagicNumbers {
        base: base_magic_number(ledger)?,
        current: current_magic_number(ledger, today)?,
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("Magic number: {}", fmt_money(&data.base));
        println!("Left today:   {}", fmt_money(&data.current));
    }
    Ok(())
}

fn stats(ledger: &SqliteLedger, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let data = stats_report(ledger, today)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("Magic number: {}", fmt_money(&data.magic_number));
        println!(
            "{}",
            pretty_table(&["Day of year", "Left that day"], series_rows(&data.daily))
        );
        println!(
            "{}",
            pretty_table(&["Month", "Month-end budget"], series_rows(&data.monthly))
        );
        let rows = data
            .categories
            .iter()
            .map(|c| {
                vec![
                    c.label.clone(),
                    fmt_money(&c.value),
                    format!("{}%", fmt_money(&c.percentage)),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Sum", "Share"], rows));
    }
    Ok(())
}

fn print_overview(ledger: &SqliteLedger, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let data = overview(ledger, today)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!(
            "Magic number: {}   left today: {}",
            fmt_money(&data.base_magic_number),
            fmt_money(&data.current_magic_number)
        );
        let fixed = data
            .obligations
            .iter()
            .map(|o| vec![o.description.clone(), fmt_money(&o.influence())])
            .collect();
        println!("{}", pretty_table(&["Fixed", "Per day"], fixed));
        let todays = data
            .today_transactions
            .iter()
            .map(|t| vec![t.description.clone(), fmt_money(&t.amount)])
            .collect();
        println!("{}", pretty_table(&["Today", "Amount"], todays));
        println!(
            "{}",
            pretty_table(
                &["Week", "Month", "Year"],
                vec![vec![
                    fmt_money(&-data.week_total),
                    fmt_money(&-data.month_total),
                    fmt_money(&-data.year_total),
                ]],
            )
        );
    }
    Ok(())
}
