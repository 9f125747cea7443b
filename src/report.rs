// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report assembly. Independent aggregates are evaluated on scoped threads
//! and joined once before anything depending on them runs.

use std::panic;
use std::thread::{self, ScopedJoinHandle};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::EngineResult;
use crate::magic::{
    base_magic_number, current_magic_number, period_series, project_daily_series,
    project_monthly_series, total_expenses,
};
use crate::models::{BucketedSeries, CategoryShare, RecurringObligation, Transaction};
use crate::period::Period;
use crate::rollup::{category_shares, category_sums};
use crate::store::LedgerStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub magic_number: Decimal,
    /// Allowance left on each day of the current week.
    pub daily: BucketedSeries,
    /// Month-end budget projection for each month of the year so far.
    pub monthly: BucketedSeries,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub obligations: Vec<RecurringObligation>,
    pub today_transactions: Vec<Transaction>,
    pub base_magic_number: Decimal,
    pub current_magic_number: Decimal,
    pub week_total: Decimal,
    pub month_total: Decimal,
    pub year_total: Decimal,
}

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle.join().unwrap_or_else(|e| panic::resume_unwind(e))
}

pub fn stats_report<S: LedgerStore + ?Sized>(
    store: &S,
    today: NaiveDate,
) -> EngineResult<StatsReport> {
    let (base, daily, monthly, categories) = thread::scope(|s| {
        let base = s.spawn(|| base_magic_number(store));
        let daily = s.spawn(|| period_series(store, Period::Daily, today));
        let monthly = s.spawn(|| period_series(store, Period::Monthly, today));
        let categories = s.spawn(|| category_sums(store, today));
        (join(base), join(daily), join(monthly), join(categories))
    });
    let base = base?;
    Ok(StatsReport {
        magic_number: base,
        daily: project_daily_series(&daily?, base)?,
        monthly: project_monthly_series(&monthly?, base, today.year())?,
        categories: category_shares(categories?),
    })
}

pub fn overview<S: LedgerStore + ?Sized>(store: &S, today: NaiveDate) -> EngineResult<Overview> {
    let (week, month, year) = thread::scope(|s| {
        let week = s.spawn(|| total_expenses(store, Period::Week, today));
        let month = s.spawn(|| total_expenses(store, Period::Month, today));
        let year = s.spawn(|| total_expenses(store, Period::Year, today));
        (join(week), join(month), join(year))
    });
    Ok(Overview {
        obligations: store.recurring_obligations()?,
        today_transactions: store.transactions_on(today)?,
        base_magic_number: base_magic_number(store)?,
        current_magic_number: current_magic_number(store, today)?,
        week_total: week?,
        month_total: month?,
        year_total: year?,
    })
}
