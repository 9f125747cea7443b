// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::CategoryShare;
use crate::period::Period;
use crate::store::LedgerStore;

/// `|value| / |total| * 100` at currency precision; zero when `total` is zero.
pub fn percentage_of(total: Decimal, value: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (value.abs() / total.abs() * Decimal::ONE_HUNDRED).round_dp(2)
}

/// One share per category, relative to the sum of absolute values.
pub fn category_shares(sums: Vec<(String, Decimal)>) -> Vec<CategoryShare> {
    let total: Decimal = sums.iter().map(|(_, v)| v.abs()).sum();
    sums.into_iter()
        .map(|(label, value)| CategoryShare {
            percentage: percentage_of(total, value),
            label,
            value,
        })
        .collect()
}

/// Per-label sums over the `type` window, year to date.
pub fn category_sums<S: LedgerStore + ?Sized>(
    store: &S,
    today: NaiveDate,
) -> EngineResult<Vec<(String, Decimal)>> {
    let (from, to) = Period::Type.window(today);
    store.category_grouped_sum(from, to)
}

/// Year-to-date category breakdown for the `type` period.
pub fn category_breakdown<S: LedgerStore + ?Sized>(
    store: &S,
    period: Period,
    today: NaiveDate,
) -> EngineResult<Vec<CategoryShare>> {
    if period != Period::Type {
        return Err(EngineError::UnsupportedPeriod(period.to_string()));
    }
    Ok(category_shares(category_sums(store, today)?))
}
