// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The "magic number": how much can be spent today.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::days_in_month;
use crate::error::{EngineError, EngineResult};
use crate::models::{Bucket, BucketedSeries};
use crate::period::Period;
use crate::series::{bucket_number, fill_gaps};
use crate::store::LedgerStore;

/// Daily allowance from recurring obligations alone.
pub fn base_magic_number<S: LedgerStore + ?Sized>(store: &S) -> EngineResult<Decimal> {
    store.recurring_influence_sum()
}

/// Base allowance after today's one-off activity.
pub fn current_magic_number<S: LedgerStore + ?Sized>(
    store: &S,
    today: NaiveDate,
) -> EngineResult<Decimal> {
    let base = base_magic_number(store)?;
    let spent_today = store.transaction_sum_on(today)?;
    base.checked_add(spent_today)
        .ok_or(EngineError::Overflow("adding today's spend"))
}

/// Sum of one-off amounts for `week`, `month` or `year` to date.
/// Expenses are negative; callers flip the sign for a magnitude.
pub fn total_expenses<S: LedgerStore + ?Sized>(
    store: &S,
    period: Period,
    today: NaiveDate,
) -> EngineResult<Decimal> {
    if !period.is_total() {
        return Err(EngineError::UnsupportedPeriod(period.to_string()));
    }
    let (from, to) = period.window(today);
    store.window_sum(from, to)
}

/// Gap-filled grouped sums for the `daily`, `monthly` or `yearly` series.
pub fn period_series<S: LedgerStore + ?Sized>(
    store: &S,
    period: Period,
    today: NaiveDate,
) -> EngineResult<BucketedSeries> {
    let grouping = period
        .grouping()
        .ok_or_else(|| EngineError::UnsupportedPeriod(period.to_string()))?;
    let (from, to) = period.window(today);
    let raw = store.grouped_sum(grouping, from, to)?;
    tracing::debug!(%period, %from, %to, buckets = raw.len(), "grouped sums loaded");
    fill_gaps(raw)
}

/// Turns raw daily spend into what was left of the allowance that day.
pub fn project_daily_series(
    series: &[Bucket],
    base_magic_number: Decimal,
) -> EngineResult<BucketedSeries> {
    series
        .iter()
        .map(|b| -> EngineResult<Bucket> {
            let left = base_magic_number
                .checked_sub(b.value * Decimal::NEGATIVE_ONE)
                .ok_or(EngineError::Overflow("projecting the daily series"))?;
            Ok(Bucket::new(b.key.clone(), left))
        })
        .collect()
}

/// Adds a full month of allowance to each monthly sum. Keys are months 1..=12.
pub fn project_monthly_series(
    series: &[Bucket],
    base_magic_number: Decimal,
    year: i32,
) -> EngineResult<BucketedSeries> {
    series
        .iter()
        .map(|b| -> EngineResult<Bucket> {
            let days = days_in_month(year, bucket_number(&b.key)?)?;
            let value = base_magic_number
                .checked_mul(Decimal::from(days))
                .and_then(|allowance| b.value.checked_add(allowance))
                .ok_or(EngineError::Overflow("projecting the monthly series"))?;
            Ok(Bucket::new(b.key.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn daily_projection_adds_base() {
        let raw = vec![
            Bucket::new("224", dec("-12.5")),
            Bucket::new("225", Decimal::ZERO),
            Bucket::new("226", dec("40")),
        ];
        let projected = project_daily_series(&raw, dec("20")).unwrap();
        assert_eq!(projected.len(), raw.len());
        assert_eq!(
            projected.iter().map(|b| b.value).collect::<Vec<_>>(),
            vec![dec("7.5"), dec("20"), dec("60")]
        );
        assert_eq!(projected[0].key, "224");
    }

    #[test]
    fn monthly_projection_uses_month_length() {
        let raw = vec![Bucket::new("01", dec("-100")), Bucket::new("02", dec("-50"))];
        let leap = project_monthly_series(&raw, dec("10"), 2024).unwrap();
        assert_eq!(leap[0].value, dec("210"));
        assert_eq!(leap[1].value, dec("240"));
        let common = project_monthly_series(&raw, dec("10"), 2023).unwrap();
        assert_eq!(common[1].value, dec("230"));
    }

    #[test]
    fn projections_report_overflow() {
        let raw = vec![Bucket::new("01", Decimal::MAX)];
        assert!(matches!(
            project_daily_series(&raw, Decimal::MAX),
            Err(EngineError::Overflow(_))
        ));
        assert!(matches!(
            project_monthly_series(&raw, Decimal::MAX, 2024),
            Err(EngineError::Overflow(_))
        ));
    }

    #[test]
    fn monthly_projection_rejects_non_month_keys() {
        let raw = vec![Bucket::new("13", Decimal::ZERO)];
        assert!(matches!(
            project_monthly_series(&raw, Decimal::ONE, 2024),
            Err(EngineError::InvalidMonth(13))
        ));
        let raw = vec![Bucket::new("Jan", Decimal::ZERO)];
        assert!(matches!(
            project_monthly_series(&raw, Decimal::ONE, 2024),
            Err(EngineError::MalformedBucketKey { .. })
        ));
    }
}
