// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{Bucket, RecurringObligation, Transaction};
use crate::period::Grouping;

/// Read side of the ledger consumed by the engine, plus the single write
/// the amortization refresh needs.
///
/// Implementations must be shareable across the scoped threads that
/// evaluate independent aggregates.
pub trait LedgerStore: Sync {
    /// Sums of one-off amounts in `from..=to` grouped by `grouping`,
    /// ordered ascending by key.
    fn grouped_sum(
        &self,
        grouping: Grouping,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<Bucket>>;

    /// Sum of every recurring obligation's stored influence.
    fn recurring_influence_sum(&self) -> EngineResult<Decimal>;

    /// Sum of one-off amounts dated `day`.
    fn transaction_sum_on(&self, day: NaiveDate) -> EngineResult<Decimal>;

    /// Sum of one-off amounts in `from..=to`.
    fn window_sum(&self, from: NaiveDate, to: NaiveDate) -> EngineResult<Decimal>;

    /// Per-label sums of mapped one-off amounts in `from..=to`.
    fn category_grouped_sum(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<(String, Decimal)>>;

    /// Stores a re-derived influence for `obligation`, but only while the
    /// stored amount, income flag and recurrence still equal the snapshot.
    fn persist_influence(
        &self,
        obligation: &RecurringObligation,
        influence: Decimal,
        year: i32,
    ) -> EngineResult<()>;

    fn recurring_obligations(&self) -> EngineResult<Vec<RecurringObligation>>;

    fn transactions_on(&self, day: NaiveDate) -> EngineResult<Vec<Transaction>>;
}
