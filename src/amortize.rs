// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::calendar::days_in_year;
use crate::error::{EngineError, EngineResult};
use crate::models::{Recurrence, RecurringObligation};
use crate::store::LedgerStore;

/// Signed daily contribution of a recurring amount in `year`.
/// Income adds to the daily budget, costs are negated.
pub fn amortize(
    amount: Decimal,
    recurrence: Recurrence,
    is_income: bool,
    year: i32,
) -> EngineResult<Decimal> {
    let daily = amount
        .checked_mul(Decimal::from(recurrence.per_year()))
        .and_then(|yearly| yearly.checked_div(Decimal::from(days_in_year(year))))
        .ok_or(EngineError::Overflow("amortizing"))?;
    Ok(if is_income { daily } else { -daily })
}

/// Recomputes one obligation's influence for `year` and writes it back.
/// The write only lands while the stored row still matches `obligation`;
/// otherwise [`EngineError::StaleObligation`] is returned.
pub fn refresh_influence<S: LedgerStore + ?Sized>(
    store: &S,
    obligation: &RecurringObligation,
    year: i32,
) -> EngineResult<Decimal> {
    let influence = amortize(
        obligation.amount,
        obligation.recurrence,
        obligation.is_income,
        year,
    )?;
    store.persist_influence(obligation, influence, year)?;
    tracing::debug!(
        id = obligation.id,
        old = %obligation.influence(),
        new = %influence,
        year,
        "influence refreshed"
    );
    Ok(influence)
}
