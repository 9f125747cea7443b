// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortize::amortize;
use crate::error::{EngineError, EngineResult};

/// One-off ledger entry. `amount` is signed: expenses negative, income positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub is_income: bool,
}

impl Transaction {
    /// Signs an entered magnitude by the income flag.
    pub fn signed_amount(amount: Decimal, is_income: bool) -> Decimal {
        if is_income { amount.abs() } else { -amount.abs() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Monthly,
    Yearly,
    TwiceAYear,
    Quarterly,
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
            Recurrence::TwiceAYear => "twice_a_year",
            Recurrence::Quarterly => "quarterly",
        }
    }

    /// Occurrences per year.
    pub fn per_year(self) -> u32 {
        match self {
            Recurrence::Monthly => 12,
            Recurrence::Yearly => 1,
            Recurrence::TwiceAYear => 2,
            Recurrence::Quarterly => 4,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "monthly" => Ok(Recurrence::Monthly),
            "yearly" => Ok(Recurrence::Yearly),
            "twice_a_year" => Ok(Recurrence::TwiceAYear),
            "quarterly" => Ok(Recurrence::Quarterly),
            _ => Err(EngineError::UnsupportedRecurrence(s.to_string())),
        }
    }
}

/// A recurring ("fixed") income or cost.
///
/// `influence` is the cached daily rate for `influence_year`. It is only ever
/// set by [`RecurringObligation::new`] or loaded back from the store, which
/// writes it together with the fields it derives from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringObligation {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub is_income: bool,
    pub recurrence: Recurrence,
    influence: Decimal,
    influence_year: i32,
}

impl RecurringObligation {
    pub fn new(
        id: i64,
        description: impl Into<String>,
        amount: Decimal,
        is_income: bool,
        recurrence: Recurrence,
        year: i32,
    ) -> EngineResult<Self> {
        let amount = amount.abs();
        Ok(Self {
            id,
            description: description.into(),
            amount,
            is_income,
            recurrence,
            influence: amortize(amount, recurrence, is_income, year)?,
            influence_year: year,
        })
    }

    pub(crate) fn from_stored(
        id: i64,
        description: String,
        amount: Decimal,
        is_income: bool,
        recurrence: Recurrence,
        influence: Decimal,
        influence_year: i32,
    ) -> Self {
        Self {
            id,
            description,
            amount,
            is_income,
            recurrence,
            influence,
            influence_year,
        }
    }

    pub fn influence(&self) -> Decimal {
        self.influence
    }

    pub fn influence_year(&self) -> i32 {
        self.influence_year
    }

    /// True when the cached influence was computed for another year.
    pub fn is_stale(&self, year: i32) -> bool {
        self.influence_year != year
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    pub id: Option<i64>,
    pub pattern: String,
    pub label: String,
}

/// One grouping key of a time-series aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: String,
    pub value: Decimal,
}

impl Bucket {
    pub fn new(key: impl Into<String>, value: Decimal) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

pub type BucketedSeries = Vec<Bucket>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub label: String,
    pub value: Decimal,
    pub percentage: Decimal,
}

/// A mapped ledger line listed by the period summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub date: NaiveDate,
    pub label: String,
    pub description: String,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn recurrence_tokens() {
        assert_eq!("Monthly".parse::<Recurrence>().unwrap(), Recurrence::Monthly);
        assert_eq!(
            "twice a year".parse::<Recurrence>().unwrap(),
            Recurrence::TwiceAYear
        );
        assert_eq!(
            "twice_a_year".parse::<Recurrence>().unwrap(),
            Recurrence::TwiceAYear
        );
        assert!(matches!(
            "weekly".parse::<Recurrence>(),
            Err(EngineError::UnsupportedRecurrence(_))
        ));
    }

    #[test]
    fn signed_amount_follows_income_flag() {
        assert_eq!(Transaction::signed_amount(dec("12.50"), false), dec("-12.50"));
        assert_eq!(Transaction::signed_amount(dec("-12.50"), true), dec("12.50"));
    }

    #[test]
    fn constructor_derives_influence() {
        let ob = RecurringObligation::new(0, "Salary", dec("3650"), true, Recurrence::Yearly, 2023)
                .unwrap();
        assert_eq!(ob.influence(), dec("10"));
        assert!(!ob.is_stale(2023));
        assert!(ob.is_stale(2024));
    }
}
