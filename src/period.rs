// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period selectors accepted by the reports and the date windows they cover.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
    Daily,
    Monthly,
    Yearly,
    Type,
}

/// How a grouped query keys its buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    DayOfYear,
    DayOfMonth,
    Month,
}

impl Grouping {
    /// SQLite `strftime` format producing the bucket key.
    pub fn strftime(self) -> &'static str {
        match self {
            Grouping::DayOfYear => "%j",
            Grouping::DayOfMonth => "%d",
            Grouping::Month => "%m",
        }
    }
}

impl Period {
    pub const ALL: [Period; 7] = [
        Period::Week,
        Period::Month,
        Period::Year,
        Period::Daily,
        Period::Monthly,
        Period::Yearly,
        Period::Type,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::Daily => "daily",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
            Period::Type => "type",
        }
    }

    /// Inclusive `(from, to)` window ending at `today`.
    ///
    /// Weeks start on Monday (ISO). The `daily` series window is the current
    /// week clamped to January 1st so its day-of-year keys stay ascending.
    pub fn window(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let week_start =
            today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let year_start = today.with_ordinal(1).unwrap_or(today);
        let from = match self {
            Period::Week => week_start,
            Period::Month => today.with_day(1).unwrap_or(today),
            Period::Daily => week_start.max(year_start),
            Period::Year | Period::Monthly | Period::Yearly | Period::Type => year_start,
        };
        (from, today)
    }

    /// Bucket grouping for the time-series periods.
    pub fn grouping(self) -> Option<Grouping> {
        match self {
            Period::Daily => Some(Grouping::DayOfYear),
            Period::Monthly => Some(Grouping::Month),
            Period::Yearly => Some(Grouping::DayOfMonth),
            _ => None,
        }
    }

    /// True for the rolling total windows (`week`, `month`, `year`).
    pub fn is_total(self) -> bool {
        matches!(self, Period::Week | Period::Month | Period::Year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == token)
            .ok_or_else(|| EngineError::UnsupportedPeriod(s.to_string()))
    }
}
