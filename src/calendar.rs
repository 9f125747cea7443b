// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{EngineError, EngineResult};

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn month_length(year: i32, month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

/// Number of calendar days in `month` (1..=12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> EngineResult<u32> {
    month_length(year, month).ok_or(EngineError::InvalidMonth(month))
}

/// Sum of the twelve month lengths of `year`.
pub fn days_in_year(year: i32) -> u32 {
    (1..=12).filter_map(|m| month_length(year, m)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years_follow_gregorian_rule() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn february_length() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2100, 2).unwrap(), 28);
    }

    #[test]
    fn year_length() {
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2023), 365);
        assert_eq!(days_in_year(2000), 366);
    }

    #[test]
    fn month_out_of_range() {
        assert!(matches!(
            days_in_month(2024, 13),
            Err(EngineError::InvalidMonth(13))
        ));
        assert!(days_in_month(2024, 0).is_err());
    }
}
