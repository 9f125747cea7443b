// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::num::ParseIntError;

use thiserror::Error;

/// Failures raised by the aggregation engine and the ledger store.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unsupported period '{0}' (use week|month|year|daily|monthly|yearly|type)")]
    UnsupportedPeriod(String),
    #[error("Unsupported recurrence '{0}' (use monthly|yearly|twice_a_year|quarterly)")]
    UnsupportedRecurrence(String),
    #[error("Invalid month number {0}")]
    InvalidMonth(u32),
    #[error("Malformed bucket key '{key}'")]
    MalformedBucketKey {
        key: String,
        #[source]
        source: ParseIntError,
    },
    #[error("Invalid decimal '{value}'")]
    InvalidAmount {
        value: String,
        #[source]
        source: rust_decimal::Error,
    },
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Amount overflow while {0}")]
    Overflow(&'static str),
    #[error("Obligation {id} changed since it was read")]
    StaleObligation { id: i64 },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
