// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Gap filling of grouped sums returned by the ledger.

use crate::error::{EngineError, EngineResult};
use crate::models::{Bucket, BucketedSeries};
use rust_decimal::Decimal;

/// Parses a numeric bucket key without trimming or coercion.
pub fn bucket_number(key: &str) -> EngineResult<u32> {
    key.parse::<u32>()
        .map_err(|source| EngineError::MalformedBucketKey {
            key: key.to_string(),
            source,
        })
}

/// Inserts a single zero bucket wherever an observed key skips past the
/// successor of the previous key.
///
/// Only the successor is filled, never the whole gap: `1, 2, 5` becomes
/// `1, 2, 3(0), 5`. The filler keeps the zero padding of the previous key.
pub fn fill_gaps(raw: Vec<Bucket>) -> EngineResult<BucketedSeries> {
    let mut out = Vec::with_capacity(raw.len() * 2);
    // None once the previous key has no successor
    let mut expected: Option<(u32, usize)> = None;

    for bucket in raw {
        let n = bucket_number(&bucket.key)?;
        if let Some((next, width)) = expected {
            if n > next {
                out.push(Bucket::new(format!("{:0width$}", next), Decimal::ZERO));
            }
        }
        expected = n.checked_add(1).map(|next| (next, bucket.key.len()));
        out.push(bucket);
    }
    Ok(out)
}
