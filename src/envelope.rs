//! The stored cache record and its freshness rules
//!
//! Every value lives in the store as
//! `{"data": ..., "created_at": <ms>, "updated_at": <ms>}`.

use crate::error::{CacheError, CacheResult};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on any freshness window: 24 hours in milliseconds.
pub const ONE_DAY_MS: i64 = 86_400_000;

const MINUTE_MS: f64 = 60_000.0;

/// A caller value wrapped with creation and update timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    /// The caller's value, opaque to the cache
    pub data: T,

    /// Epoch milliseconds of the first write to this key
    pub created_at: i64,

    /// Epoch milliseconds of the most recent write
    pub updated_at: i64,
}

impl<T> CacheEnvelope<T> {
    /// Create an envelope. `created_at` is clamped so it never exceeds
    /// `updated_at`.
    pub fn new(data: T, created_at: i64, updated_at: i64) -> Self {
        Self {
            data,
            created_at: created_at.min(updated_at),
            updated_at,
        }
    }

    /// Milliseconds since the last write, as seen at `now`
    pub fn age_ms(&self, now: i64) -> i64 {
        now.saturating_sub(self.updated_at)
    }

    /// Whether the entry is within `max_age_ms` of its last write
    pub fn is_fresh(&self, now: i64, max_age_ms: i64) -> bool {
        self.age_ms(now) <= max_age_ms
    }

    /// Creation time as a UTC timestamp
    pub fn created(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at).single()
    }

    /// Last update time as a UTC timestamp
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.updated_at).single()
    }

    /// Discard the bookkeeping and keep the value
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Convert a TTL in minutes to milliseconds.
///
/// Zero, negative, NaN and infinite inputs are rejected.
pub fn minutes_to_millis(minutes: f64) -> CacheResult<i64> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(CacheError::InvalidTtl(minutes));
    }

    // `as` saturates at i64::MAX for huge inputs
    Ok((minutes * MINUTE_MS) as i64)
}

/// The freshness window actually applied for a requested TTL: the request
/// in milliseconds, capped at [`ONE_DAY_MS`].
pub fn effective_max_age(minutes: f64) -> CacheResult<i64> {
    Ok(minutes_to_millis(minutes)?.min(ONE_DAY_MS))
}
