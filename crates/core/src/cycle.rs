// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Six-hour model cycle timestamps.
//!
//! A [`Cycle`] identifies one GEFS model run by its start time: a UTC
//! timestamp aligned to a 6-hour boundary (hours 0, 6, 12, 18, with
//! minutes and seconds zero). The compact `YYYYMMDDHH` rendering is the
//! identifier published to downstream readers and the prefix carried by
//! every artifact file belonging to the cycle.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use std::fmt;
use thiserror::Error;

/// Hours between consecutive model cycles.
pub const CYCLE_INTERVAL_HOURS: i64 = 6;

/// Errors from cycle construction and parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CycleError {
    #[error("invalid timestamp: {year:04}-{month:02}-{day:02} {hour:02}:00")]
    InvalidTimestamp {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
    },
    #[error("hour {0} is not a cycle boundary (expected 0, 6, 12, or 18)")]
    OffCycleHour(u32),
    #[error("malformed cycle identifier: {0:?}")]
    Malformed(String),
}

/// The start timestamp of one 6-hour model cycle.
///
/// Immutable value type. Ordering follows time order, which matches the
/// lexicographic order of [`Cycle::to_compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cycle(DateTime<Utc>);

impl Cycle {
    /// Create a cycle from calendar components.
    ///
    /// The hour must be a 6-hour boundary; the date must exist.
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Result<Self, CycleError> {
        if hour >= 24 || hour % 6 != 0 {
            return Err(CycleError::OffCycleHour(hour));
        }
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
            .single()
            .map(Self)
            .ok_or(CycleError::InvalidTimestamp {
                year,
                month,
                day,
                hour,
            })
    }

    /// The latest cycle whose start is at or before `now`.
    pub fn containing(now: DateTime<Utc>) -> Result<Self, CycleError> {
        Self::new(now.year(), now.month(), now.day(), now.hour() - now.hour() % 6)
    }

    /// The cycle 6 hours after this one.
    pub fn next(self) -> Self {
        self.step(CYCLE_INTERVAL_HOURS)
    }

    /// The cycle 6 hours before this one.
    pub fn prev(self) -> Self {
        self.step(-CYCLE_INTERVAL_HOURS)
    }

    fn step(self, hours: i64) -> Self {
        // Saturates at chrono's representable bounds instead of panicking;
        // real cycle timestamps are nowhere near them.
        match self.0.checked_add_signed(Duration::hours(hours)) {
            Some(t) => Self(t),
            None => self,
        }
    }

    /// The compact `YYYYMMDDHH` identifier: zero-padded, no separators,
    /// lexicographically sortable in cycle order.
    pub fn to_compact(self) -> String {
        format!(
            "{:04}{:02}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day(),
            self.0.hour()
        )
    }

    /// Parse a compact `YYYYMMDDHH` identifier.
    pub fn parse(s: &str) -> Result<Self, CycleError> {
        if s.len() != 10 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CycleError::Malformed(s.to_string()));
        }
        let field = |range: std::ops::Range<usize>| -> Result<u32, CycleError> {
            s[range]
                .parse()
                .map_err(|_| CycleError::Malformed(s.to_string()))
        };
        let year: i32 = s[0..4]
            .parse()
            .map_err(|_| CycleError::Malformed(s.to_string()))?;
        Self::new(year, field(4..6)?, field(6..8)?, field(8..10)?)
    }

    /// The cycle start as a UTC timestamp.
    pub fn start(self) -> DateTime<Utc> {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_compact())
    }
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
