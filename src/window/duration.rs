// src/window/duration.rs

//! ISO-8601 duration parsing (`PT24H`, `P1W`, `P1DT12H30M`, ...).
//!
//! Only the designator form is supported:
//!
//! ```text
//! P[nY][nM][nW][nD][T[nH][nM][nS]]
//! ```
//!
//! Calendar units are converted to fixed spans: a year is 365 days, a month
//! is 30 days, a week is 7 days. Components are non-negative integers, so a
//! parsed duration can never produce a negative span.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Regex;

use crate::errors::{RepolaunchError, Result};

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:(?P<years>\d+)Y)?(?:(?P<months>\d+)M)?(?:(?P<weeks>\d+)W)?(?:(?P<days>\d+)D)?(?:(?P<time>T)(?:(?P<hours>\d+)H)?(?:(?P<minutes>\d+)M)?(?:(?P<seconds>\d+)S)?)?$",
    )
    .expect("ISO-8601 duration pattern is valid")
});

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const SECS_PER_WEEK: u64 = 7 * SECS_PER_DAY;
const SECS_PER_MONTH: u64 = 30 * SECS_PER_DAY;
const SECS_PER_YEAR: u64 = 365 * SECS_PER_DAY;

/// A parsed ISO-8601 duration expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsoDuration {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl IsoDuration {
    /// Parse a duration expression, failing with [`RepolaunchError::Parse`]
    /// that names the offending input.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let caps = ISO_DURATION
            .captures(trimmed)
            .ok_or_else(|| RepolaunchError::parse(input, "expected P[nY][nM][nW][nD][T[nH][nM][nS]]"))?;

        let field = |name: &str| -> Result<Option<u64>> {
            match caps.name(name) {
                Some(m) => m
                    .as_str()
                    .parse::<u64>()
                    .map(Some)
                    .map_err(|e| RepolaunchError::parse(input, format!("{name}: {e}"))),
                None => Ok(None),
            }
        };

        let date = [field("years")?, field("months")?, field("weeks")?, field("days")?];
        let time = [field("hours")?, field("minutes")?, field("seconds")?];

        let has_time_designator = caps.name("time").is_some();
        if has_time_designator && time.iter().all(Option::is_none) {
            return Err(RepolaunchError::parse(input, "'T' must be followed by at least one time component"));
        }
        if date.iter().chain(time.iter()).all(Option::is_none) {
            return Err(RepolaunchError::parse(input, "duration has no components"));
        }

        let parsed = IsoDuration {
            years: date[0].unwrap_or(0),
            months: date[1].unwrap_or(0),
            weeks: date[2].unwrap_or(0),
            days: date[3].unwrap_or(0),
            hours: time[0].unwrap_or(0),
            minutes: time[1].unwrap_or(0),
            seconds: time[2].unwrap_or(0),
        };

        // Reject values that would overflow once converted.
        parsed
            .total_seconds()
            .ok_or_else(|| RepolaunchError::parse(input, "duration is too large"))?;

        Ok(parsed)
    }

    fn total_seconds(&self) -> Option<i64> {
        let parts = [
            (self.years, SECS_PER_YEAR),
            (self.months, SECS_PER_MONTH),
            (self.weeks, SECS_PER_WEEK),
            (self.days, SECS_PER_DAY),
            (self.hours, SECS_PER_HOUR),
            (self.minutes, SECS_PER_MINUTE),
            (self.seconds, 1),
        ];

        let mut total: u64 = 0;
        for (value, unit) in parts {
            total = total.checked_add(value.checked_mul(unit)?)?;
        }

        let total = i64::try_from(total).ok()?;
        // Keep within what chrono can represent.
        TimeDelta::try_seconds(total).map(|_| total)
    }

    /// The span as a `chrono` delta (always non-negative).
    pub fn to_time_delta(&self) -> TimeDelta {
        self.total_seconds()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// The span as a `std::time::Duration` (for Tokio timers).
    pub fn to_std(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.total_seconds().unwrap_or(i64::MAX) as u64)
    }
}

impl FromStr for IsoDuration {
    type Err = RepolaunchError;

    fn from_str(s: &str) -> Result<Self> {
        IsoDuration::parse(s)
    }
}
