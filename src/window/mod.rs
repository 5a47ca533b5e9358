// src/window/mod.rs

//! Lookback window computation.
//!
//! - [`duration`] parses ISO-8601 duration expressions.
//! - [`clock`] abstracts "now" so a run (and its tests) see one instant.

pub mod clock;
pub mod duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

pub use clock::{Clock, FixedClock, SystemClock};
pub use duration::IsoDuration;

use crate::errors::Result;

/// The trailing time window a run looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LookbackWindow {
    /// Instant captured once at the start of the run.
    pub now: DateTime<Utc>,
    /// `now - span`; repositories pushed at or after this are "changed".
    pub since: DateTime<Utc>,
}

impl LookbackWindow {
    /// Capture `now` from `clock` and subtract the parsed `expr`.
    pub fn from_expr(clock: &dyn Clock, expr: &str) -> Result<Self> {
        let span = IsoDuration::parse(expr)?.to_time_delta();
        Ok(Self::ending_at(clock.now(), span))
    }

    pub fn ending_at(now: DateTime<Utc>, span: TimeDelta) -> Self {
        Self {
            now,
            since: lookback_since(now, span),
        }
    }
}

/// `now - span`, saturating at the earliest representable instant.
pub fn lookback_since(now: DateTime<Utc>, span: TimeDelta) -> DateTime<Utc> {
    now.checked_sub_signed(span)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
