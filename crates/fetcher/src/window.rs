//! Time window resolution.
//!
//! A run is bounded by a caller-supplied lookback, always expressed in hours
//! for both issues and pull requests. The resolver turns it into absolute
//! cutoffs against the current wall clock.

use chrono::{DateTime, Duration, Utc};

use herald_common::error::{AppError, Result};

/// Creation-time bounds for one monitor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Oldest eligible creation time. Also bounds pagination.
    pub since_cutoff: DateTime<Utc>,
    /// Optional tighter lower bound applied only to inclusion.
    pub hard_cutoff: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Resolve `now - lookback_hours`.
    ///
    /// A missing or non-positive lookback is a configuration error; there is
    /// no implicit default.
    pub fn resolve(lookback_hours: Option<i64>, now: DateTime<Utc>) -> Result<Self> {
        let hours = validate_hours("lookback", lookback_hours)?;

        Ok(Self {
            since_cutoff: cutoff(now, hours)?,
            hard_cutoff: None,
        })
    }

    /// Add a tighter inclusion bound of `now - hard_hours`.
    ///
    /// The hard window must not be wider than the lookback.
    pub fn with_hard_cutoff(self, hard_hours: i64, now: DateTime<Utc>) -> Result<Self> {
        let hours = validate_hours("hard window", Some(hard_hours))?;
        let hard_cutoff = cutoff(now, hours)?;

        if hard_cutoff < self.since_cutoff {
            return Err(AppError::Config(format!(
                "hard window of {hours}h is wider than the lookback window"
            )));
        }

        Ok(Self {
            hard_cutoff: Some(hard_cutoff),
            ..self
        })
    }

    /// Lower bound used to decide inclusion: the tighter of the two cutoffs.
    pub fn effective_cutoff(&self) -> DateTime<Utc> {
        self.hard_cutoff
            .map_or(self.since_cutoff, |hard| hard.max(self.since_cutoff))
    }

    /// Whether an item created at `created_at` belongs in this run.
    /// The boundary itself is inclusive.
    pub fn includes(&self, created_at: DateTime<Utc>) -> bool {
        created_at >= self.effective_cutoff()
    }

    /// Whether `created_at` lies before the pagination bound.
    pub fn is_before_since(&self, created_at: DateTime<Utc>) -> bool {
        created_at < self.since_cutoff
    }
}

fn cutoff(now: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>> {
    Duration::try_hours(hours)
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| AppError::Config(format!("{hours}h is out of range")))
}

fn validate_hours(what: &str, hours: Option<i64>) -> Result<i64> {
    match hours {
        Some(h) if h > 0 => Ok(h),
        Some(h) => Err(AppError::Config(format!(
            "{what} must be a positive number of hours, got {h}"
        ))),
        None => Err(AppError::Config(format!("{what} duration is not configured"))),
    }
}
