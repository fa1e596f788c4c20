//! Typed hold deadline
//!
//! The store only knows strings; everything past the storage boundary works
//! with a validated `Deadline`.

use std::{fmt, str::FromStr, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a stored deadline is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeadlineError {
    #[error("deadline is empty")]
    Empty,

    #[error("deadline {0:?} is not an integer millisecond timestamp")]
    NotNumeric(String),

    #[error("deadline {0} is not a positive timestamp")]
    NotPositive(i64),
}

/// Absolute expiry instant in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deadline(i64);

impl Deadline {
    pub fn from_millis(millis: i64) -> Result<Self, DeadlineError> {
        if millis <= 0 {
            return Err(DeadlineError::NotPositive(millis));
        }
        Ok(Self(millis))
    }

    /// Deadline `duration` after `now_millis`
    pub fn after(now_millis: i64, duration: Duration) -> Self {
        let span = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        Self(now_millis.saturating_add(span).max(1))
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Whole seconds left at `now_millis`, floored and clamped at zero
    pub fn remaining_seconds(&self, now_millis: i64) -> u64 {
        let diff = self.0.saturating_sub(now_millis);
        if diff <= 0 {
            0
        } else {
            (diff / 1000) as u64
        }
    }

    /// A deadline with no whole second left counts as expired
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.remaining_seconds(now_millis) == 0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl FromStr for Deadline {
    type Err = DeadlineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DeadlineError::Empty);
        }
        let millis = trimmed
            .parse::<i64>()
            .map_err(|_| DeadlineError::NotNumeric(trimmed.to_string()))?;
        Self::from_millis(millis)
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
