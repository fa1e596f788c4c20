//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{state::TimerState, utils::format_time};

/// Timer view shared by every hold response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldView {
    pub active: bool,
    pub remaining_seconds: u64,
    /// `M:SS` rendering of `remaining_seconds`
    pub remaining_display: String,
    pub deadline: Option<DateTime<Utc>>,
}

impl From<TimerState> for HoldView {
    fn from(state: TimerState) -> Self {
        Self {
            active: state.active,
            remaining_seconds: state.remaining_seconds,
            remaining_display: format_time(state.remaining_seconds),
            deadline: state.deadline.and_then(|d| d.to_datetime()),
        }
    }
}

/// API response structure for hold change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub hold: HoldView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, state: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            hold: state.into(),
        }
    }

    /// Response for a hold that is counting down
    pub fn active(message: String, state: TimerState) -> Self {
        Self::new("active".to_string(), message, state)
    }

    /// Response for a hold that has been cleared
    pub fn inactive(message: String, state: TimerState) -> Self {
        Self::new("inactive".to_string(), message, state)
    }
}

/// Status response with timer and expiry information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub hold: HoldView,
    pub expirations: u64,
    pub last_expired_at: Option<DateTime<Utc>>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
