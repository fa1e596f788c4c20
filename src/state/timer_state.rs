//! Timer state structure and management

use serde::{Deserialize, Serialize};

use super::Deadline;

/// Observable snapshot of the seat-hold countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub active: bool,
    pub remaining_seconds: u64,
    pub deadline: Option<Deadline>,
}

impl TimerState {
    /// Create a running timer state
    pub fn running(deadline: Deadline, remaining_seconds: u64) -> Self {
        Self {
            active: true,
            remaining_seconds,
            deadline: Some(deadline),
        }
    }

    /// Create an idle timer state: no deadline, nothing left
    pub fn idle() -> Self {
        Self {
            active: false,
            remaining_seconds: 0,
            deadline: None,
        }
    }

    /// Running holds always have at least one whole second left
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::idle()
    }
}
