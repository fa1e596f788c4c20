//! Seat-hold countdown module
//!
//! This module contains the shared timer service that checkout flows use to
//! time-box a seat reservation.

pub mod timer;

// Re-export main types
pub use timer::{ExpiryCallback, SeatHoldTimer, DEADLINE_KEY, DEFAULT_HOLD_DURATION};
