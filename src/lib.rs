//! Seat Hold - a reload-resilient countdown for ticket checkout
//!
//! A seat picked during checkout is held for a fixed window (five minutes by
//! default). This library provides the shared hold timer, the storage that
//! lets a restarted process resume the same window, and a small HTTP surface
//! for the checkout flows that drive it.

pub mod api;
pub mod clock;
pub mod config;
pub mod hold;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use hold::{ExpiryCallback, SeatHoldTimer};
pub use state::{AppState, Deadline, TimerState};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use utils::{format_time, shutdown_signal};
