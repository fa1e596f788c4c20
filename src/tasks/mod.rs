//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod hold_ticker;

// Re-export main functions
pub use hold_ticker::hold_ticker_task;
