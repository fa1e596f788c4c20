//! Main application state management

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::TimerState;
use crate::hold::{ExpiryCallback, SeatHoldTimer};

/// Shared state behind the HTTP surface: the hold timer plus bookkeeping
#[derive(Debug)]
pub struct AppState {
    /// The single process-wide seat hold
    pub timer: Arc<SeatHoldTimer>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Expiry tracking, written by the expiry handler
    pub expirations: Arc<AtomicU64>,
    pub last_expired_at: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(timer: Arc<SeatHoldTimer>, port: u16, host: String) -> Self {
        Self {
            timer,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            expirations: Arc::new(AtomicU64::new(0)),
            last_expired_at: Arc::new(Mutex::new(None)),
        }
    }

    /// Start or resume the hold with this server's expiry handler attached
    pub fn start_hold(&self) -> TimerState {
        self.timer.start(Some(self.expiry_handler()));
        self.record_action("start");
        self.timer.snapshot()
    }

    /// Complete the hold
    pub fn stop_hold(&self) -> TimerState {
        self.timer.stop();
        self.record_action("stop");
        self.timer.snapshot()
    }

    /// Abandon the hold
    pub fn reset_hold(&self) -> TimerState {
        self.timer.reset();
        self.record_action("reset");
        self.timer.snapshot()
    }

    /// Re-register the expiry handler on a hold resumed from storage
    pub fn reattach_expiry_handler(&self) {
        if self.timer.is_active() {
            info!(
                "Re-attaching expiry handler to resumed seat hold ({}s left)",
                self.timer.remaining_seconds()
            );
            self.timer.update_callback(self.expiry_handler());
        }
    }

    /// Handler run when a hold runs out: count it and log the seat release
    pub fn expiry_handler(&self) -> ExpiryCallback {
        let expirations = Arc::clone(&self.expirations);
        let last_expired_at = Arc::clone(&self.last_expired_at);

        Box::new(move || {
            let total = expirations.fetch_add(1, Ordering::SeqCst) + 1;
            match last_expired_at.lock() {
                Ok(mut at) => *at = Some(Utc::now()),
                Err(e) => warn!("Failed to record expiry time: {}", e),
            }
            warn!("Seat hold expired, seat released (expiry #{})", total);
        })
    }

    pub fn expiration_count(&self) -> u64 {
        self.expirations.load(Ordering::SeqCst)
    }

    pub fn get_last_expired_at(&self) -> Option<DateTime<Utc>> {
        self.last_expired_at.lock().ok().and_then(|t| *t)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
