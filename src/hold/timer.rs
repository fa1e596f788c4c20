//! The seat-hold countdown
//!
//! One `SeatHoldTimer` exists per process and is shared by `Arc`. The deadline
//! lives in a [`KeyValueStore`] so a restart resumes the same window; the
//! expiry callback lives only in memory.

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    clock::Clock,
    state::{Deadline, TimerState},
    storage::{KeyValueStore, StorageError},
};

/// Storage key holding the deadline as decimal epoch milliseconds
pub const DEADLINE_KEY: &str = "seat_hold_deadline";

/// Hold window used when nothing else is configured
pub const DEFAULT_HOLD_DURATION: Duration = Duration::from_secs(5 * 60);

/// Zero-argument handler run once when a hold runs out
///
/// Runs on the ticker task, or inside `start` when the window is shorter than
/// a second. A panic is caught and logged when panics unwind; in a build with
/// `panic = "abort"` it takes the whole process down.
pub type ExpiryCallback = Box<dyn FnOnce() + Send + 'static>;

struct Inner {
    state: TimerState,
    on_expire: Option<ExpiryCallback>,
}

pub struct SeatHoldTimer {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    hold_duration: Duration,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<TimerState>,
}

impl SeatHoldTimer {
    /// Build the timer and pick up any deadline left in `store`
    ///
    /// A future deadline resumes the countdown with no expiry callback; an
    /// expired or malformed one is removed and the timer starts idle. An
    /// unreadable store also starts idle.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        hold_duration: Duration,
    ) -> Self {
        let timer = Self {
            store,
            clock,
            hold_duration,
            inner: Mutex::new(Inner {
                state: TimerState::idle(),
                on_expire: None,
            }),
            state_tx: watch::channel(TimerState::idle()).0,
        };
        timer.restore();
        timer
    }

    fn restore(&self) {
        let now = self.clock.now_millis();
        let state = match self.read_deadline() {
            Ok(Some(deadline)) if !deadline.is_expired(now) => {
                let remaining = deadline.remaining_seconds(now);
                info!("Resuming seat hold with {}s remaining", remaining);
                TimerState::running(deadline, remaining)
            }
            Ok(Some(deadline)) => {
                info!("Stored seat hold expired at {}, clearing it", deadline);
                self.clear_deadline();
                TimerState::idle()
            }
            Ok(None) => TimerState::idle(),
            Err(e) => {
                warn!("Failed to read stored seat hold, starting idle: {}", e);
                TimerState::idle()
            }
        };

        self.lock().state = state;
        self.publish(state);
    }

    /// Start a hold, or resume the one already in progress
    ///
    /// The deadline is only written when no live deadline is stored, so
    /// repeated calls never extend a hold. `on_expired` always replaces the
    /// registered handler.
    pub fn start(&self, on_expired: Option<ExpiryCallback>) {
        let mut inner = self.lock();
        let now = self.clock.now_millis();

        let stored = match self.read_deadline() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to read seat hold deadline, using in-memory hold: {}", e);
                inner.state.deadline
            }
        };

        let deadline = match stored {
            Some(deadline) if !deadline.is_expired(now) => {
                debug!("Seat hold already running until {}, keeping deadline", deadline);
                deadline
            }
            stale => {
                if stale.is_some() {
                    self.clear_deadline();
                }
                let deadline = Deadline::after(now, self.hold_duration);
                self.write_deadline(deadline);
                info!(
                    "Started seat hold for {}s (deadline {})",
                    self.hold_duration.as_secs(),
                    deadline
                );
                deadline
            }
        };

        let remaining = deadline.remaining_seconds(now);
        if remaining == 0 {
            // Window shorter than a second: it is over before the first tick.
            inner.state = TimerState::idle();
            inner.on_expire = None;
            self.clear_deadline();
            drop(inner);

            info!("Seat hold window under one second, expired on start");
            self.publish(TimerState::idle());
            notify_expired(on_expired);
            return;
        }

        inner.state = TimerState::running(deadline, remaining);
        inner.on_expire = on_expired;
        let state = inner.state;
        drop(inner);

        self.publish(state);
    }

    /// End the hold after the caller completed it
    pub fn stop(&self) {
        self.clear("stop");
    }

    /// Abandon the hold. Same effect as [`stop`](Self::stop).
    pub fn reset(&self) {
        self.clear("reset");
    }

    fn clear(&self, action: &str) {
        let mut inner = self.lock();
        inner.state = TimerState::idle();
        inner.on_expire = None;
        self.clear_deadline();
        drop(inner);

        info!("Seat hold cleared by {}", action);
        self.publish(TimerState::idle());
    }

    /// Swap the expiry handler, leaving deadline and active state alone
    pub fn update_callback(&self, on_expired: ExpiryCallback) {
        self.lock().on_expire = Some(on_expired);
        debug!("Seat hold expiry callback replaced");
    }

    /// One countdown step, driven once per second by the ticker task
    pub(crate) fn tick(&self) {
        let mut inner = self.lock();
        if !inner.state.active {
            return;
        }

        let now = self.clock.now_millis();
        let deadline = match (self.read_deadline(), inner.state.deadline) {
            (Ok(Some(deadline)), _) => deadline,
            (Err(e), Some(deadline)) => {
                warn!("Failed to read seat hold deadline, counting down from memory: {}", e);
                deadline
            }
            (Ok(None), _) | (Err(_), None) => {
                // Deadline vanished from storage: go idle without notifying.
                warn!("Seat hold deadline missing from storage, deactivating");
                inner.state = TimerState::idle();
                inner.on_expire = None;
                drop(inner);
                self.publish(TimerState::idle());
                return;
            }
        };

        let remaining = deadline.remaining_seconds(now);
        if remaining > 0 {
            inner.state = TimerState::running(deadline, remaining);
            let state = inner.state;
            drop(inner);
            self.publish(state);
            return;
        }

        inner.state = TimerState::idle();
        let callback = inner.on_expire.take();
        self.clear_deadline();
        drop(inner);

        info!("Seat hold expired");
        self.publish(TimerState::idle());

        // Run outside the lock so the handler may start a new hold.
        notify_expired(callback);
    }

    pub fn snapshot(&self) -> TimerState {
        self.lock().state
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.snapshot().remaining_seconds
    }

    pub fn is_active(&self) -> bool {
        self.snapshot().is_active()
    }

    pub fn deadline(&self) -> Option<Deadline> {
        self.snapshot().deadline
    }

    pub fn hold_duration(&self) -> Duration {
        self.hold_duration
    }

    /// Receiver that sees every published state change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state_tx.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: TimerState) {
        self.state_tx.send_replace(state);
    }

    /// Read and validate the stored deadline
    ///
    /// A malformed value is removed and reported as absent; a failed read is
    /// passed up so callers can fall back to the in-memory deadline.
    fn read_deadline(&self) -> Result<Option<Deadline>, StorageError> {
        let Some(raw) = self.store.get(DEADLINE_KEY)? else {
            return Ok(None);
        };

        match raw.parse::<Deadline>() {
            Ok(deadline) => Ok(Some(deadline)),
            Err(e) => {
                warn!("Discarding malformed seat hold deadline: {}", e);
                self.clear_deadline();
                Ok(None)
            }
        }
    }

    fn write_deadline(&self, deadline: Deadline) {
        if let Err(e) = self.store.set(DEADLINE_KEY, &deadline.to_string()) {
            warn!("Failed to persist seat hold deadline: {}", e);
        }
    }

    fn clear_deadline(&self) {
        if let Err(e) = self.store.remove(DEADLINE_KEY) {
            warn!("Failed to remove seat hold deadline: {}", e);
        }
    }
}

fn notify_expired(callback: Option<ExpiryCallback>) {
    let Some(callback) = callback else {
        debug!("No expiry callback registered");
        return;
    };

    if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
        error!("Seat hold expiry callback panicked");
    }
}

impl fmt::Debug for SeatHoldTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("SeatHoldTimer")
            .field("hold_duration", &self.hold_duration)
            .field("state", &inner.state)
            .field("has_callback", &inner.on_expire.is_some())
            .finish()
    }
}
