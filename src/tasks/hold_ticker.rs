//! Seat-hold ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::hold::SeatHoldTimer;

/// Period of the countdown tick
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Background task that ticks the hold once per second while it is running
///
/// Sleeps on the timer's state channel while the hold is idle, so an idle
/// timer costs nothing.
pub async fn hold_ticker_task(timer: Arc<SeatHoldTimer>) {
    info!("Starting seat hold ticker task");

    let mut updates = timer.subscribe();

    loop {
        if !updates.borrow_and_update().active {
            // Wait for the next start (or a resumed hold)
            if updates.changed().await.is_err() {
                break;
            }
            continue;
        }

        debug!("Seat hold active, ticking every {:?}", TICK_INTERVAL);
        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    timer.tick();
                    if !timer.is_active() {
                        break;
                    }
                }

                changed = updates.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    if !updates.borrow_and_update().active {
                        debug!("Seat hold went idle, ticker parked");
                        break;
                    }
                }
            }
        }
    }

    info!("Seat hold ticker task stopped");
}
