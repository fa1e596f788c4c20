//! Restarting the process must resume the stored hold

use std::{
    fs,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::time::{sleep, Instant};

use seat_hold::{
    hold::{DEADLINE_KEY, DEFAULT_HOLD_DURATION},
    tasks::hold_ticker_task,
    Clock, FileStore, KeyValueStore, ManualClock, SeatHoldTimer,
};

const T0: i64 = 1_700_000_000_000;

fn boot(path: &Path, clock: &ManualClock) -> SeatHoldTimer {
    SeatHoldTimer::new(
        Arc::new(FileStore::new(path)),
        Arc::new(clock.clone()),
        DEFAULT_HOLD_DURATION,
    )
}

#[test]
fn restart_resumes_the_same_window() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seat-hold.json");
    let clock = ManualClock::new(T0);

    let first = boot(&path, &clock);
    first.start(Some(Box::new(|| {})));
    let deadline = first.deadline();
    drop(first);

    clock.advance_millis(60_400);
    let second = boot(&path, &clock);
    assert!(second.is_active());
    assert_eq!(second.remaining_seconds(), 239);
    assert_eq!(second.deadline(), deadline);

    // Starting again keeps the window instead of opening a new one
    second.start(None);
    assert_eq!(second.deadline(), deadline);
}

#[test]
fn restart_after_expiry_clears_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seat-hold.json");
    let clock = ManualClock::new(T0);

    boot(&path, &clock).start(None);
    clock.advance_secs(301);

    let timer = boot(&path, &clock);
    assert!(!timer.is_active());
    assert_eq!(timer.remaining_seconds(), 0);
    assert_eq!(FileStore::new(&path).get(DEADLINE_KEY).unwrap(), None);
}

#[test]
fn corrupted_deadline_is_dropped_on_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seat-hold.json");
    fs::write(&path, r#"{"seat_hold_deadline": "tomorrow", "other": "kept"}"#).unwrap();

    let clock = ManualClock::new(T0);
    let timer = boot(&path, &clock);
    assert!(!timer.is_active());

    let store = FileStore::new(&path);
    assert_eq!(store.get(DEADLINE_KEY).unwrap(), None);
    assert_eq!(store.get("other").unwrap().as_deref(), Some("kept"));
}

/// Clock following tokio's (pausable) time
struct TokioClock {
    origin_millis: i64,
    origin: Instant,
}

impl Clock for TokioClock {
    fn now_millis(&self) -> i64 {
        self.origin_millis + self.origin.elapsed().as_millis() as i64
    }
}

#[tokio::test(start_paused = true)]
async fn unreadable_store_file_still_releases_the_seat() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seat-hold.json");
    fs::write(&path, "{{{").unwrap();

    let clock = TokioClock {
        origin_millis: T0,
        origin: Instant::now(),
    };
    let timer = Arc::new(SeatHoldTimer::new(
        Arc::new(FileStore::new(&path)),
        Arc::new(clock),
        Duration::from_secs(120),
    ));
    assert!(!timer.is_active());
    let task = tokio::spawn(hold_ticker_task(Arc::clone(&timer)));

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    timer.start(Some(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })));
    assert_eq!(timer.remaining_seconds(), 120);

    sleep(Duration::from_millis(1_500)).await;
    assert!(timer.is_active());
    assert_eq!(timer.remaining_seconds(), 119);

    sleep(Duration::from_secs(119)).await;
    assert!(!timer.is_active());
    assert_eq!(timer.remaining_seconds(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    sleep(Duration::from_secs(80)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    task.abort();
}
