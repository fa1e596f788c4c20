//! Seat Hold - a reload-resilient countdown for ticket checkout
//!
//! This is the main entry point for the seat-hold service.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use seat_hold::{
    api::create_router,
    clock::SystemClock,
    config::Config,
    hold::SeatHoldTimer,
    state::AppState,
    storage::FileStore,
    tasks::hold_ticker_task,
    utils::{format_time, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("seat_hold={},tower_http=info", config.log_level()))
        .init();

    info!("Starting seat-hold server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, hold={}min, store={}",
        config.host,
        config.port,
        config.hold_minutes,
        config.store.display()
    );

    // Restore any hold left over from a previous run
    let store = Arc::new(FileStore::new(config.store.clone()));
    let timer = Arc::new(SeatHoldTimer::new(
        store,
        Arc::new(SystemClock),
        config.hold_duration(),
    ));
    if timer.is_active() {
        info!("Resumed seat hold, {} left", format_time(timer.remaining_seconds()));
    }

    let state = Arc::new(AppState::new(Arc::clone(&timer), config.port, config.host.clone()));
    state.reattach_expiry_handler();

    // Start the hold ticker background task
    let ticker = tokio::spawn(hold_ticker_task(Arc::clone(&timer)));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /hold/start - Start or resume the seat hold");
    info!("  POST /hold/stop  - Complete the seat hold");
    info!("  POST /hold/reset - Abandon the seat hold");
    info!("  GET  /status     - Current hold and countdown");
    info!("  GET  /health     - Health check");

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The deadline stays in the store so the next run resumes it
    ticker.abort();
    info!("Server shutdown complete");
    Ok(())
}
