//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use tracing::info;

use crate::state::AppState;
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /hold/start - Start a seat hold or resume the running one
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let was_active = state.timer.is_active();
    let timer_state = state.start_hold();

    let message = if was_active {
        info!("Start endpoint called - resumed running hold");
        "Seat hold already running".to_string()
    } else {
        info!("Start endpoint called - new hold started");
        "Seat hold started".to_string()
    };

    Json(ApiResponse::active(message, timer_state))
}

/// Handle POST /hold/stop - Complete the seat hold
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer_state = state.stop_hold();
    info!("Stop endpoint called - hold completed");
    Json(ApiResponse::inactive("Seat hold completed".to_string(), timer_state))
}

/// Handle POST /hold/reset - Abandon the seat hold
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer_state = state.reset_hold();
    info!("Reset endpoint called - hold abandoned");
    Json(ApiResponse::inactive("Seat hold abandoned".to_string(), timer_state))
}

/// Handle GET /status - Return the current hold and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        hold: state.timer.snapshot().into(),
        expirations: state.expiration_count(),
        last_expired_at: state.get_last_expired_at(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
