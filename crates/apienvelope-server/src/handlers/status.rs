use crate::{ApiResponse, AppState};
use apienvelope_core::fragment;
use axum::extract::State;

/// Seconds clients are told to wait after a server error
pub const RETRY_AFTER_SECS: u64 = 30;

/// GET /api/v1/ping
pub async fn ping(State(state): State<AppState>) -> ApiResponse {
    state.responses.ok(Some("pong"), None, [])
}

/// GET /api/v1/admin
pub async fn admin(State(state): State<AppState>) -> ApiResponse {
    state.responses.forbidden(None, None, [])
}

/// GET /api/v1/crash
pub async fn crash(State(state): State<AppState>) -> ApiResponse {
    state
        .responses
        .error(None, None, [fragment([("retry_after", RETRY_AFTER_SECS)])])
}
