use crate::api::AppState;
use crate::engine::to_audit_instant;
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeResponse {
    pub iso: String,
    pub timestamp_ms: i64,
}

/// Server time pass-through so clients can display trusted time. Fails
/// with 503 when the clock is unavailable; never falls back to local time.
pub async fn get_time(State(state): State<AppState>) -> Result<Json<TimeResponse>, AppError> {
    let now = state.clock.now().await?;
    Ok(Json(TimeResponse {
        iso: to_audit_instant(now),
        timestamp_ms: now.timestamp_millis(),
    }))
}
