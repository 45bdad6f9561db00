use crate::api::AppState;
use crate::domain::{AuditEntry, BookingId};
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub limit: Option<u32>,
    pub booking_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub entries: Vec<AuditEntryDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntryDto {
    pub id: String,
    pub booking_id: String,
    pub status: String,
    pub server_time_iso: String,
    pub server_time_ms: i64,
    pub check_in_iso: String,
    pub check_out_iso: String,
    pub payable_after_iso: String,
    pub recorded_at_ms: i64,
}

impl From<AuditEntry> for AuditEntryDto {
    fn from(e: AuditEntry) -> Self {
        AuditEntryDto {
            id: e.id.to_string(),
            booking_id: e.booking_id.to_string(),
            status: e.status.to_string(),
            server_time_iso: e.server_time_iso,
            server_time_ms: e.server_time_ms,
            check_in_iso: e.check_in_iso,
            check_out_iso: e.check_out_iso,
            payable_after_iso: e.payable_after_iso,
            recorded_at_ms: e.recorded_at_ms,
        }
    }
}

/// Recent audit entries, newest first; optionally scoped to one booking.
pub async fn get_audit(
    Query(params): Query<AuditQuery>,
    State(state): State<AppState>,
) -> Result<Json<AuditResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let entries = match params.booking_id {
        Some(id) => state
            .audit
            .for_booking(&BookingId::new(id), limit)
            .await
            .map_err(|e| AppError::Internal(format!("Audit query failed: {}", e)))?,
        None => state
            .audit
            .recent(limit)
            .await
            .map_err(|e| AppError::Internal(format!("Audit query failed: {}", e)))?,
    };

    Ok(Json(AuditResponse {
        entries: entries.into_iter().map(AuditEntryDto::from).collect(),
    }))
}
