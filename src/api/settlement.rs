use crate::api::AppState;
use crate::audit::record_decision;
use crate::domain::{AuditEntry, BookingId, SettlementStatus};
use crate::engine::to_audit_instant;
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub booking_id: Option<String>,
    pub check_in_date: String,
    pub check_out_date: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub status: SettlementStatus,
    pub server_time_iso: String,
    pub server_time_ms: i64,
    pub check_in_iso: String,
    pub check_out_iso: String,
    pub payable_after_iso: String,
}

/// Authoritative settlement re-verification.
///
/// Any client-computed status is advisory; back-end mutation logic must
/// re-check against this output before confirming or paying out. Runs on
/// server time only: a clock failure is a 503 and the decision is aborted.
/// Malformed dates are a 400; this is a financial path with strict
/// validation, unlike the fail-soft availability endpoint.
pub async fn verify_settlement(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let now = state.clock.now().await?;

    let decision = state.settlement.decide_strict(
        &req.check_in_date,
        &req.check_out_date,
        req.check_in_time.as_deref(),
        req.check_out_time.as_deref(),
        now,
    )?;

    let response = VerifyResponse {
        status: decision.status,
        server_time_iso: to_audit_instant(now),
        server_time_ms: now.timestamp_millis(),
        check_in_iso: to_audit_instant(decision.check_in),
        check_out_iso: to_audit_instant(decision.check_out),
        payable_after_iso: to_audit_instant(decision.payable_after),
    };

    // Determinations tied to a booking feed the dispute trail. A store
    // failure is logged and swallowed; it must not block the decision.
    if let Some(booking_id) = req.booking_id {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            booking_id: BookingId::new(booking_id),
            status: decision.status,
            server_time_iso: response.server_time_iso.clone(),
            server_time_ms: response.server_time_ms,
            check_in_iso: response.check_in_iso.clone(),
            check_out_iso: response.check_out_iso.clone(),
            payable_after_iso: response.payable_after_iso.clone(),
            recorded_at_ms: Utc::now().timestamp_millis(),
        };
        record_decision(state.audit.as_ref(), entry).await;
    }

    Ok(Json(response))
}
