use crate::api::AppState;
use crate::domain::{
    to_calendar_date, BookedRange, BookingId, DateError, DateRange, RentalWindow,
};
use crate::engine::bookable_segments;
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub window: DateRangeDto,
    #[serde(default)]
    pub booked: Vec<BookedRangeDto>,
    pub minimum_stay_days: Option<i64>,
    /// When true, malformed dates are a 400 instead of the fail-soft
    /// empty result the booking UI consumes.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeDto {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRangeDto {
    pub reservation_id: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub today: String,
    pub segments: Vec<DateRangeDto>,
}

pub async fn compute_availability(
    State(state): State<AppState>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    // Today is always server-anchored; a clock outage surfaces rather than
    // trusting the caller's clock.
    let today = state.clock.today(state.config.reference_offset).await?;

    let minimum_stay = req
        .minimum_stay_days
        .unwrap_or(state.config.minimum_stay_days);
    if minimum_stay < 1 {
        return Err(AppError::BadRequest(
            "minimumStayDays must be a positive integer".into(),
        ));
    }

    let parsed = parse_inputs(&req, &state);
    let segments = match parsed {
        Ok((window, booked)) => bookable_segments(&window, &booked, today, minimum_stay),
        Err(e) if req.strict => return Err(e.into()),
        Err(e) => {
            // UI path fails soft: unparseable input means no availability,
            // not a crashed booking screen.
            debug!("Availability input rejected, returning empty: {}", e);
            Vec::new()
        }
    };

    Ok(Json(AvailabilityResponse {
        today: today.to_string(),
        segments: segments
            .iter()
            .map(|s| DateRangeDto {
                start: s.start.to_string(),
                end: s.end.to_string(),
            })
            .collect(),
    }))
}

fn parse_inputs(
    req: &AvailabilityRequest,
    state: &AppState,
) -> Result<(RentalWindow, Vec<BookedRange>), DateError> {
    let reference = state.config.reference_offset;

    let window = RentalWindow::new(
        to_calendar_date(&req.window.start, reference)?,
        to_calendar_date(&req.window.end, reference)?,
    );

    let booked = req
        .booked
        .iter()
        .map(|b| {
            Ok(BookedRange::new(
                BookingId::new(b.reservation_id.clone()),
                DateRange::new(
                    to_calendar_date(&b.start, reference)?,
                    to_calendar_date(&b.end, reference)?,
                ),
            ))
        })
        .collect::<Result<Vec<_>, DateError>>()?;

    Ok((window, booked))
}
