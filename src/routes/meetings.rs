use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    cache::CacheKey,
    dto::meeting_dto::{BookedSlotsQuery, MeetingStatusPayload, ScheduleMeetingPayload},
    error::{Error, Result},
    middleware::auth::Claims,
    models::user::ROLE_VOLUNTEER,
    services::meeting_service::{MeetingService, ScheduleMeeting},
    AppState,
};

#[axum::debug_handler]
pub async fn list_meetings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(counterpart_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let self_id = claims.user_id()?;
    let meetings = state
        .cache
        .get_or_fetch(CacheKey::meetings(self_id, counterpart_id), || async {
            state
                .meeting_service
                .list_between(self_id, counterpart_id)
                .await
        })
        .await?;
    Ok(Json(meetings))
}

/// Slots already taken with the counterpart on one day, for the
/// slot-picker. Advisory display; the authoritative overlap check runs
/// at scheduling time.
#[axum::debug_handler]
pub async fn booked_slots(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(counterpart_id): Path<Uuid>,
    Query(query): Query<BookedSlotsQuery>,
) -> Result<impl IntoResponse> {
    let self_id = claims.user_id()?;
    let meetings = state
        .meeting_service
        .list_between(self_id, counterpart_id)
        .await?;
    let slots = MeetingService::booked_slots(&meetings, query.date);
    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn schedule_meeting(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ScheduleMeetingPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if !claims.role.eq_ignore_ascii_case(ROLE_VOLUNTEER) {
        return Err(Error::Forbidden(
            "Only volunteers schedule meetings".to_string(),
        ));
    }
    let volunteer_id = claims.user_id()?;

    let meeting = state
        .meeting_service
        .schedule(ScheduleMeeting {
            volunteer_id,
            counterpart_id: payload.counterpart_id,
            counterpart_role: payload.counterpart_role,
            date: payload.date,
            start_time: payload.start_time,
            duration_minutes: payload.duration_minutes,
            notes: payload.notes,
        })
        .await?;

    state
        .cache
        .invalidate(CacheKey::meetings(volunteer_id, payload.counterpart_id));
    Ok((StatusCode::CREATED, Json(meeting)))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(meeting_id): Path<Uuid>,
    Json(payload): Json<MeetingStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let actor_id = claims.user_id()?;
    let meeting = state
        .meeting_service
        .update_status(meeting_id, actor_id, &payload.status)
        .await?;

    if let Some(counterpart_id) = meeting.counterpart_id() {
        state
            .cache
            .invalidate(CacheKey::meetings(meeting.volunteer_id, counterpart_id));
    }
    Ok(Json(meeting))
}
