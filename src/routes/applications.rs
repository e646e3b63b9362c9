use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{ApplicationStatusPayload, ApplyPayload},
    error::{Error, Result},
    middleware::auth::Claims,
    models::user::{ROLE_ADMIN, ROLE_EMPLOYER, ROLE_JOB_SEEKER},
    AppState,
};

#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if !claims.role.eq_ignore_ascii_case(ROLE_JOB_SEEKER) {
        return Err(Error::Forbidden("Only job seekers apply".to_string()));
    }
    let job_seeker_id = claims.user_id()?;
    let application = state
        .application_service
        .apply(payload.job_id, job_seeker_id, payload.cover_note)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[axum::debug_handler]
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let job_seeker_id = claims.user_id()?;
    let applications = state
        .application_service
        .list_for_seeker(job_seeker_id)
        .await?;
    Ok(Json(applications))
}

#[axum::debug_handler]
pub async fn list_for_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let allowed = [ROLE_EMPLOYER, ROLE_ADMIN];
    if !allowed.iter().any(|r| r.eq_ignore_ascii_case(&claims.role)) {
        return Err(Error::Forbidden("forbidden".to_string()));
    }
    let applications = state.application_service.list_for_job(job_id).await?;
    Ok(Json(applications))
}

/// Moving an application fires the applicant's `application_status`
/// notification, which in turn reaches their badge via change events.
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let allowed = [ROLE_EMPLOYER, ROLE_ADMIN];
    if !allowed.iter().any(|r| r.eq_ignore_ascii_case(&claims.role)) {
        return Err(Error::Forbidden("forbidden".to_string()));
    }

    let application = state
        .application_service
        .update_status(id, &payload.status)
        .await?;

    let job = state.job_service.get(application.job_id).await?;
    state
        .notification_service
        .notify_application_status(application.job_seeker_id, &job.title, &application.status)
        .await;

    Ok(Json(application))
}
