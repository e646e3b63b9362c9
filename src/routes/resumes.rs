use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::resume_dto::{ReviewResumePayload, SubmitResumePayload},
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[axum::debug_handler]
pub async fn submit_resume(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitResumePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let resume = state
        .resume_service
        .submit(user_id, payload.resume_url, payload.bio, payload.skills)
        .await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

#[axum::debug_handler]
pub async fn my_resume(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let resume = state.resume_service.get_for_user(user_id).await?;
    match resume {
        Some(resume) => Ok(Json(resume).into_response()),
        None => Ok(Json(json!(null)).into_response()),
    }
}

/// Reviewer queue: resumes waiting for a volunteer.
#[axum::debug_handler]
pub async fn pending_resumes(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let resumes = state.resume_service.list_pending().await?;
    Ok(Json(resumes))
}

#[axum::debug_handler]
pub async fn review_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewResumePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let resume = state
        .resume_service
        .review(id, &payload.status, payload.feedback, payload.optimized_content)
        .await?;
    Ok(Json(resume))
}
