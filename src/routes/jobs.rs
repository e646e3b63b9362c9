use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{
        CreateCompanyPayload, CreateJobPayload, JobListQuery, JobListResponse, UpdateJobPayload,
    },
    error::{Error, Result},
    middleware::auth::Claims,
    models::job::Job,
    models::user::{ROLE_ADMIN, ROLE_EMPLOYER},
    AppState,
};

fn require_employer(claims: &Claims) -> Result<()> {
    let allowed = [ROLE_EMPLOYER, ROLE_ADMIN];
    if allowed.iter().any(|r| r.eq_ignore_ascii_case(&claims.role)) {
        Ok(())
    } else {
        Err(Error::Forbidden("forbidden".to_string()))
    }
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created successfully", body = Json<Job>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not an employer")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    require_employer(&claims)?;
    payload.validate()?;
    let job = state.job_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status, defaults to open"),
        ("company_id" = Option<Uuid>, Query, description = "Filter by company"),
        ("search" = Option<String>, Query, description = "Search in title and description")
    ),
    responses(
        (status = 200, description = "Page of jobs", body = Json<JobListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let result = state.job_service.list(query).await?;
    Ok(Json(JobListResponse::from(result)))
}

#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(job))
}

#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    require_employer(&claims)?;
    payload.validate()?;
    let job = state.job_service.update(id, payload).await?;
    Ok(Json(job))
}

#[axum::debug_handler]
pub async fn create_company(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse> {
    require_employer(&claims)?;
    payload.validate()?;
    let company = state
        .company_service
        .create(
            payload.name,
            payload.description,
            payload.website,
            payload.location,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(company)))
}

#[axum::debug_handler]
pub async fn list_companies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let companies = state.company_service.list().await?;
    Ok(Json(companies))
}

#[axum::debug_handler]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let company = state.company_service.get(id).await?;
    Ok(Json(company))
}
