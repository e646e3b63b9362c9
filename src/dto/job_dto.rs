use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job::Job;
use crate::services::job_service::JobList;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    pub company_id: Uuid,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl From<JobList> for JobListResponse {
    fn from(list: JobList) -> Self {
        Self {
            jobs: list.jobs,
            total: list.total,
            page: list.page,
            per_page: list.per_page,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplyPayload {
    pub job_id: Uuid,
    pub cover_note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplicationStatusPayload {
    #[validate(length(min = 1))]
    pub status: String,
}
