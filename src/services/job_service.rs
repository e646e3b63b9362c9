use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, STATUS_CLOSED, STATUS_OPEN};

/// Rows to skip for a 1-based page. Saturates so absurd page numbers
/// from the query string cannot overflow the bind value.
fn page_offset(page: i64, per_page: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(per_page)
}

pub struct JobList {
    pub jobs: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateJobPayload) -> Result<Job> {
        let company = sqlx::query_scalar::<_, Uuid>("SELECT id FROM companies WHERE id = $1")
            .bind(payload.company_id)
            .fetch_optional(&self.pool)
            .await?;
        if company.is_none() {
            return Err(Error::BadRequest("Unknown company".to_string()));
        }

        if let (Some(from), Some(to)) = (payload.salary_from, payload.salary_to) {
            if from > to {
                return Err(Error::BadRequest(
                    "salary_from must not exceed salary_to".to_string(),
                ));
            }
        }

        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs
                (company_id, title, description, location, employment_type, salary_from, salary_to, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'open')
            RETURNING *
            "#,
        )
        .bind(payload.company_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(&payload.employment_type)
        .bind(payload.salary_from)
        .bind(payload.salary_to)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    pub async fn list(&self, query: JobListQuery) -> Result<JobList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = page_offset(page, per_page);
        let status = query.status.unwrap_or_else(|| STATUS_OPEN.to_string());

        let mut builder = QueryBuilder::new("SELECT * FROM jobs WHERE status = ");
        builder.push_bind(status.clone());
        if let Some(company_id) = query.company_id {
            builder.push(" AND company_id = ").push_bind(company_id);
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind(offset);

        let jobs: Vec<Job> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM jobs WHERE status = ");
        count_builder.push_bind(status);
        if let Some(company_id) = query.company_id {
            count_builder
                .push(" AND company_id = ")
                .push_bind(company_id);
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            count_builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(JobList {
            jobs,
            total,
            page,
            per_page,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateJobPayload) -> Result<Job> {
        let current = self.get(id).await?;

        if let Some(status) = &payload.status {
            if status != STATUS_OPEN && status != STATUS_CLOSED {
                return Err(Error::BadRequest(format!("Unknown job status: {}", status)));
            }
        }

        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                location = COALESCE($3, location),
                employment_type = COALESCE($4, employment_type),
                salary_from = COALESCE($5, salary_from),
                salary_to = COALESCE($6, salary_to),
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(&payload.employment_type)
        .bind(payload.salary_from)
        .bind(payload.salary_to)
        .bind(&payload.status)
        .bind(current.id)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::page_offset;

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
    }

    #[test]
    fn page_offset_saturates_on_huge_pages() {
        assert_eq!(page_offset(i64::MAX, 100), i64::MAX);
        assert_eq!(page_offset(i64::MAX, i64::MAX), i64::MAX);
    }
}
