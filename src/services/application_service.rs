use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::{Application, ALL_STATUSES};
use crate::models::job::STATUS_OPEN;

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One application per seeker per job, enforced by a unique index;
    /// the pre-check gives the friendlier error in the common case.
    pub async fn apply(
        &self,
        job_id: Uuid,
        job_seeker_id: Uuid,
        cover_note: Option<String>,
    ) -> Result<Application> {
        let job_status =
            sqlx::query_scalar::<_, String>("SELECT status FROM jobs WHERE id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        if job_status != STATUS_OPEN {
            return Err(Error::BadRequest("This job is no longer open".to_string()));
        }

        let exists = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM applications WHERE job_id = $1 AND job_seeker_id = $2",
        )
        .bind(job_id)
        .bind(job_seeker_id)
        .fetch_optional(&self.pool)
        .await?;
        if exists.is_some() {
            return Err(Error::Conflict(
                "You have already applied to this job".to_string(),
            ));
        }

        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (job_id, job_seeker_id, status, cover_note)
            VALUES ($1, $2, 'submitted', $3)
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(job_seeker_id)
        .bind(&cover_note)
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }

    pub async fn list_for_seeker(&self, job_seeker_id: Uuid) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE job_seeker_id = $1 ORDER BY created_at DESC",
        )
        .bind(job_seeker_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE job_id = $1 ORDER BY created_at ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<Application> {
        let application =
            sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(application)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Application> {
        if !ALL_STATUSES.contains(&status) {
            return Err(Error::BadRequest(format!(
                "Unknown application status: {}",
                status
            )));
        }

        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }
}
