use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::resume::{Resume, STATUS_OPTIMIZED, STATUS_REVIEWED};

#[derive(Clone)]
pub struct ResumeService {
    pool: PgPool,
}

impl ResumeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One resume per user. Re-submitting replaces the stored URL and
    /// resets the review cycle.
    pub async fn submit(
        &self,
        user_id: Uuid,
        resume_url: String,
        bio: Option<String>,
        skills: Option<String>,
    ) -> Result<Resume> {
        let resume = sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes (user_id, resume_url, bio, skills, status)
            VALUES ($1, $2, $3, $4, 'pending_review')
            ON CONFLICT (user_id) DO UPDATE SET
                resume_url = EXCLUDED.resume_url,
                bio = EXCLUDED.bio,
                skills = EXCLUDED.skills,
                status = 'pending_review',
                feedback = NULL,
                optimized_content = NULL,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&resume_url)
        .bind(&bio)
        .bind(&skills)
        .fetch_one(&self.pool)
        .await?;
        Ok(resume)
    }

    pub async fn get_for_user(&self, user_id: Uuid) -> Result<Option<Resume>> {
        let resume = sqlx::query_as::<_, Resume>("SELECT * FROM resumes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(resume)
    }

    pub async fn list_pending(&self) -> Result<Vec<Resume>> {
        let resumes = sqlx::query_as::<_, Resume>(
            "SELECT * FROM resumes WHERE status = 'pending_review' ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(resumes)
    }

    pub async fn review(
        &self,
        resume_id: Uuid,
        status: &str,
        feedback: Option<String>,
        optimized_content: Option<String>,
    ) -> Result<Resume> {
        if status != STATUS_REVIEWED && status != STATUS_OPTIMIZED {
            return Err(Error::BadRequest(format!(
                "Unknown review status: {}",
                status
            )));
        }

        let resume = sqlx::query_as::<_, Resume>(
            r#"
            UPDATE resumes
            SET status = $1,
                feedback = COALESCE($2, feedback),
                optimized_content = COALESCE($3, optimized_content),
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(&feedback)
        .bind(&optimized_content)
        .bind(resume_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(resume)
    }
}
