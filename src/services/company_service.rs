use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::company::Company;

#[derive(Clone)]
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
        website: Option<String>,
        location: Option<String>,
    ) -> Result<Company> {
        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM companies WHERE name = $1")
            .bind(&name)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(Error::Conflict(
                "A company with this name already exists".to_string(),
            ));
        }

        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, description, website, location)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(&website)
        .bind(&location)
        .fetch_one(&self.pool)
        .await?;
        Ok(company)
    }

    pub async fn list(&self) -> Result<Vec<Company>> {
        let companies =
            sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(companies)
    }

    pub async fn get(&self, id: Uuid) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(company)
    }
}
