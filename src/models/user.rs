use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_JOB_SEEKER: &str = "job_seeker";
pub const ROLE_VOLUNTEER: &str = "volunteer";
pub const ROLE_EMPLOYER: &str = "employer";
pub const ROLE_ADMIN: &str = "admin";

pub const ALL_ROLES: &[&str] = &[ROLE_JOB_SEEKER, ROLE_VOLUNTEER, ROLE_EMPLOYER, ROLE_ADMIN];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Row in `password_resets`. The raw token is handed to the caller
/// once; only its hash is stored.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}
