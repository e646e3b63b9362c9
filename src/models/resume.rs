use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_PENDING_REVIEW: &str = "pending_review";
pub const STATUS_REVIEWED: &str = "reviewed";
pub const STATUS_OPTIMIZED: &str = "optimized";

/// Resume files live in external object storage; only the URL is kept.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_url: String,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub status: String,
    pub feedback: Option<String>,
    pub optimized_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
