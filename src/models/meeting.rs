use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// Exactly one of `job_seeker_id` / `employer_id` is set, depending on
/// who the volunteer is meeting. Enforced by a CHECK constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub job_seeker_id: Option<Uuid>,
    pub employer_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Meeting {
    pub fn counterpart_id(&self) -> Option<Uuid> {
        self.job_seeker_id.or(self.employer_id)
    }

    pub fn involves(&self, user_id: Uuid) -> bool {
        self.volunteer_id == user_id
            || self.job_seeker_id == Some(user_id)
            || self.employer_id == Some(user_id)
    }
}

/// A booked interval on a given day, for display when picking a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookedSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}
