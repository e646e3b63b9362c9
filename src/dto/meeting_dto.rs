use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleMeetingPayload {
    pub counterpart_id: Uuid,
    #[validate(length(min = 1))]
    pub counterpart_role: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookedSlotsQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MeetingStatusPayload {
    #[validate(length(min = 1))]
    pub status: String,
}
