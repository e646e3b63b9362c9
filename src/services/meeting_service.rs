use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::meeting::{BookedSlot, Meeting, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_SCHEDULED};
use crate::models::user::{ROLE_EMPLOYER, ROLE_JOB_SEEKER};
use crate::utils::time;

pub struct ScheduleMeeting {
    pub volunteer_id: Uuid,
    pub counterpart_id: Uuid,
    pub counterpart_role: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct MeetingService {
    pool: PgPool,
}

impl MeetingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Meetings involving the pair, earliest first.
    pub async fn list_between(&self, self_id: Uuid, counterpart_id: Uuid) -> Result<Vec<Meeting>> {
        let meetings = sqlx::query_as::<_, Meeting>(
            r#"
            SELECT * FROM meetings
            WHERE (volunteer_id = $1 AND (job_seeker_id = $2 OR employer_id = $2))
               OR (volunteer_id = $2 AND (job_seeker_id = $1 OR employer_id = $1))
            ORDER BY date ASC, start_time ASC
            "#,
        )
        .bind(self_id)
        .bind(counterpart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(meetings)
    }

    pub async fn get(&self, id: Uuid) -> Result<Meeting> {
        let meeting = sqlx::query_as::<_, Meeting>("SELECT * FROM meetings WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(meeting)
    }

    /// Pure filter: the slots already taken on `date`, time-of-day
    /// ignored when matching the date. Used for slot-picker display.
    pub fn booked_slots(meetings: &[Meeting], date: NaiveDate) -> Vec<BookedSlot> {
        meetings
            .iter()
            .filter(|m| m.date == date)
            .map(|m| BookedSlot {
                start: m.start_time,
                end: m.end_time,
            })
            .collect()
    }

    /// Inserts a `scheduled` meeting. Overlapping meetings for the same
    /// volunteer are rejected: checked here, and backed by an exclusion
    /// constraint for the race the check cannot see.
    pub async fn schedule(&self, req: ScheduleMeeting) -> Result<Meeting> {
        if req.duration_minutes <= 0 {
            return Err(Error::BadRequest(
                "Meeting duration must be positive".to_string(),
            ));
        }
        if req.volunteer_id == req.counterpart_id {
            return Err(Error::BadRequest(
                "Cannot schedule a meeting with yourself".to_string(),
            ));
        }

        let (start, end) = time::slot_bounds(req.date, req.start_time, req.duration_minutes);
        if start.date() != end.date() {
            return Err(Error::BadRequest(
                "Meeting may not cross midnight".to_string(),
            ));
        }
        let start_time = start.time();
        let end_time = end.time();

        let (job_seeker_id, employer_id) = match req.counterpart_role.as_str() {
            ROLE_JOB_SEEKER => (Some(req.counterpart_id), None),
            ROLE_EMPLOYER => (None, Some(req.counterpart_id)),
            other => {
                return Err(Error::BadRequest(format!(
                    "Cannot schedule a meeting with role: {}",
                    other
                )))
            }
        };

        let clash: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM meetings
            WHERE volunteer_id = $1 AND date = $2 AND status = 'scheduled'
              AND start_time < $4 AND $3 < end_time
            LIMIT 1
            "#,
        )
        .bind(req.volunteer_id)
        .bind(req.date)
        .bind(start_time)
        .bind(end_time)
        .fetch_optional(&self.pool)
        .await?;
        if clash.is_some() {
            return Err(Error::Conflict(
                "The requested time slot is already booked".to_string(),
            ));
        }

        let meeting = sqlx::query_as::<_, Meeting>(
            r#"
            INSERT INTO meetings
                (volunteer_id, job_seeker_id, employer_id, date, start_time, end_time, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, 'scheduled', $7)
            RETURNING *
            "#,
        )
        .bind(req.volunteer_id)
        .bind(job_seeker_id)
        .bind(employer_id)
        .bind(req.date)
        .bind(start_time)
        .bind(end_time)
        .bind(&req.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(meeting)
    }

    /// Status machine: `scheduled` may become `completed` or
    /// `cancelled`; nothing else moves. Either participant may act.
    pub async fn update_status(
        &self,
        id: Uuid,
        actor_id: Uuid,
        new_status: &str,
    ) -> Result<Meeting> {
        if new_status != STATUS_COMPLETED && new_status != STATUS_CANCELLED {
            return Err(Error::BadRequest(format!(
                "Unknown meeting status: {}",
                new_status
            )));
        }

        let meeting = self.get(id).await?;
        if !meeting.involves(actor_id) {
            return Err(Error::Forbidden(
                "Not a participant of this meeting".to_string(),
            ));
        }
        if meeting.status != STATUS_SCHEDULED {
            return Err(Error::BadRequest(format!(
                "Cannot move a {} meeting to {}",
                meeting.status, new_status
            )));
        }

        let updated = sqlx::query_as::<_, Meeting>(
            r#"
            UPDATE meetings SET status = $1
            WHERE id = $2 AND status = 'scheduled'
            RETURNING *
            "#,
        )
        .bind(new_status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Conflict("Meeting was already finalized".to_string()))?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn meeting(date: &str, start: &str, end: &str) -> Meeting {
        Meeting {
            id: Uuid::new_v4(),
            volunteer_id: Uuid::from_u128(1),
            job_seeker_id: Some(Uuid::from_u128(2)),
            employer_id: None,
            date: date.parse().unwrap(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            status: STATUS_SCHEDULED.to_string(),
            notes: None,
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn booked_slots_filters_by_date_only() {
        let meetings = vec![
            meeting("2024-06-01", "09:00:00", "10:00:00"),
            meeting("2024-06-01", "14:30:00", "15:00:00"),
            meeting("2024-06-02", "09:00:00", "10:00:00"),
        ];
        let slots = MeetingService::booked_slots(&meetings, "2024-06-01".parse().unwrap());
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, "09:00:00".parse().unwrap());
        assert_eq!(slots[1].end, "15:00:00".parse().unwrap());
    }

    #[test]
    fn booked_slots_of_nothing_is_empty() {
        let slots = MeetingService::booked_slots(&[], "2024-06-01".parse().unwrap());
        assert!(slots.is_empty());
    }

    #[test]
    fn meeting_involvement_covers_both_sides() {
        let m = meeting("2024-06-01", "09:00:00", "10:00:00");
        assert!(m.involves(Uuid::from_u128(1)));
        assert!(m.involves(Uuid::from_u128(2)));
        assert!(!m.involves(Uuid::from_u128(3)));
        assert_eq!(m.counterpart_id(), Some(Uuid::from_u128(2)));
    }
}
