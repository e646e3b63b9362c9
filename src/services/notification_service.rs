use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::events::{ChangeEvent, ChangeHub, ChangeOp};
use crate::models::notification::{
    CreateNotification, Notification, TYPE_APPLICATION_STATUS, TYPE_MESSAGE,
};

/// Owns notification rows and announces every mutation on the change
/// hub. The badge listener turns those events into cache invalidations;
/// this service never touches the cache itself.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    hub: ChangeHub,
}

impl NotificationService {
    pub fn new(pool: PgPool, hub: ChangeHub) -> Self {
        Self { pool, hub }
    }

    pub async fn create(&self, notif: CreateNotification) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, type, title, message, is_read)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING *
            "#,
        )
        .bind(notif.user_id)
        .bind(&notif.kind)
        .bind(&notif.title)
        .bind(&notif.message)
        .fetch_one(&self.pool)
        .await?;

        self.hub.publish(ChangeEvent {
            user_id: notif.user_id,
            op: ChangeOp::Insert,
        });
        Ok(row)
    }

    /// Trigger fired when a message is sent: the receiver gets a badge
    /// notification. Failure here is logged, not propagated; the
    /// message itself already landed.
    pub async fn notify_message(&self, receiver_id: Uuid, sender: &str) {
        let result = self
            .create(CreateNotification {
                user_id: receiver_id,
                kind: TYPE_MESSAGE.to_string(),
                title: "New message".to_string(),
                message: format!("{} sent you a message", sender),
            })
            .await;
        if let Err(e) = result {
            tracing::error!(error = ?e, "failed to create message notification");
        }
    }

    /// Trigger fired when an employer moves an application.
    pub async fn notify_application_status(
        &self,
        applicant_id: Uuid,
        job_title: &str,
        status: &str,
    ) {
        let result = self
            .create(CreateNotification {
                user_id: applicant_id,
                kind: TYPE_APPLICATION_STATUS.to_string(),
                title: "Application update".to_string(),
                message: format!("Your application for {} is now {}", job_title, status),
            })
            .await;
        if let Err(e) = result {
            tracing::error!(error = ?e, "failed to create application notification");
        }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE user_id = $1 AND NOT is_read
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE user_id = $1 AND NOT is_read
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            self.hub.publish(ChangeEvent {
                user_id,
                op: ChangeOp::Update,
            });
        }
        Ok(result.rows_affected())
    }
}
