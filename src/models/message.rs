use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub sender_id: Uuid,
    pub sender_role: String,
    pub receiver_id: Uuid,
    pub receiver_role: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// True when the message belongs to the thread between `a` and `b`,
    /// whichever direction it travelled.
    pub fn in_thread(&self, a: Uuid, b: Uuid) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }

    /// True when a read acknowledgement by `self_id` for the thread
    /// with `counterpart_id` must flip this message: unread, addressed
    /// to `self_id`, sent by that counterpart.
    pub fn awaiting_ack(&self, self_id: Uuid, counterpart_id: Uuid) -> bool {
        !self.is_read && self.receiver_id == self_id && self.sender_id == counterpart_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessage {
    pub content: String,
    pub sender_id: Uuid,
    pub sender_role: String,
    pub receiver_id: Uuid,
    pub receiver_role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sender: Uuid, receiver: Uuid, is_read: bool) -> Message {
        Message {
            id: Uuid::new_v4(),
            content: "hello".to_string(),
            sender_id: sender,
            sender_role: "job_seeker".to_string(),
            receiver_id: receiver,
            receiver_role: "volunteer".to_string(),
            is_read,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn thread_membership_ignores_direction() {
        let (a, b, outsider) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert!(message(a, b, false).in_thread(a, b));
        assert!(message(b, a, false).in_thread(a, b));
        assert!(!message(a, outsider, false).in_thread(a, b));
        assert!(!message(outsider, b, false).in_thread(a, b));
    }

    #[test]
    fn ack_scope_is_inbound_unread_from_that_counterpart_only() {
        let (me, them, other) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert!(message(them, me, false).awaiting_ack(me, them));
        // Already read: nothing to flip.
        assert!(!message(them, me, true).awaiting_ack(me, them));
        // My own outbound messages stay as the counterpart left them.
        assert!(!message(me, them, false).awaiting_ack(me, them));
        // A different counterpart's thread is out of scope.
        assert!(!message(other, me, false).awaiting_ack(me, them));
    }
}
