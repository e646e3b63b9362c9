use std::time::Duration;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::cache::{CacheKey, QueryCache};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// One row change on the notifications table, scoped to the affected
/// user. Delivery is best-effort: subscribers that fall behind see a
/// lag error and must resync.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent {
    pub user_id: Uuid,
    pub op: ChangeOp,
}

/// Broadcast hub for notification change events. Writers publish after
/// every insert/update/delete; the badge listener reacts by dropping
/// the affected user's cached unread count.
#[derive(Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ChangeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: ChangeEvent) {
        // A send error only means nobody is listening right now.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

/// Background task keeping unread-notification cache entries honest.
///
/// Events arrive asynchronously and no ordering is enforced; each one
/// just marks the affected count stale so the next read refetches.
/// When the receiver reports lag (missed events) or closure, every
/// unread count is dropped and the task resubscribes after a backoff,
/// so a missed-event window never leaves a stale count behind.
pub async fn run_badge_listener(hub: ChangeHub, cache: QueryCache) {
    let mut backoff = Duration::from_millis(250);
    loop {
        let mut rx = hub.subscribe();
        // Events published while resubscribing were missed.
        cache.invalidate_unread_counts();
        loop {
            match rx.recv().await {
                Ok(event) => {
                    backoff = Duration::from_millis(250);
                    cache.invalidate(CacheKey::unread_notifications(event.user_id));
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "badge listener lagged, resyncing unread counts");
                    cache.invalidate_unread_counts();
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("change hub closed, resubscribing");
                    break;
                }
            }
        }
        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(Duration::from_secs(30));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let hub = ChangeHub::new(8);
        let mut rx = hub.subscribe();
        hub.publish(ChangeEvent {
            user_id: uuid(9),
            op: ChangeOp::Insert,
        });
        let event = rx.recv().await.unwrap();
        assert_eq!(event.user_id, uuid(9));
        assert_eq!(event.op, ChangeOp::Insert);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let hub = ChangeHub::new(8);
        hub.publish(ChangeEvent {
            user_id: uuid(1),
            op: ChangeOp::Delete,
        });
    }

    #[tokio::test]
    async fn lagged_receiver_reports_missed_events() {
        let hub = ChangeHub::new(1);
        let mut rx = hub.subscribe();
        for n in 0..3 {
            hub.publish(ChangeEvent {
                user_id: uuid(n),
                op: ChangeOp::Update,
            });
        }
        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(missed)) => assert!(missed >= 1),
            other => panic!("expected lag, got {:?}", other),
        }
    }
}
