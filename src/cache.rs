use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;

/// Identity of a cached query. Pair keys are unordered: the thread
/// between A and B is the same thread between B and A, so constructors
/// normalize the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Thread(Uuid, Uuid),
    Meetings(Uuid, Uuid),
    UnreadNotifications(Uuid),
}

impl CacheKey {
    pub fn thread(a: Uuid, b: Uuid) -> Self {
        let (lo, hi) = normalize(a, b);
        CacheKey::Thread(lo, hi)
    }

    pub fn meetings(a: Uuid, b: Uuid) -> Self {
        let (lo, hi) = normalize(a, b);
        CacheKey::Meetings(lo, hi)
    }

    pub fn unread_notifications(user_id: Uuid) -> Self {
        CacheKey::UnreadNotifications(user_id)
    }
}

fn normalize(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug)]
struct CacheEntry {
    value: serde_json::Value,
    stale: bool,
}

/// In-memory query cache, owned by `AppState` and passed to components
/// by reference. Entries are stored as JSON values so one map serves
/// every query shape; `invalidate` marks an entry stale rather than
/// removing it, and the next `get_or_fetch` refetches.
///
/// Each component invalidates only the keys it owns after its own
/// mutations. Unread-notification keys are additionally dropped by the
/// change-event listener (see `events`).
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_fetch<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        {
            let entries = self.entries.lock().expect("cache mutex poisoned");
            if let Some(entry) = entries.get(&key) {
                if !entry.stale {
                    if let Ok(value) = serde_json::from_value(entry.value.clone()) {
                        return Ok(value);
                    }
                }
            }
        }

        // Lock is not held across the fetch; concurrent misses may
        // fetch twice and the later write wins.
        let fresh = fetcher().await?;
        let encoded = serde_json::to_value(&fresh)?;
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key,
            CacheEntry {
                value: encoded,
                stale: false,
            },
        );
        Ok(fresh)
    }

    pub fn invalidate(&self, key: CacheKey) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        if let Some(entry) = entries.get_mut(&key) {
            entry.stale = true;
        }
    }

    /// Resync step for the change-event listener: after missed events
    /// there is no telling whose count is off, so drop them all.
    pub fn invalidate_unread_counts(&self) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        for (key, entry) in entries.iter_mut() {
            if matches!(key, CacheKey::UnreadNotifications(_)) {
                entry.stale = true;
            }
        }
    }

    #[cfg(test)]
    fn is_stale(&self, key: CacheKey) -> Option<bool> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        entries.get(&key).map(|e| e.stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn pair_keys_are_unordered() {
        let (a, b) = (uuid(1), uuid(2));
        assert_eq!(CacheKey::thread(a, b), CacheKey::thread(b, a));
        assert_eq!(CacheKey::meetings(a, b), CacheKey::meetings(b, a));
        assert_ne!(CacheKey::thread(a, b), CacheKey::meetings(a, b));
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = QueryCache::new();
        let key = CacheKey::unread_notifications(uuid(7));
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let got: i64 = cache
                .get_or_fetch(key, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .await
                .unwrap();
            assert_eq!(got, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache = QueryCache::new();
        let key = CacheKey::thread(uuid(1), uuid(2));
        let calls = AtomicU32::new(0);

        let fetch = || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![format!("msg-{}", n)])
        };
        let first: Vec<String> = cache.get_or_fetch(key, fetch).await.unwrap();
        assert_eq!(first, vec!["msg-0"]);

        cache.invalidate(key);
        assert_eq!(cache.is_stale(key), Some(true));

        let second: Vec<String> = cache.get_or_fetch(key, fetch).await.unwrap();
        assert_eq!(second, vec!["msg-1"]);
        assert_eq!(cache.is_stale(key), Some(false));
    }

    #[tokio::test]
    async fn invalidating_one_key_leaves_others_fresh() {
        let cache = QueryCache::new();
        let thread = CacheKey::thread(uuid(1), uuid(2));
        let badge = CacheKey::unread_notifications(uuid(2));

        let _: i64 = cache.get_or_fetch(thread, || async { Ok(1) }).await.unwrap();
        let _: i64 = cache.get_or_fetch(badge, || async { Ok(5) }).await.unwrap();

        // Sending a message only touches the thread key; the badge key
        // is refreshed through the change-event channel instead.
        cache.invalidate(thread);
        assert_eq!(cache.is_stale(thread), Some(true));
        assert_eq!(cache.is_stale(badge), Some(false));
    }

    #[tokio::test]
    async fn resync_drops_every_unread_count() {
        let cache = QueryCache::new();
        let badge_a = CacheKey::unread_notifications(uuid(1));
        let badge_b = CacheKey::unread_notifications(uuid(2));
        let thread = CacheKey::thread(uuid(1), uuid(2));

        let _: i64 = cache.get_or_fetch(badge_a, || async { Ok(1) }).await.unwrap();
        let _: i64 = cache.get_or_fetch(badge_b, || async { Ok(2) }).await.unwrap();
        let _: i64 = cache.get_or_fetch(thread, || async { Ok(3) }).await.unwrap();

        cache.invalidate_unread_counts();
        assert_eq!(cache.is_stale(badge_a), Some(true));
        assert_eq!(cache.is_stale(badge_b), Some(true));
        assert_eq!(cache.is_stale(thread), Some(false));
    }
}
