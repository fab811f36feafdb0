use tokio::sync::RwLock;

#[derive(Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: i64,
}

/// Process-lifetime TTL cache holding the last successful snapshot.
///
/// Expiry never drops data: a read past the TTL simply reports the entry as
/// no longer fresh, and the owner decides whether to refresh or serve it
/// stale. A store replaces the slot atomically; there is no eviction.
pub struct TtlCache<T> {
    ttl_ms: i64,
    slot: RwLock<Option<CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            ttl_ms,
            slot: RwLock::new(None),
        }
    }

    /// The cached value if it is still within its TTL at `now`.
    pub async fn fresh(&self, now: i64) -> Option<(T, i64)> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| now - entry.fetched_at < self.ttl_ms)
            .map(|entry| (entry.value.clone(), entry.fetched_at))
    }

    /// The cached value regardless of age — the stale-serve fallback.
    pub async fn last_known(&self) -> Option<(T, i64)> {
        let slot = self.slot.read().await;
        slot.as_ref().map(|entry| (entry.value.clone(), entry.fetched_at))
    }

    pub async fn store(&self, value: T, now: i64) {
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry {
            value,
            fetched_at: now,
        });
    }
}
