//! Implements FeedCachePort in memory.
//!
//! Entries expire `ttl` after they were stored; `invalidate_all` empties the map.

use crate::domain::NewsItem;
use crate::ports::{CacheKey, FeedCachePort};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedBatch {
    items: Vec<NewsItem>,
    stored_at: Instant,
}

/// In-memory TTL cache: (source, limit) -> items + store time.
pub struct MemoryCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CachedBatch>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn get_at(&self, key: &CacheKey, now: Instant) -> Option<Vec<NewsItem>> {
        let entries = self.entries.read().await;
        let cached = entries.get(key)?;
        let age = now.saturating_duration_since(cached.stored_at);
        if age < self.ttl {
            debug!(source = %key.source, limit = key.limit, age_secs = age.as_secs(), "cache hit");
            Some(cached.items.clone())
        } else {
            debug!(source = %key.source, limit = key.limit, "cache entry expired");
            None
        }
    }

    async fn put_at(&self, key: CacheKey, items: Vec<NewsItem>, stored_at: Instant) {
        let mut entries = self.entries.write().await;
        // Stale entries are only ever replaced, so drop them while holding the lock.
        let ttl = self.ttl;
        entries.retain(|_, c| stored_at.saturating_duration_since(c.stored_at) < ttl);
        entries.insert(key, CachedBatch { items, stored_at });
    }
}

#[async_trait::async_trait]
impl FeedCachePort for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Option<Vec<NewsItem>> {
        self.get_at(key, Instant::now()).await
    }

    async fn put(&self, key: CacheKey, items: Vec<NewsItem>) {
        self.put_at(key, items, Instant::now()).await
    }

    async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "cache invalidated");
    }
}
