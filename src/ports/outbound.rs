//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, NewsItem, SourceBatch, SourceKind};

/// One external news provider.
#[async_trait::async_trait]
pub trait NewsSourcePort: Send + Sync {
    /// Which provider this adapter talks to.
    fn kind(&self) -> SourceKind;

    /// Fetch up to `limit` items.
    ///
    /// Never fails: network, status and parse errors come back as an empty
    /// batch carrying a `SourceWarning`.
    async fn fetch(&self, limit: usize) -> SourceBatch;
}

/// AI collaborator that explains why a headline matters.
#[async_trait::async_trait]
pub trait SummarizerPort: Send + Sync {
    /// Short plain-text explanation of the item behind `title` / `url`.
    async fn summarize(&self, title: &str, url: &str) -> Result<String, DomainError>;
}

/// Cache key: one entry per source and request size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: SourceKind,
    pub limit: usize,
}

impl CacheKey {
    pub fn new(source: SourceKind, limit: usize) -> Self {
        Self { source, limit }
    }
}

/// Time-boxed cache of source results, owned by the calling layer.
#[async_trait::async_trait]
pub trait FeedCachePort: Send + Sync {
    /// Cached items for `key`, if present and not expired.
    async fn get(&self, key: &CacheKey) -> Option<Vec<NewsItem>>;

    /// Store items for `key`, stamped with the current time.
    async fn put(&self, key: CacheKey, items: Vec<NewsItem>);

    /// Drop every entry (manual refresh).
    async fn invalidate_all(&self);
}
