//! Feed use case: one fetch-render cycle.
//!
//! - Calls enabled sources in registration order, sequentially
//! - Serves repeat requests from the cache until it expires or `refresh` runs
//! - Failed batches are reported as warnings and never cached
//! - Hands the merged batches to the assembler

use crate::domain::{FeedOutcome, SourceWarning, assemble};
use crate::ports::{CacheKey, FeedCachePort, NewsSourcePort};
use crate::shared::FeedConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// What the presentation layer needs for one cycle.
#[derive(Debug, Clone)]
pub struct Feed {
    pub outcome: FeedOutcome,
    /// One entry per source that failed this cycle.
    pub warnings: Vec<SourceWarning>,
    pub loaded_at: DateTime<Utc>,
}

/// Feed service. Owns the source adapters and the result cache.
pub struct FeedService {
    sources: Vec<Arc<dyn NewsSourcePort>>,
    cache: Arc<dyn FeedCachePort>,
}

impl FeedService {
    /// `sources` are merged in the order given.
    pub fn new(sources: Vec<Arc<dyn NewsSourcePort>>, cache: Arc<dyn FeedCachePort>) -> Self {
        Self { sources, cache }
    }

    /// Fetch (or reuse) every enabled source and assemble the feed.
    pub async fn load(&self, cfg: &FeedConfig) -> Feed {
        let mut batches = Vec::with_capacity(self.sources.len());
        let mut warnings = Vec::new();

        for source in &self.sources {
            let kind = source.kind();
            if !cfg.is_enabled(kind) {
                debug!(source = %kind, "source disabled");
                continue;
            }

            let key = CacheKey::new(kind, cfg.limit_for(kind));
            if let Some(items) = self.cache.get(&key).await {
                batches.push(items);
                continue;
            }

            let batch = source.fetch(key.limit).await;
            match batch.warning {
                Some(warning) => warnings.push(warning),
                None => self.cache.put(key, batch.items.clone()).await,
            }
            batches.push(batch.items);
        }

        let outcome = assemble(batches, &cfg.criteria());
        info!(
            stories = outcome.stories().len(),
            warnings = warnings.len(),
            min_score = cfg.min_score,
            "feed assembled"
        );

        Feed {
            outcome,
            warnings,
            loaded_at: Utc::now(),
        }
    }

    /// Manual refresh: the next `load` goes back to the network.
    pub async fn refresh(&self) {
        self.cache.invalidate_all().await;
        info!("feed cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::MemoryCache;
    use crate::domain::{NewsItem, SourceBatch, SourceKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Canned source that counts calls and records the requested limit.
    struct StubSource {
        kind: SourceKind,
        scores: Vec<u64>,
        fail: bool,
        calls: AtomicUsize,
        last_limit: AtomicUsize,
    }

    impl StubSource {
        fn build(kind: SourceKind, scores: Vec<u64>, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                kind,
                scores,
                fail,
                calls: AtomicUsize::new(0),
                last_limit: AtomicUsize::new(0),
            })
        }

        fn new(kind: SourceKind, scores: Vec<u64>) -> Arc<Self> {
            Self::build(kind, scores, false)
        }

        fn failing(kind: SourceKind) -> Arc<Self> {
            Self::build(kind, Vec::new(), true)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl NewsSourcePort for StubSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn fetch(&self, limit: usize) -> SourceBatch {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_limit.store(limit, Ordering::SeqCst);
            if self.fail {
                return SourceBatch::failed(self.kind, "connection refused");
            }
            let items = self
                .scores
                .iter()
                .enumerate()
                .map(|(i, score)| NewsItem {
                    id: format!("{:?}:{}", self.kind, i),
                    title: format!("{} story {}", self.kind, i),
                    url: format!("https://example.com/{:?}/{}", self.kind, i),
                    score: *score,
                    author: "someone".to_string(),
                    published_at: Utc::now(),
                    comment_count: 0,
                    source_name: self.kind.label().to_string(),
                    description: None,
                    image_url: None,
                })
                .collect();
            SourceBatch::ok(self.kind, items)
        }
    }

    fn feed_service(sources: &[&Arc<StubSource>]) -> FeedService {
        let sources = sources
            .iter()
            .map(|s| Arc::clone(*s) as Arc<dyn NewsSourcePort>)
            .collect();
        FeedService::new(sources, Arc::new(MemoryCache::new(Duration::from_secs(300))))
    }

    fn both_enabled() -> FeedConfig {
        FeedConfig {
            news_api_enabled: true,
            ..FeedConfig::default()
        }
    }

    #[tokio::test]
    async fn test_merges_sources_and_ranks() {
        let hn = StubSource::new(SourceKind::HackerNews, vec![50, 200, 50]);
        let api = StubSource::new(SourceKind::NewsApi, vec![0, 0]);
        let service = feed_service(&[&hn, &api]);

        let feed = service.load(&both_enabled()).await;
        let ids: Vec<&str> = feed.outcome.stories().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["HackerNews:1", "HackerNews:0", "HackerNews:2", "NewsApi:0", "NewsApi:1"]
        );
        assert!(feed.warnings.is_empty());
        assert_eq!(hn.last_limit.load(Ordering::SeqCst), 25);
        assert_eq!(api.last_limit.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn test_zero_enabled_sources_is_no_results() {
        let hn = StubSource::new(SourceKind::HackerNews, vec![10]);
        let service = feed_service(&[&hn]);
        let cfg = FeedConfig {
            hacker_news_enabled: false,
            ..FeedConfig::default()
        };

        let feed = service.load(&cfg).await;
        assert_eq!(feed.outcome, FeedOutcome::NoResults);
        assert!(feed.warnings.is_empty());
        assert_eq!(hn.calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_reuse_and_refresh() {
        let hn = StubSource::new(SourceKind::HackerNews, vec![1, 2]);
        let service = feed_service(&[&hn]);
        let cfg = FeedConfig::default();

        service.load(&cfg).await;
        service.load(&cfg).await;
        assert_eq!(hn.calls(), 1);

        // A different limit is a different cache key.
        service.load(&cfg.with_num_stories(30)).await;
        assert_eq!(hn.calls(), 2);

        service.refresh().await;
        service.load(&cfg).await;
        assert_eq!(hn.calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_source_warns_and_is_not_cached() {
        let hn = StubSource::new(SourceKind::HackerNews, vec![30]);
        let api = StubSource::failing(SourceKind::NewsApi);
        let service = feed_service(&[&hn, &api]);

        let feed = service.load(&both_enabled()).await;
        assert_eq!(feed.outcome.stories().len(), 1);
        assert_eq!(feed.warnings.len(), 1);
        assert_eq!(feed.warnings[0].kind, SourceKind::NewsApi);

        service.load(&both_enabled()).await;
        assert_eq!(hn.calls(), 1);
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_all_sources_failing_is_no_results_with_warnings() {
        let hn = StubSource::failing(SourceKind::HackerNews);
        let service = feed_service(&[&hn]);

        let feed = service.load(&FeedConfig::default()).await;
        assert!(feed.outcome.is_empty());
        assert_eq!(feed.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_score_floor_applies_across_sources() {
        let hn = StubSource::new(SourceKind::HackerNews, vec![5, 15, 500]);
        let api = StubSource::new(SourceKind::NewsApi, vec![0]);
        let service = feed_service(&[&hn, &api]);

        let feed = service.load(&both_enabled().with_min_score(10)).await;
        let scores: Vec<u64> = feed.outcome.stories().iter().map(|i| i.score).collect();
        assert_eq!(scores, vec![500, 15]);
    }
}
