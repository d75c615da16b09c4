//! Hacker News adapter. Implements NewsSourcePort over the Firebase API.
//!
//! Two-step fetch: ranked id list, then one detail request per id. A failed
//! detail request drops only that item; the batch carries on.

use crate::adapters::sources::http::get_json;
use crate::domain::entities::non_blank;
use crate::domain::{DomainError, NewsItem, SourceBatch, SourceKind};
use crate::ports::NewsSourcePort;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Discussion page used when a story has no external link.
const DISCUSSION_URL: &str = "https://news.ycombinator.com/item?id=";

/// Per-item requests in flight at once. Output order still follows the id list.
const MAX_CONCURRENT_ITEMS: usize = 8;

const DEFAULT_AUTHOR: &str = "anonymous";

/// Item payload from `/item/{id}.json`. Every field may be missing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HnItem {
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    url: Option<String>,
    score: Option<u64>,
    by: Option<String>,
    /// Unix seconds.
    time: Option<i64>,
    descendants: Option<u64>,
}

pub struct HackerNewsAdapter {
    client: Client,
    base_url: String,
}

impl HackerNewsAdapter {
    /// `base_url` without trailing slash, e.g. [`DEFAULT_BASE_URL`].
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn top_story_ids(&self, limit: usize) -> Result<Vec<u64>, DomainError> {
        let url = format!("{}/topstories.json", self.base_url);
        let mut ids: Vec<u64> = get_json(self.client.get(&url)).await?;
        ids.truncate(limit);
        Ok(ids)
    }

    /// `Ok(None)` when the API answers `null` (unknown or purged id).
    async fn item(&self, id: u64) -> Result<Option<HnItem>, DomainError> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        get_json(self.client.get(&url)).await
    }

    async fn try_fetch(&self, limit: usize) -> Result<Vec<NewsItem>, DomainError> {
        let ids = self.top_story_ids(limit).await?;
        debug!(ids = ids.len(), "fetched top story ids");
        let fetched_at = Utc::now();
        Ok(collect_stories(ids, fetched_at, |id| self.item(id)).await)
    }
}

#[async_trait::async_trait]
impl NewsSourcePort for HackerNewsAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::HackerNews
    }

    async fn fetch(&self, limit: usize) -> SourceBatch {
        match self.try_fetch(limit).await {
            Ok(items) => {
                info!(source = %self.kind(), requested = limit, count = items.len(), "fetched stories");
                SourceBatch::ok(self.kind(), items)
            }
            Err(e) => {
                warn!(source = %self.kind(), error = %e, "source unavailable");
                SourceBatch::failed(self.kind(), e.to_string())
            }
        }
    }
}

/// Resolve `ids` through `fetch_item`, keeping id order, skipping items that
/// fail, are null, or are not titled stories.
pub(crate) async fn collect_stories<F, Fut>(
    ids: Vec<u64>,
    fetched_at: DateTime<Utc>,
    fetch_item: F,
) -> Vec<NewsItem>
where
    F: Fn(u64) -> Fut,
    Fut: Future<Output = Result<Option<HnItem>, DomainError>>,
{
    stream::iter(ids)
        .map(|id| {
            let fut = fetch_item(id);
            async move { (id, fut.await) }
        })
        .buffered(MAX_CONCURRENT_ITEMS)
        .filter_map(move |(id, result)| async move {
            match result {
                Ok(Some(item)) => story_to_news_item(id, item, fetched_at),
                Ok(None) => {
                    debug!(id, "item is null, skipping");
                    None
                }
                Err(e) => {
                    warn!(id, error = %e, "item fetch failed, skipping");
                    None
                }
            }
        })
        .collect()
        .await
}

/// Map one item payload. `None` unless it is a story with a non-blank title.
fn story_to_news_item(id: u64, item: HnItem, fetched_at: DateTime<Utc>) -> Option<NewsItem> {
    if item.kind.as_deref() != Some("story") {
        return None;
    }
    let title = non_blank(item.title)?;

    Some(NewsItem {
        id: format!("hn:{}", id),
        title,
        url: non_blank(item.url).unwrap_or_else(|| format!("{}{}", DISCUSSION_URL, id)),
        score: item.score.unwrap_or(0),
        author: non_blank(item.by).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        published_at: item
            .time
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .unwrap_or(fetched_at),
        comment_count: item.descendants.unwrap_or(0),
        source_name: SourceKind::HackerNews.label().to_string(),
        description: None,
        image_url: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::adapters::sources::http::build_client;
    use futures::future::ready;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot local HTTP server answering every request with `status` and `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}/v0", addr)
    }

    fn adapter(base_url: &str) -> HackerNewsAdapter {
        HackerNewsAdapter::new(build_client(Duration::from_secs(2)).unwrap(), base_url)
    }

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn story(title: Option<&str>) -> HnItem {
        HnItem {
            kind: Some("story".to_string()),
            title: title.map(String::from),
            url: Some("https://example.com/post".to_string()),
            score: Some(42),
            by: Some("pg".to_string()),
            time: Some(1_700_000_000),
            descendants: Some(7),
        }
    }

    fn ids(items: &[NewsItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_untitled_story_is_dropped() {
        let items = collect_stories(vec![1, 2, 3], fetched_at(), |id| {
            let item = if id == 2 {
                story(None)
            } else {
                story(Some("Show HN: a thing"))
            };
            ready(Ok(Some(item)))
        })
        .await;
        assert_eq!(ids(&items), vec!["hn:1", "hn:3"]);
    }

    #[tokio::test]
    async fn test_failed_item_does_not_abort_batch() {
        let items = collect_stories(vec![10, 11, 12, 13], fetched_at(), |id| {
            ready(match id {
                11 => Err(DomainError::Http("connection reset".to_string())),
                12 => Ok(None),
                _ => Ok(Some(story(Some("ok")))),
            })
        })
        .await;
        assert_eq!(ids(&items), vec!["hn:10", "hn:13"]);
    }

    #[tokio::test]
    async fn test_non_story_kinds_are_skipped() {
        let items = collect_stories(vec![1, 2, 3], fetched_at(), |id| {
            let mut item = story(Some("title"));
            item.kind = match id {
                1 => Some("job".to_string()),
                2 => None,
                _ => Some("story".to_string()),
            };
            ready(Ok(Some(item)))
        })
        .await;
        assert_eq!(ids(&items), vec!["hn:3"]);
    }

    #[tokio::test]
    async fn test_order_follows_ids_when_responses_arrive_out_of_order() {
        let items = collect_stories(vec![1, 2, 3, 4], fetched_at(), |id| async move {
            // Earlier ids answer last.
            tokio::time::sleep(Duration::from_millis(40 - id * 10)).await;
            Ok::<_, DomainError>(Some(story(Some("t"))))
        })
        .await;
        assert_eq!(ids(&items), vec!["hn:1", "hn:2", "hn:3", "hn:4"]);
    }

    #[test]
    fn test_mapping_and_defaults() {
        let full = story_to_news_item(8863, story(Some("My YC app")), fetched_at()).unwrap();
        assert_eq!(full.url, "https://example.com/post");
        assert_eq!(full.score, 42);
        assert_eq!(full.author, "pg");
        assert_eq!(full.comment_count, 7);
        assert_eq!(full.source_name, "Hacker News");
        assert_eq!(full.published_at.timestamp(), 1_700_000_000);

        let bare = HnItem {
            kind: Some("story".to_string()),
            title: Some("Ask HN: anything".to_string()),
            ..HnItem::default()
        };
        let item = story_to_news_item(121003, bare, fetched_at()).unwrap();
        assert_eq!(item.url, "https://news.ycombinator.com/item?id=121003");
        assert_eq!(item.score, 0);
        assert_eq!(item.author, "anonymous");
        assert_eq!(item.comment_count, 0);
        assert_eq!(item.published_at, fetched_at());
    }

    #[test]
    fn test_blank_title_is_dropped() {
        assert!(story_to_news_item(1, story(Some("   ")), fetched_at()).is_none());
    }

    #[test]
    fn test_item_payload_deserializes() {
        let json = r#"{"by":"dhouston","descendants":71,"id":8863,"kids":[8952],
            "score":111,"time":1175714200,"title":"My YC app: Dropbox","type":"story",
            "url":"http://www.getdropbox.com/u/2/screencast.html"}"#;
        let item: Option<HnItem> = serde_json::from_str(json).unwrap();
        let item = item.unwrap();
        assert_eq!(item.kind.as_deref(), Some("story"));
        assert_eq!(item.descendants, Some(71));

        let missing: Option<HnItem> = serde_json::from_str("null").unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_warning() {
        let batch = adapter("http://127.0.0.1:9/v0").fetch(10).await;
        assert!(batch.items.is_empty());
        assert_eq!(batch.warning.map(|w| w.kind), Some(SourceKind::HackerNews));
    }

    #[tokio::test]
    async fn test_non_array_id_list_degrades_to_warning() {
        let base_url = serve_once("200 OK", "{}").await;
        let batch = adapter(&base_url).fetch(10).await;
        assert!(batch.items.is_empty());
        let warning = batch.warning.unwrap();
        assert_eq!(warning.kind, SourceKind::HackerNews);
        assert!(warning.message.starts_with("Failed to parse response"));
    }

    #[tokio::test]
    async fn test_error_status_degrades_to_warning() {
        let base_url = serve_once("503 Service Unavailable", "down").await;
        let batch = adapter(&base_url).fetch(10).await;
        assert!(batch.items.is_empty());
        assert_eq!(
            batch.warning.unwrap().message,
            "API returned status 503: down"
        );
    }
}
