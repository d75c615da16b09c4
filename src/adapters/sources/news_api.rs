//! NewsAPI adapter. Implements NewsSourcePort over `/v2/top-headlines`.
//!
//! Without an API key the adapter is disabled: it returns an empty batch and
//! never touches the network.

use crate::adapters::sources::http::{ERROR_BODY_LIMIT, truncate};
use crate::domain::entities::non_blank;
use crate::domain::{DomainError, NewsItem, SourceBatch, SourceKind};
use crate::ports::NewsSourcePort;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";

const CATEGORY: &str = "technology";
const LANGUAGE: &str = "en";

/// Title NewsAPI substitutes for withdrawn articles.
const REMOVED_TITLE: &str = "[Removed]";
const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    author: Option<String>,
    source: Option<ArticleSource>,
    published_at: Option<String>,
    url_to_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

pub struct NewsApiAdapter {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl NewsApiAdapter {
    /// A blank `api_key` counts as absent.
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: non_blank(api_key),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn try_fetch(&self, api_key: &str, page_size: usize) -> Result<Vec<NewsItem>, DomainError> {
        let page_size = page_size.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("category", CATEGORY),
                ("language", LANGUAGE),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await
            .map_err(|e| DomainError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Http(e.to_string()))?;

        let articles = parse_envelope(status, &body)?;
        Ok(articles_to_news_items(articles, Utc::now()))
    }
}

#[async_trait::async_trait]
impl NewsSourcePort for NewsApiAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::NewsApi
    }

    async fn fetch(&self, limit: usize) -> SourceBatch {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("NewsAPI key not set, skipping");
            return SourceBatch::ok(self.kind(), Vec::new());
        };

        match self.try_fetch(api_key, limit).await {
            Ok(items) => {
                info!(source = %self.kind(), requested = limit, count = items.len(), "fetched articles");
                SourceBatch::ok(self.kind(), items)
            }
            Err(e) => {
                warn!(source = %self.kind(), error = %e, "source unavailable");
                SourceBatch::failed(self.kind(), e.to_string())
            }
        }
    }
}

/// Decode the response envelope. Error envelopes (`status != "ok"`) usually
/// arrive with a 4xx code, so the body is inspected before the HTTP status.
fn parse_envelope(http_status: u16, body: &str) -> Result<Vec<Article>, DomainError> {
    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) if envelope.status == "ok" => Ok(envelope.articles),
        Ok(envelope) => Err(DomainError::Provider(format!(
            "{}: {}",
            envelope.code.unwrap_or_else(|| envelope.status.clone()),
            envelope.message.unwrap_or_default()
        ))),
        Err(_) if !(200..300).contains(&http_status) => Err(DomainError::Status {
            status: http_status,
            body: truncate(body, ERROR_BODY_LIMIT),
        }),
        Err(e) => Err(DomainError::Parse(e.to_string())),
    }
}

fn articles_to_news_items(articles: Vec<Article>, fetched_at: DateTime<Utc>) -> Vec<NewsItem> {
    let total = articles.len();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let items: Vec<NewsItem> = articles
        .into_iter()
        .filter_map(|a| article_to_news_item(a, fetched_at))
        .map(|mut item| {
            // Repeated urls in one response get `-1`, `-2`, ... so ids stay unique.
            let n = seen.entry(item.id.clone()).or_insert(0);
            if *n > 0 {
                item.id = format!("{}-{}", item.id, n);
            }
            *n += 1;
            item
        })
        .collect();
    if items.len() < total {
        debug!(dropped = total - items.len(), "dropped untitled or removed articles");
    }
    items
}

/// Map one article. `None` for empty or `[Removed]` titles.
fn article_to_news_item(article: Article, fetched_at: DateTime<Utc>) -> Option<NewsItem> {
    let title = non_blank(article.title).filter(|t| t.trim() != REMOVED_TITLE)?;
    let url = article.url.unwrap_or_default();
    let source_label = article.source.and_then(|s| non_blank(s.name));

    Some(NewsItem {
        id: article_id(&url, &title),
        author: non_blank(article.author)
            .or_else(|| source_label.clone())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        published_at: parse_published_at(article.published_at.as_deref()).unwrap_or(fetched_at),
        source_name: source_label.unwrap_or_else(|| SourceKind::NewsApi.label().to_string()),
        description: non_blank(article.description),
        image_url: non_blank(article.url_to_image),
        score: 0,
        comment_count: 0,
        title,
        url,
    })
}

/// Id derived from the url (title when the url is missing). Same input, same
/// id, across runs and toolchains.
fn article_id(url: &str, title: &str) -> String {
    let key = if url.is_empty() { title } else { url };
    format!("newsapi:{:016x}", fnv1a_64(key.as_bytes()))
}

/// 64-bit FNV-1a.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(PRIME)
    })
}

/// ISO-8601 timestamp. A trailing `Z` is rewritten to `+00:00`; offset-less
/// values are taken as UTC.
fn parse_published_at(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let normalized = match raw.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => raw.to_string(),
    };

    DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
        })
        .ok()
}
