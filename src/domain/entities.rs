//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP or provider types here. Adapters map their payloads into these.

use chrono::{DateTime, Utc};
use std::fmt;

/// External provider a batch of items came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    HackerNews,
    NewsApi,
}

impl SourceKind {
    /// Fixed provider label. Also the `source_name` fallback for items.
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::HackerNews => "Hacker News",
            SourceKind::NewsApi => "NewsAPI",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single normalized news record.
///
/// Built once per fetch cycle by a source adapter; all defaults are applied at
/// construction so downstream code never looks fields up ad hoc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    /// Unique within one fetch batch (e.g. `hn:42`).
    pub id: String,
    /// Never empty.
    pub title: String,
    pub url: String,
    pub score: u64,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub comment_count: u64,
    pub source_name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Non-fatal failure of one source. Shown to the user next to the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWarning {
    pub kind: SourceKind,
    pub message: String,
}

impl fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error fetching {}: {}", self.kind, self.message)
    }
}

/// Output of one adapter call. A failed fetch is an empty batch with a warning.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub kind: SourceKind,
    pub items: Vec<NewsItem>,
    pub warning: Option<SourceWarning>,
}

impl SourceBatch {
    pub fn ok(kind: SourceKind, items: Vec<NewsItem>) -> Self {
        Self {
            kind,
            items,
            warning: None,
        }
    }

    pub fn failed(kind: SourceKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            items: Vec::new(),
            warning: Some(SourceWarning {
                kind,
                message: message.into(),
            }),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.warning.is_some()
    }
}

/// Returns `Some(s)` for a non-blank string, `None` otherwise.
pub(crate) fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}
