//! Feed assembly: merge source batches, filter by score floor, rank, bound.
//!
//! Pure functions over `NewsItem`; no IO.

use crate::domain::NewsItem;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Caller-supplied rules for one assembly pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCriteria {
    /// Items with `score < min_score` are dropped. 0 keeps everything.
    pub min_score: u64,
    /// Upper bound on the number of items returned.
    pub max_items: usize,
    /// Drop later items whose non-empty url was already seen. Off by default.
    pub dedupe_by_url: bool,
}

/// Result of assembly. `NoResults` is a normal state, not a fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    Stories(Vec<NewsItem>),
    NoResults,
}

impl FeedOutcome {
    pub fn stories(&self) -> &[NewsItem] {
        match self {
            FeedOutcome::Stories(items) => items,
            FeedOutcome::NoResults => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FeedOutcome::NoResults)
    }
}

/// Merge batches in the given order, then filter, sort by score (stable), and truncate.
pub fn assemble(batches: Vec<Vec<NewsItem>>, criteria: &FeedCriteria) -> FeedOutcome {
    let merged = batches.into_iter().flatten();

    let mut items: Vec<NewsItem> = if criteria.dedupe_by_url {
        // Items without a url never collide; the index keeps their keys distinct.
        merged
            .enumerate()
            .unique_by(|(idx, item)| {
                if item.url.is_empty() {
                    (String::new(), Some(*idx))
                } else {
                    (item.url.clone(), None)
                }
            })
            .map(|(_, item)| item)
            .filter(|item| item.score >= criteria.min_score)
            .collect()
    } else {
        merged
            .filter(|item| item.score >= criteria.min_score)
            .collect()
    };

    // sort_by_key is stable: equal scores keep arrival order.
    items.sort_by_key(|item| Reverse(item.score));
    items.truncate(criteria.max_items);

    if items.is_empty() {
        FeedOutcome::NoResults
    } else {
        FeedOutcome::Stories(items)
    }
}

/// Aggregates shown above the story list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedStats {
    pub stories: usize,
    pub total_points: u64,
    pub total_comments: u64,
    pub sources: usize,
}

impl FeedStats {
    pub fn from_items(items: &[NewsItem]) -> Self {
        let sources: HashSet<&str> = items.iter().map(|i| i.source_name.as_str()).collect();
        Self {
            stories: items.len(),
            total_points: items.iter().map(|i| i.score).sum(),
            total_comments: items.iter().map(|i| i.comment_count).sum(),
            sources: sources.len(),
        }
    }
}

/// Coarse relative age: `3d ago`, `5h ago`, `12m ago`, `just now`.
/// Timestamps in the future render as `just now`.
pub fn time_ago(published_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(published_at);
    if diff.num_days() > 0 {
        format!("{}d ago", diff.num_days())
    } else if diff.num_hours() > 0 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_minutes() > 0 {
        format!("{}m ago", diff.num_minutes())
    } else {
        "just now".to_string()
    }
}
