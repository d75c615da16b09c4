//! Application configuration. API credentials, endpoints, feed defaults.
//!
//! `AppConfig` is read once at startup; `FeedConfig` is the per-cycle view the
//! dashboard edits and hands to the feed service.

use crate::adapters::sources::{hacker_news, news_api};
use crate::domain::entities::non_blank;
use crate::domain::{FeedCriteria, SourceKind};
use serde::Deserialize;
use std::ops::RangeInclusive;

/// Allowed number of stories per cycle.
pub const NUM_STORIES_RANGE: RangeInclusive<usize> = 10..=50;
pub const DEFAULT_NUM_STORIES: usize = 25;
/// Highest selectable score floor.
pub const MAX_MIN_SCORE: u64 = 500;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Sources
    // ─────────────────────────────────────────────────────────────────────────
    /// NewsAPI key. Read from TECH_PULSE_NEWS_API_KEY or NEWS_API_KEY.
    #[serde(default)]
    pub news_api_key: Option<String>,

    /// NewsAPI top-headlines endpoint. Read from TECH_PULSE_NEWS_API_URL.
    #[serde(default)]
    pub news_api_url: Option<String>,

    /// Hacker News API base URL. Read from TECH_PULSE_HACKER_NEWS_URL.
    #[serde(default)]
    pub hacker_news_url: Option<String>,

    /// Per-request HTTP timeout in seconds (default 10). Read from TECH_PULSE_HTTP_TIMEOUT_SECS.
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,

    /// Source cache lifetime in seconds (default 300). Read from TECH_PULSE_CACHE_TTL_SECS.
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Feed defaults (editable at runtime from the Settings menu)
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub num_stories: Option<usize>,

    #[serde(default)]
    pub min_score: Option<u64>,

    /// Drop cross-source duplicates by url. Off unless set.
    #[serde(default)]
    pub dedupe_by_url: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // AI Summary Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// AI API key. Read from TECH_PULSE_AI_API_KEY or OPENAI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// AI API URL. Defaults to OpenAI. Read from TECH_PULSE_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// AI model name. Defaults to "gpt-4o-mini". Read from TECH_PULSE_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Use the mock summarizer when no AI key is set. Read from TECH_PULSE_MOCK_AI.
    #[serde(default)]
    pub mock_ai: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TECH_PULSE").try_parsing(true));
        if let Ok(path) = std::env::var("TECH_PULSE_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the NewsAPI key if set and not blank. Falls back to NEWS_API_KEY env.
    pub fn news_api_key(&self) -> Option<String> {
        non_blank(
            self.news_api_key
                .clone()
                .or_else(|| std::env::var("NEWS_API_KEY").ok()),
        )
    }

    pub fn news_api_url_or_default(&self) -> String {
        self.news_api_url
            .clone()
            .unwrap_or_else(|| news_api::DEFAULT_ENDPOINT.to_string())
    }

    pub fn hacker_news_url_or_default(&self) -> String {
        self.hacker_news_url
            .clone()
            .unwrap_or_else(|| hacker_news::DEFAULT_BASE_URL.to_string())
    }

    /// Returns HTTP timeout in seconds. Defaults to 10; zero is treated as unset.
    pub fn http_timeout_secs_or_default(&self) -> u64 {
        self.http_timeout_secs
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    pub fn cache_ttl_secs_or_default(&self) -> u64 {
        self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the AI API key if configured. Falls back to OPENAI_API_KEY env.
    pub fn ai_api_key(&self) -> Option<String> {
        non_blank(
            self.ai_api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok()),
        )
    }

    /// Returns the AI API URL. Defaults to OpenAI chat completions endpoint.
    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string())
    }

    /// Returns the AI model name. Defaults to "gpt-4o-mini".
    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| "gpt-4o-mini".to_string())
    }

    pub fn use_mock_ai(&self) -> bool {
        self.mock_ai.unwrap_or(false)
    }

    /// Initial feed settings. NewsAPI starts enabled only when a key is present.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            hacker_news_enabled: true,
            news_api_enabled: self.news_api_key().is_some(),
            dedupe_by_url: self.dedupe_by_url.unwrap_or(false),
            ..FeedConfig::default()
        }
        .with_num_stories(self.num_stories.unwrap_or(DEFAULT_NUM_STORIES))
        .with_min_score(self.min_score.unwrap_or(0))
    }
}

/// Settings for one fetch-render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    /// Always within [`NUM_STORIES_RANGE`].
    pub num_stories: usize,
    /// Always `<= MAX_MIN_SCORE`.
    pub min_score: u64,
    pub hacker_news_enabled: bool,
    pub news_api_enabled: bool,
    pub dedupe_by_url: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            num_stories: DEFAULT_NUM_STORIES,
            min_score: 0,
            hacker_news_enabled: true,
            news_api_enabled: false,
            dedupe_by_url: false,
        }
    }
}

impl FeedConfig {
    pub fn with_num_stories(mut self, n: usize) -> Self {
        self.num_stories = n.clamp(*NUM_STORIES_RANGE.start(), *NUM_STORIES_RANGE.end());
        self
    }

    pub fn with_min_score(mut self, score: u64) -> Self {
        self.min_score = score.min(MAX_MIN_SCORE);
        self
    }

    pub fn is_enabled(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::HackerNews => self.hacker_news_enabled,
            SourceKind::NewsApi => self.news_api_enabled,
        }
    }

    /// Items requested from `kind`. NewsAPI gets half the story budget.
    pub fn limit_for(&self, kind: SourceKind) -> usize {
        match kind {
            SourceKind::HackerNews => self.num_stories,
            SourceKind::NewsApi => self.num_stories / 2,
        }
    }

    pub fn criteria(&self) -> FeedCriteria {
        FeedCriteria {
            min_score: self.min_score,
            max_items: self.num_stories,
            dedupe_by_url: self.dedupe_by_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_config_clamps() {
        let cfg = FeedConfig::default().with_num_stories(3).with_min_score(9_000);
        assert_eq!(cfg.num_stories, 10);
        assert_eq!(cfg.min_score, 500);
        assert_eq!(FeedConfig::default().with_num_stories(80).num_stories, 50);
    }

    #[test]
    fn test_limits_and_criteria() {
        let cfg = FeedConfig::default().with_num_stories(25).with_min_score(10);
        assert_eq!(cfg.limit_for(SourceKind::HackerNews), 25);
        assert_eq!(cfg.limit_for(SourceKind::NewsApi), 12);
        assert_eq!(
            cfg.criteria(),
            FeedCriteria {
                min_score: 10,
                max_items: 25,
                dedupe_by_url: false,
            }
        );
    }

    #[test]
    fn test_source_flags() {
        let cfg = FeedConfig {
            hacker_news_enabled: false,
            news_api_enabled: true,
            ..FeedConfig::default()
        };
        assert!(!cfg.is_enabled(SourceKind::HackerNews));
        assert!(cfg.is_enabled(SourceKind::NewsApi));
    }

    #[test]
    fn test_app_config_defaults() {
        let cfg = AppConfig {
            news_api_key: Some("  ".to_string()),
            ai_api_key: Some("sk-1".to_string()),
            num_stories: Some(40),
            ..AppConfig::default()
        };
        assert_eq!(cfg.http_timeout_secs_or_default(), 10);
        assert_eq!(cfg.cache_ttl_secs_or_default(), 300);
        assert_eq!(cfg.ai_model_or_default(), "gpt-4o-mini");
        assert_eq!(cfg.hacker_news_url_or_default(), "https://hacker-news.firebaseio.com/v0");
        assert_eq!(cfg.news_api_url_or_default(), "https://newsapi.org/v2/top-headlines");
        assert_eq!(cfg.ai_api_key().as_deref(), Some("sk-1"));
        assert_eq!(cfg.feed_config().num_stories, 40);
    }
}
