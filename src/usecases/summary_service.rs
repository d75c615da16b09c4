//! Summary use case: explain one story on demand.
//!
//! Failures never propagate; they become a short visible message.

use crate::domain::NewsItem;
use crate::ports::SummarizerPort;
use std::sync::Arc;
use tracing::{info, warn};

/// Characters of the underlying error shown to the user.
const ERROR_PREVIEW_CHARS: usize = 50;

/// Service for AI summaries. Disabled when no summarizer is configured.
pub struct SummaryService {
    ai: Option<Arc<dyn SummarizerPort>>,
}

impl SummaryService {
    pub fn new(ai: Option<Arc<dyn SummarizerPort>>) -> Self {
        Self { ai }
    }

    pub fn is_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Summary text for `item`, or `None` when summaries are disabled.
    ///
    /// An AI failure yields `Summary unavailable: <error preview>`.
    pub async fn summarize(&self, item: &NewsItem) -> Option<String> {
        let ai = self.ai.as_ref()?;
        match ai.summarize(&item.title, &item.url).await {
            Ok(summary) => {
                info!(id = %item.id, "summary ready");
                Some(summary)
            }
            Err(e) => {
                warn!(id = %item.id, error = %e, "summary failed");
                let preview: String = e.to_string().chars().take(ERROR_PREVIEW_CHARS).collect();
                Some(format!("Summary unavailable: {}", preview))
            }
        }
    }
}
