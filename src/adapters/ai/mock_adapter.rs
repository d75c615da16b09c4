//! Mock summarizer for running the dashboard without API calls.
//!
//! Returns canned summaries for development and testing purposes.

use crate::domain::DomainError;
use crate::ports::SummarizerPort;
use std::time::Duration;
use tracing::info;

/// Mock summarizer.
///
/// Returns a predetermined summary without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockSummarizer {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockSummarizer {
    /// Create a new mock summarizer with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock summarizer with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SummarizerPort for MockSummarizer {
    async fn summarize(&self, title: &str, url: &str) -> Result<String, DomainError> {
        info!(title, "[MOCK] Simulating AI summary");

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        Ok(format!(
            "[MOCK] \"{}\" is trending. In production the model would explain why this \
             story matters for the tech industry, based on the headline and {}.",
            title, url
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_summarizer() {
        let adapter = MockSummarizer::with_delay(5);
        let summary = adapter
            .summarize("Linux 7.0 released", "https://kernel.org")
            .await
            .unwrap();

        assert!(summary.starts_with("[MOCK]"));
        assert!(summary.contains("Linux 7.0 released"));
        assert!(summary.contains("https://kernel.org"));
    }
}
