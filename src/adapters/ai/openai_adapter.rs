//! OpenAI-compatible adapter for headline summaries.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! Implements `SummarizerPort` with a fixed tech-news prompt.

use crate::domain::DomainError;
use crate::ports::SummarizerPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Completion budget; a 2-3 sentence answer fits comfortably.
const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;

/// OpenAI-compatible summarizer.
///
/// Can be configured to work with:
/// - OpenAI API (api.openai.com)
/// - Azure OpenAI
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    /// * `client` - HTTP client (carries the request timeout)
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-4o-mini", "llama3.2")
    pub fn new(client: reqwest::Client, api_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    fn system_prompt() -> &'static str {
        "You are a tech news summarizer. Given a news headline and URL, provide a brief, \
         insightful 2-3 sentence summary explaining why this news matters for the tech industry. \
         Be concise, factual, and highlight the key implications. If you don't have enough context \
         from just the title, make reasonable inferences about why it might be trending."
    }

    fn user_prompt(title: &str, url: &str) -> String {
        format!(
            "Headline: {}\nURL: {}\n\nProvide a brief summary:",
            title, url
        )
    }

    fn build_request(&self, title: &str, url: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::system_prompt().to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::user_prompt(title, url),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Trimmed text of the first choice; errors when missing or blank.
fn first_choice_text(response: ChatResponse) -> Result<String, DomainError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| DomainError::Ai("No response choices returned".to_string()))
}

#[async_trait::async_trait]
impl SummarizerPort for OpenAiAdapter {
    async fn summarize(&self, title: &str, url: &str) -> Result<String, DomainError> {
        info!(model = %self.model, title, "requesting AI summary");

        let request = self.build_request(title, url);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let summary = first_choice_text(chat_response)?;
        debug!(summary_len = summary.len(), "summary received");

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> OpenAiAdapter {
        OpenAiAdapter::new(
            reqwest::Client::new(),
            "http://localhost/v1/chat/completions".to_string(),
            "sk-test".to_string(),
            "gpt-4o-mini".to_string(),
        )
    }

    #[test]
    fn test_request_shape() {
        let request = adapter().build_request("Rust 2.0 announced", "https://blog.rust-lang.org");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(
            json["messages"][1]["content"],
            "Headline: Rust 2.0 announced\nURL: https://blog.rust-lang.org\n\nProvide a brief summary:"
        );
    }

    #[test]
    fn test_first_choice_is_trimmed() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  It matters.\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_text(response).unwrap(), "It matters.");
    }

    #[test]
    fn test_empty_choices_is_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice_text(response), Err(DomainError::Ai(_))));

        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert!(first_choice_text(blank).is_err());
    }
}
