//! Shared HTTP plumbing for source adapters.

use crate::domain::DomainError;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("tech-pulse/", env!("CARGO_PKG_VERSION"));

/// Max characters of an error body kept in a `DomainError::Status`.
pub(crate) const ERROR_BODY_LIMIT: usize = 200;

/// Build a client whose every round trip fails after `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client, DomainError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| DomainError::Config(format!("HTTP client: {}", e)))
}

/// Send `request`, require a 2xx status, and decode the JSON body.
pub async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, DomainError> {
    let response = request
        .send()
        .await
        .map_err(|e| DomainError::Http(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DomainError::Status {
            status: status.as_u16(),
            body: truncate(&body, ERROR_BODY_LIMIT),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| DomainError::Parse(e.to_string()))
}

/// First `max` characters of `text` (char-boundary safe).
pub(crate) fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("héllo wörld", 4), "héll");
        assert_eq!(truncate("ok", 10), "ok");
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(10)).is_ok());
    }
}
