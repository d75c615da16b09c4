//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Provider answered with an error envelope (e.g. NewsAPI `status: "error"`).
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("AI summary failed: {0}")]
    Ai(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("UI error: {0}")]
    Ui(String),
}
