//! Cross-cutting helpers shared by wiring and adapters.

pub mod config;

pub use config::{AppConfig, FeedConfig};
