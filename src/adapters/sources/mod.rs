//! News source adapters. Implement NewsSourcePort for each provider.

pub mod hacker_news;
pub mod http;
pub mod news_api;

pub use hacker_news::HackerNewsAdapter;
pub use http::build_client;
pub use news_api::NewsApiAdapter;
