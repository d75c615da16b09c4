//! Application use cases. Orchestrate domain logic via ports.

pub mod feed_service;
pub mod summary_service;

pub use feed_service::{Feed, FeedService};
pub use summary_service::SummaryService;
