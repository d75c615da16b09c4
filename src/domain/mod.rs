//! Core domain layer. No external I/O dependencies.
//!
//! Entities and feed rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod feed;

pub use entities::{NewsItem, SourceBatch, SourceKind, SourceWarning};
pub use errors::DomainError;
pub use feed::{FeedCriteria, FeedOutcome, FeedStats, assemble, time_ago};
