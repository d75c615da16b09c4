//! Cache adapters. Implement FeedCachePort.

pub mod memory_cache;

pub use memory_cache::MemoryCache;
