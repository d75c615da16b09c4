//! Infrastructure adapters. Implement ports.
//!
//! News providers, AI, cache, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod cache;
pub mod sources;
pub mod ui;
