//! tech-pulse: ranked tech headlines from Hacker News and NewsAPI, with AI summaries.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
