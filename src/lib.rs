//! Cache Gate - rate-limited read-through cache for a read-mostly data API
//!
//! Requests pass a per-client fixed-window rate limiter, then a two-tier
//! cache (LRU, then LFU) before any data is computed.

pub mod api;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
