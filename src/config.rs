//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum entries in the recency (LRU) tier; 0 disables it
    pub recency_capacity: usize,
    /// Maximum entries in the frequency (LFU) tier; 0 disables it
    pub frequency_capacity: usize,
    /// Rate-limit window length in milliseconds
    pub rate_limit_window_ms: u64,
    /// Requests allowed per identity per window
    pub rate_limit_max_requests: u64,
    /// Interval between expired-window sweeps in milliseconds
    pub sweep_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// JSON array of patient records; empty record set when unset
    pub dataset_path: Option<PathBuf>,
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Negative capacities mean "caching disabled".
fn capacity_var(name: &str, default: usize) -> usize {
    parse_var::<i64>(name)
        .map(|v| usize::try_from(v.max(0)).unwrap_or(usize::MAX))
        .unwrap_or(default)
}

fn positive_var(name: &str, default: u64) -> u64 {
    parse_var::<u64>(name).filter(|v| *v > 0).unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `RECENCY_CAPACITY` - LRU tier size (default: 100)
    /// - `FREQUENCY_CAPACITY` - LFU tier size (default: 100)
    /// - `RATE_LIMIT_WINDOW_MS` - Window length (default: 60000)
    /// - `RATE_LIMIT_MAX_REQUESTS` - Quota per window (default: 100)
    /// - `SWEEP_INTERVAL_MS` - Window sweep cadence (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 5000)
    /// - `DATASET_PATH` - Patient records file (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            recency_capacity: capacity_var("RECENCY_CAPACITY", defaults.recency_capacity),
            frequency_capacity: capacity_var("FREQUENCY_CAPACITY", defaults.frequency_capacity),
            rate_limit_window_ms: positive_var(
                "RATE_LIMIT_WINDOW_MS",
                defaults.rate_limit_window_ms,
            ),
            rate_limit_max_requests: parse_var("RATE_LIMIT_MAX_REQUESTS")
                .unwrap_or(defaults.rate_limit_max_requests),
            sweep_interval_ms: positive_var("SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            dataset_path: env::var_os("DATASET_PATH").map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recency_capacity: 100,
            frequency_capacity: 100,
            rate_limit_window_ms: 60_000,
            rate_limit_max_requests: 100,
            sweep_interval_ms: 1000,
            server_port: 5000,
            dataset_path: None,
        }
    }
}
