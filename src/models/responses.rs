//! Response DTOs for the data API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheStats, Source};
use crate::limiter::LimiterStats;

/// Envelope for every data endpoint, tagged with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse {
    /// The payload, shared with the cache
    pub data: Arc<Value>,
    /// "cache" or "fresh"
    pub source: &'static str,
    /// Tier that answered, null when freshly computed
    pub tier: Option<&'static str>,
}

impl DataResponse {
    pub fn new(data: Arc<Value>, source: Source) -> Self {
        Self {
            data,
            source: if source.is_cached() { "cache" } else { "fresh" },
            tier: source.tier(),
        }
    }
}

/// Envelope for GET /api/patients with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    #[serde(flatten)]
    pub inner: DataResponse,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl PageResponse {
    pub fn new(inner: DataResponse, page: usize, limit: usize, total: usize) -> Self {
        Self {
            inner,
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStats,
    /// Hit rate over both tiers
    pub hit_rate: f64,
    pub limiter: LimiterStats,
}

impl StatsResponse {
    pub fn new(cache: CacheStats, limiter: LimiterStats) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            limiter,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
