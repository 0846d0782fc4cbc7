//! API Handlers
//!
//! HTTP request handlers for the data endpoints and service endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::cache::{CacheFacade, Source};
use crate::config::Config;
use crate::data::{DataProducer, Resource};
use crate::error::{ApiError, Result};
use crate::limiter::RateLimiter;
use crate::models::{DataResponse, HealthResponse, PageQuery, PageResponse, StatsResponse};

/// Cached payload; shared between both tiers and the response.
pub type Payload = Arc<Value>;

/// Application state shared across all handlers.
///
/// The cache facade and the rate limiter each sit behind their own lock.
#[derive(Clone)]
pub struct AppState {
    /// Both cache tiers
    pub cache: Arc<RwLock<CacheFacade<Payload>>>,
    /// Per-client window table
    pub limiter: Arc<RwLock<RateLimiter>>,
    /// Computes values on a cache miss
    pub producer: Arc<dyn DataProducer>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(
        cache: CacheFacade<Payload>,
        limiter: RateLimiter,
        producer: impl DataProducer + 'static,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            limiter: Arc::new(RwLock::new(limiter)),
            producer: Arc::new(producer),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config, producer: impl DataProducer + 'static) -> Self {
        Self::new(
            CacheFacade::new(config.recency_capacity, config.frequency_capacity),
            RateLimiter::from_config(config),
            producer,
        )
    }

    /// Serves `resource` from the cache, computing and caching it on a miss.
    ///
    /// Producer errors are returned without touching the cache.
    pub async fn fetch(&self, resource: Resource) -> Result<(Payload, Source)> {
        let key = resource.cache_key();
        let (payload, source) = {
            let mut cache = self.cache.write().await;
            cache.get_or_compute(&key, || self.producer.produce(&resource).map(Arc::new))?
        };

        match source.tier() {
            Some(tier) => info!(key = %key, tier, "served from cache"),
            None => info!(key = %key, "fresh data generated and cached"),
        }

        Ok((payload, source))
    }
}

/// Handler for GET /api/stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<DataResponse>> {
    let (data, source) = state.fetch(Resource::Stats).await?;
    Ok(Json(DataResponse::new(data, source)))
}

/// Handler for GET /api/patients
///
/// Missing or malformed `page`/`limit` fall back to 1 and 10.
pub async fn patients_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    let (page, limit) = (query.page(), query.limit());
    let (data, source) = state.fetch(Resource::PatientsPage { page, limit }).await?;

    Ok(Json(PageResponse::new(
        DataResponse::new(data, source),
        page,
        limit,
        state.producer.total_records(),
    )))
}

/// Handler for GET /api/patients/:id
pub async fn patient_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse>> {
    let (data, source) = state.fetch(Resource::Patient { id }).await?;
    Ok(Json(DataResponse::new(data, source)))
}

/// Handler for GET /api/analytics
pub async fn analytics_handler(State(state): State<AppState>) -> Result<Json<DataResponse>> {
    let (data, source) = state.fetch(Resource::Analytics).await?;
    Ok(Json(DataResponse::new(data, source)))
}

/// Handler for GET /cache/stats
///
/// Returns tier and limiter counters.
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await.stats();
    let limiter = state.limiter.read().await.stats();

    Json(StatsResponse::new(cache, limiter))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Fallback for unknown routes
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Patient, RecordSet};
    use std::time::Duration;

    fn test_state() -> AppState {
        let patient: Patient = serde_json::from_value(serde_json::json!({
            "id": "P10000", "name": "Patient 10000", "age": 50, "gender": "Female",
            "diagnosis": "Pneumonia", "admissionDate": "2024-03-01",
            "dischargeDate": "2024-03-04", "readmitted": false, "riskScore": 40,
            "department": "Internal Medicine", "insurance": "Private", "lengthOfStay": 3
        }))
        .unwrap();

        AppState::new(
            CacheFacade::new(10, 10),
            RateLimiter::new(Duration::from_secs(60), 100),
            RecordSet::new(vec![patient]),
        )
    }

    #[tokio::test]
    async fn test_stats_handler_fresh_then_cached() {
        let state = test_state();

        let first = stats_handler(State(state.clone())).await.unwrap();
        assert_eq!(first.source, "fresh");
        assert_eq!(first.data["totalPatients"], 1);

        let second = stats_handler(State(state)).await.unwrap();
        assert_eq!(second.source, "cache");
        assert_eq!(second.tier, Some("recency"));
    }

    #[tokio::test]
    async fn test_patient_handler_not_found_is_not_cached() {
        let state = test_state();

        let result = patient_handler(State(state.clone()), Path("P99999".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let cache = state.cache.read().await;
        assert!(!cache.recency().has("patient_P99999"));
        assert!(!cache.frequency().has("patient_P99999"));
    }

    #[tokio::test]
    async fn test_patients_handler_defaults() {
        let state = test_state();

        let response = patients_handler(State(state), Query(PageQuery::default()))
            .await
            .unwrap();
        assert_eq!(response.page, 1);
        assert_eq!(response.limit, 10);
        assert_eq!(response.total, 1);
        assert_eq!(response.total_pages, 1);
    }

    #[tokio::test]
    async fn test_cache_stats_handler() {
        let state = test_state();
        analytics_handler(State(state.clone())).await.unwrap();
        analytics_handler(State(state.clone())).await.unwrap();

        let response = cache_stats_handler(State(state)).await;
        assert_eq!(response.cache.misses, 1);
        assert_eq!(response.cache.recency_hits, 1);
        assert_eq!(response.cache.recency_entries, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
