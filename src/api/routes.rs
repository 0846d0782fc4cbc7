//! API Routes
//!
//! Configures the Axum router with the data endpoints behind the rate
//! limiter and the unthrottled service endpoints.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    analytics_handler, cache_stats_handler, health_handler, not_found_handler, patient_handler,
    patients_handler, stats_handler, AppState,
};
use super::rate_limit::rate_limit;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/stats`, `/api/patients`, `/api/patients/:id`, `/api/analytics`
///   (rate limited)
/// - `GET /cache/stats` - Cache and limiter counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Rate limit: per-client quota on `/api` routes
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let data_routes = Router::new()
        .route("/stats", get(stats_handler))
        .route("/patients", get(patients_handler))
        .route("/patients/:id", get(patient_handler))
        .route("/analytics", get(analytics_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .nest("/api", data_routes)
        .route("/cache/stats", get(cache_stats_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
