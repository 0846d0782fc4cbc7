//! API Module
//!
//! HTTP handlers, rate-limit middleware and routing for the data API.
//!
//! # Endpoints
//! - `GET /api/stats` - Summary statistics
//! - `GET /api/patients` - Paged records
//! - `GET /api/patients/:id` - Single record
//! - `GET /api/analytics` - Grouped analytics
//! - `GET /cache/stats` - Cache and limiter counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod rate_limit;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
