//! Rate Limit Middleware
//!
//! Admission gate in front of the data endpoints. Denied requests never
//! reach a handler, so neither the cache nor the data producer is touched.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use super::handlers::AppState;
use crate::error::{ApiError, Result};
use crate::limiter::Admission;

/// Identity used when the peer address is unavailable
pub const UNKNOWN_CLIENT: &str = "0.0.0.0";

/// Header carrying the per-window quota
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";

/// Header carrying the requests left in the current window
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Peer IP address of the request, or [`UNKNOWN_CLIENT`].
pub fn client_identity(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Middleware admitting or rejecting each request by client quota.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let identity = client_identity(&request);
    let (admission, limit) = {
        let mut limiter = state.limiter.write().await;
        (limiter.admit(&identity), limiter.max_requests())
    };

    match admission {
        Admission::Denied { retry_after_secs } => {
            warn!(path = %request.uri().path(), retry_after_secs, "rate limit exceeded");
            Err(ApiError::RateLimited { retry_after_secs })
        }
        Admission::Allowed { remaining } => {
            debug!(path = %request.uri().path(), remaining, "request admitted");
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(LIMIT_HEADER, HeaderValue::from(limit));
            headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));
            Ok(response)
        }
    }
}
