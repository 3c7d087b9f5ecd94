//! Rate limiting middleware for axum.
//!
//! This module provides middleware that enforces rate limits using the `RateLimiter` port.
//!
//! # Architecture
//!
//! The middleware checks two scopes in order:
//! 1. Per-IP rate limit (sliding window per client)
//! 2. Global rate limit (infrastructure protection)
//!
//! A request denied per IP never reaches the global budget. Forwarding
//! headers are only read when the server sits behind a trusted proxy;
//! otherwise the socket address identifies the client.
//!
//! Rate limit status is returned in standard HTTP headers:
//! - `X-RateLimit-Limit`: Maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: Requests remaining in the current window
//! - `X-RateLimit-Reset`: Unix timestamp when the oldest request leaves the window
//! - `Retry-After`: Seconds to wait (only on 429 response)
//!
//! Limiter failures fail open.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::adapters::http::error::ErrorResponse;
use crate::ports::{RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

/// Rate limiter middleware state.
#[derive(Clone)]
pub struct RateLimiterState {
    limiter: Arc<dyn RateLimiter>,
    trust_proxy_headers: bool,
}

impl RateLimiterState {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            trust_proxy_headers: false,
        }
    }

    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    pub fn with_trusted_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }
}

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    /// Maximum requests allowed in the window.
    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    /// Requests remaining in the current window.
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    /// Unix timestamp when the window resets.
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Rate limiting middleware that checks global and per-IP limits.
///
/// Requests without a resolvable client IP are only subject to the global
/// limit.
pub async fn rate_limit_middleware(
    State(state): State<RateLimiterState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(
        &request,
        connect_info.as_ref(),
        state.trust_proxy_headers,
    );
    let limiter = &state.limiter;

    let ip_status = match &client_ip {
        Some(ip) => match limiter.check(RateLimitKey::ip(ip)).await {
            Ok(RateLimitResult::Denied(denied)) => {
                warn!(client_ip = %ip, limit = denied.limit, "Client rate limit exceeded");
                return rate_limit_response(
                    denied.limit,
                    denied.retry_after_secs,
                    denied.reset_at.as_unix_secs(),
                );
            }
            Ok(RateLimitResult::Allowed(status)) => Some(status),
            Err(e) => {
                warn!(error = %e, "Rate limiter unavailable for IP check");
                None
            }
        },
        None => None,
    };

    match limiter.check(RateLimitKey::global()).await {
        Ok(RateLimitResult::Denied(denied)) => {
            warn!(scope = %denied.scope, "Global rate limit exceeded");
            return rate_limit_response(
                denied.limit,
                denied.retry_after_secs,
                denied.reset_at.as_unix_secs(),
            );
        }
        Err(e) => warn!(error = %e, "Rate limiter unavailable"),
        Ok(RateLimitResult::Allowed(_)) => {}
    }

    let mut response = next.run(request).await;

    if let Some(status) = ip_status {
        add_rate_limit_headers(&mut response, &status);
    }

    response
}

/// Extract client IP from request.
///
/// With `trust_proxy_headers`, the order of precedence is:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
///
/// Without it only the socket address is used.
fn extract_client_ip<B>(
    request: &axum::http::Request<B>,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_proxy_headers: bool,
) -> Option<String> {
    let socket_ip = connect_info.map(|ci| ci.0.ip().to_string());
    if !trust_proxy_headers {
        return socket_ip;
    }

    if let Some(first_ip) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return Some(first_ip.to_string());
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return Some(real_ip.to_string());
    }

    socket_ip
}

/// Create a 429 Too Many Requests response.
fn rate_limit_response(limit: u32, retry_after_secs: u32, reset_at: u64) -> Response {
    let mut response = ErrorResponse::rate_limited(retry_after_secs).into_response();

    let headers = response.headers_mut();
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(limit));
    headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(0u32));
    headers.insert(headers::X_RATELIMIT_RESET.clone(), HeaderValue::from(reset_at));
    headers.insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));

    response
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(response: &mut Response, status: &RateLimitStatus) {
    let headers = response.headers_mut();
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(status.limit));
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from(status.remaining),
    );
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from(status.reset_at.as_unix_secs()),
    );
}
