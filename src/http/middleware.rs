//! Request pipeline: error envelope, admission control and API key checks.
//!
//! Installed outermost first in that order by [`super::router`].

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, SocketAddr};
use tracing::{debug, error, warn};

use super::error::{ApiError, ApiErrorResponse, InternalDetails, CODE_INTERNAL};
use super::state::AppState;
use crate::ratelimit::{ClientId, Decision};

pub const API_KEY_HEADER: &str = "x-api-key";

pub const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Fill in the request path on error bodies and log server errors.
pub async fn error_envelope(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    let Some(mut body) = response.extensions_mut().remove::<ApiErrorResponse>() else {
        return response;
    };
    let internal = response.extensions_mut().remove::<InternalDetails>();

    if body.error_code == CODE_INTERNAL {
        error!(
            path = %path,
            details = ?internal.as_ref().map(|d| &d.0),
            "Unhandled error"
        );
        if state.expose_internal_errors {
            body.details = internal.map(|d| d.0);
        }
    }
    body.path = Some(path);

    let (mut parts, _) = response.into_parts();
    let json = match serde_json::to_vec(&body) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "Failed to serialize error body");
            return parts.status.into_response();
        }
    };
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, json.into())
}

/// Per-client fixed-window admission control.
///
/// Rate limit headers are attached to every response passing through,
/// whether the request was admitted or not.
pub async fn admission_control(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.is_bypassed(request.uri().path()) {
        return next.run(request).await;
    }

    let client = client_identity(&request);
    let decision = state.limiter.check_and_record(&client);

    let mut response = if decision.admitted {
        next.run(request).await
    } else {
        warn!(
            client = %client,
            path = %request.uri().path(),
            "Rate limit exceeded"
        );
        ApiError::rate_limited().into_response()
    };

    apply_rate_limit_headers(response.headers_mut(), &decision);
    response
}

/// Static API key authentication via the `X-API-Key` header.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.is_bypassed(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let peer = peer_ip(&request);
    let path = request.uri().path();

    let Some(key) = api_key(request.headers()) else {
        warn!(peer = ?peer, path = %path, "Request without API key");
        return Err(ApiError::unauthenticated("API key not provided"));
    };

    if !state.is_valid_key(key) {
        warn!(peer = ?peer, path = %path, "Request with invalid API key");
        return Err(ApiError::unauthenticated("Invalid API key"));
    }

    debug!(path = %path, "API key accepted");
    Ok(next.run(request).await)
}

/// Derive the admission identity of a request.
pub fn client_identity(request: &Request) -> ClientId {
    ClientId::resolve(api_key(request.headers()), peer_ip(request))
}

fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

fn peer_ip(request: &Request) -> Option<IpAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from(decision.remaining));

    let reset = decision.reset_at.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    if let Ok(value) = HeaderValue::from_str(&reset) {
        headers.insert(RATE_LIMIT_RESET, value);
    }
}
