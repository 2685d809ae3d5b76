//! # Storefront Server
//!
//! HTTP routes in front of [`ShellComposer`].
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /api/root?path=/x    ──► compose_context ──► SessionContext JSON  │
//! │  GET  /api/active-order    ──► active_order    ──► ActiveOrder | null   │
//! │  POST /api/channel {token} ──► switch_channel  ──► ActiveOrder | null   │
//! │  GET  /health              ──► "OK"                                     │
//! │                                                                         │
//! │  Every response carries the composer's headers (Set-Cookie).            │
//! │  Host header ──► tenants map ──► API URL override for the request.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::header::{COOKIE, HOST};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, info_span, Instrument};
use url::Url;
use uuid::Uuid;

use storefront_core::HOME_PATH;
use storefront_shell::{PageRequest, ShellComposer};

pub use config::ServerConfig;
pub use error::{ApiError, ErrorCode};

// =============================================================================
// State
// =============================================================================

/// Shared application state.
pub struct AppState {
    pub composer: ShellComposer,
    /// Host header -> shop API URL override.
    pub tenants: HashMap<String, Url>,
}

impl AppState {
    pub fn new(composer: ShellComposer, tenants: HashMap<String, Url>) -> Self {
        AppState { composer, tenants }
    }

    /// API URL override for the request's host, if it is a known tenant.
    pub fn api_url_override(&self, headers: &HeaderMap) -> Option<&Url> {
        tenant_api_url(&self.tenants, headers)
    }
}

/// Matches the full `Host` first, then the host without its port.
fn tenant_api_url<'a>(tenants: &'a HashMap<String, Url>, headers: &HeaderMap) -> Option<&'a Url> {
    let host = headers.get(HOST)?.to_str().ok()?.to_ascii_lowercase();
    tenants.get(&host).or_else(|| {
        let (name, _port) = host.rsplit_once(':')?;
        tenants.get(name)
    })
}

// =============================================================================
// Router
// =============================================================================

/// Builds the storefront router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/root", get(root_handler))
        .route("/api/active-order", get(active_order_handler))
        .route("/api/channel", post(channel_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(request_span))
        .with_state(state)
}

/// Runs each request inside a span carrying a fresh request id.
async fn request_span(request: Request, next: Next) -> Response {
    let span = info_span!(
        "request",
        id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    );
    next.run(request).instrument(span).await
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Deserialize)]
struct RootQuery {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelBody {
    token: String,
}

fn page_request(path: impl Into<String>, headers: &HeaderMap) -> PageRequest {
    let cookie_header = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    PageRequest::new(path, cookie_header)
}

/// Attaches the composer's response headers to `response`.
fn with_headers(mut response: Response, headers: Vec<(String, String)>) -> Result<Response, ApiError> {
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::internal(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::from_str(&value)
            .map_err(|e| ApiError::internal(format!("Invalid header value: {}", e)))?;
        response.headers_mut().append(name, value);
    }
    Ok(response)
}

/// Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    "OK"
}

/// Session Context for a page request.
async fn root_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RootQuery>,
) -> Result<Response, ApiError> {
    let path = query.path.unwrap_or_else(|| HOME_PATH.to_string());
    let request = page_request(path, &headers);

    let composed = state
        .composer
        .compose_context(&request, state.api_url_override(&headers))
        .await?;

    debug!(headers = composed.response_headers.len(), "Serving session context");
    with_headers(Json(composed.context).into_response(), composed.response_headers)
}

/// Active order for the session.
async fn active_order_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let request = page_request(HOME_PATH, &headers);
    let order = state
        .composer
        .active_order(&request, state.api_url_override(&headers))
        .await?;

    Ok(Json(order).into_response())
}

/// Stores the chosen channel in the session and returns the order as seen
/// in that channel.
async fn channel_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ChannelBody>,
) -> Result<Response, ApiError> {
    let request = page_request(HOME_PATH, &headers);
    let update = state
        .composer
        .switch_channel(&request, &body.token, state.api_url_override(&headers))
        .await?;

    with_headers(Json(update.order).into_response(), update.response_headers)
}
