//! # GraphQL Client
//!
//! Thin GraphQL-over-HTTP client for the shop API.
//!
//! ## Request / Response Envelope
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Shop API Call                                    │
//! │                                                                         │
//! │  POST {api_url}                                                        │
//! │  ├── vendure-token: <channel token>          (if CallContext has one)  │
//! │  ├── Authorization: Bearer <auth token>      (if CallContext has one)  │
//! │  └── { "operationName", "query", "variables" }                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HTTP 200                                                              │
//! │  ├── vendure-auth-token: <refreshed token>   (optional, captured)      │
//! │  └── { "data": {...}, "errors": [{ "message" }] }                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GraphqlReply { data: T, auth_token }   or   BackendError              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The endpoint is carried per call in [`CallContext`], never held globally,
//! so one client serves every tenant.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{BackendError, BackendResult};

/// Request header selecting the channel.
pub const CHANNEL_TOKEN_HEADER: &str = "vendure-token";

/// Response header carrying a new or refreshed session auth token.
pub const AUTH_TOKEN_HEADER: &str = "vendure-auth-token";

// =============================================================================
// Configuration
// =============================================================================

/// HTTP settings for the GraphQL client.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            timeout: Duration::from_secs(10),
            user_agent: format!("storefront-shell/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Per-call routing and identity.
///
/// Built fresh for every request by the composer: the endpoint may be a
/// per-tenant override, the channel comes from the session or the default,
/// and the auth token from the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub api_url: Url,
    pub channel_token: Option<String>,
    pub auth_token: Option<String>,
}

impl CallContext {
    pub fn new(api_url: Url) -> Self {
        CallContext {
            api_url,
            channel_token: None,
            auth_token: None,
        }
    }

    pub fn with_channel(mut self, token: impl Into<String>) -> Self {
        self.channel_token = Some(token.into());
        self
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequest<'a> {
    operation_name: &'a str,
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorBody {
    message: String,
}

/// Decoded `data` plus the auth token the shop API handed back, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlReply<T> {
    pub data: T,
    pub auth_token: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Shared GraphQL client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
}

impl GraphqlClient {
    /// Builds a client with its own connection pool.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(GraphqlClient { http })
    }

    /// Executes one GraphQL operation.
    ///
    /// ## Errors
    /// - [`BackendError::Unreachable`] on transport failure or timeout
    /// - [`BackendError::Http`] on a non-2xx status
    /// - [`BackendError::Graphql`] when the body carries `errors`
    /// - [`BackendError::MissingData`] when `data` is absent or null
    /// - [`BackendError::Decode`] when `data` has an unexpected shape
    pub async fn execute<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> BackendResult<GraphqlReply<T>> {
        debug!(
            operation = %operation,
            url = %ctx.api_url,
            channel = ctx.channel_token.as_deref().unwrap_or("-"),
            authenticated = ctx.auth_token.is_some(),
            "Shop API call"
        );

        let mut request = self.http.post(ctx.api_url.clone()).json(&GraphqlRequest {
            operation_name: operation,
            query,
            variables,
        });
        if let Some(token) = &ctx.channel_token {
            request = request.header(CHANNEL_TOKEN_HEADER, token);
        }
        if let Some(token) = &ctx.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::transport(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(operation = %operation, status = status.as_u16(), "Shop API returned error status");
            return Err(BackendError::Http {
                operation: operation.to_string(),
                status: status.as_u16(),
            });
        }

        let auth_token = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body: GraphqlResponse<T> = response
            .json()
            .await
            .map_err(|e| BackendError::transport(operation, e))?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            warn!(operation = %operation, errors = ?messages, "Shop API returned GraphQL errors");
            return Err(BackendError::Graphql {
                operation: operation.to_string(),
                messages,
            });
        }

        let data = body.data.ok_or_else(|| BackendError::MissingData {
            operation: operation.to_string(),
        })?;

        Ok(GraphqlReply { data, auth_token })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{spawn_fake_shop, FakeReply};
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        ping: String,
    }

    fn client() -> GraphqlClient {
        GraphqlClient::new(&BackendConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_execute_sends_headers_and_captures_auth_token() {
        let shop = spawn_fake_shop(|_| {
            FakeReply::ok(json!({ "ping": "pong" })).with_auth_token("fresh-token")
        })
        .await;

        let ctx = CallContext::new(shop.url.clone())
            .with_channel("eu")
            .with_auth_token(Some("old-token".into()));
        let reply: GraphqlReply<Ping> = client()
            .execute(&ctx, "Ping", "query Ping { ping }", json!({}))
            .await
            .unwrap();

        assert_eq!(reply.data.ping, "pong");
        assert_eq!(reply.auth_token.as_deref(), Some("fresh-token"));

        let recorded = shop.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].operation, "Ping");
        assert_eq!(recorded[0].channel_token.as_deref(), Some("eu"));
        assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer old-token"));
    }

    #[tokio::test]
    async fn test_execute_omits_optional_headers() {
        let shop = spawn_fake_shop(|_| FakeReply::ok(json!({ "ping": "pong" }))).await;

        let ctx = CallContext::new(shop.url.clone());
        let reply: GraphqlReply<Ping> = client()
            .execute(&ctx, "Ping", "query Ping { ping }", json!({}))
            .await
            .unwrap();

        assert_eq!(reply.auth_token, None);
        let recorded = shop.requests();
        assert_eq!(recorded[0].channel_token, None);
        assert_eq!(recorded[0].authorization, None);
    }

    #[tokio::test]
    async fn test_execute_maps_graphql_errors() {
        let shop = spawn_fake_shop(|_| FakeReply::errors(&["channel not found"])).await;

        let err = client()
            .execute::<Ping>(&CallContext::new(shop.url.clone()), "Ping", "query Ping { ping }", json!({}))
            .await
            .unwrap_err();

        match err {
            BackendError::Graphql { operation, messages } => {
                assert_eq!(operation, "Ping");
                assert_eq!(messages, vec!["channel not found".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_maps_http_status() {
        let shop = spawn_fake_shop(|_| FakeReply::status(503)).await;

        let err = client()
            .execute::<Ping>(&CallContext::new(shop.url.clone()), "Ping", "query Ping { ping }", json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Http { status: 503, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_execute_null_data_is_missing_data() {
        let shop = spawn_fake_shop(|_| FakeReply::ok(Value::Null)).await;

        let err = client()
            .execute::<Ping>(&CallContext::new(shop.url.clone()), "Ping", "query Ping { ping }", json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::MissingData { .. }));
    }

    #[tokio::test]
    async fn test_execute_unreachable() {
        // Bind then drop a listener so the port is closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/shop-api", addr)).unwrap();
        let err = client()
            .execute::<Ping>(&CallContext::new(url), "Ping", "query Ping { ping }", json!({}))
            .await
            .unwrap_err();

        assert!(err.is_unreachable());
    }
}
