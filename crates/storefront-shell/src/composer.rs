//! # Shell State Composer
//!
//! Builds the Session Context for one page request.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PageRequest { path, Cookie }        api_url_override: Option<&Url>    │
//! │       │                                       │                         │
//! │       ▼                                       ▼                         │
//! │  SessionStore::read ──► Session ──► CallContext { api_url,             │
//! │                          │                      vendure-token,          │
//! │                          │                      bearer token }          │
//! │                          │                 │                            │
//! │                          │     ┌───────────┼───────────┬───────────┐   │
//! │                          │     ▼           ▼           ▼           ▼   │
//! │                          │ collections  customer    channel   countries│
//! │                          │     └───────────┴─────┬─────┴───────────┘   │
//! │                          │          tokio::try_join! (fail-fast)       │
//! │                          ▼                       ▼                      │
//! │         sessionChannelChanged = channel key present                    │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │  ComposedContext { SessionContext, Set-Cookie if auth token refreshed }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failing backend call fails the whole composition: there is no partial
//! context and no cached fallback. Nothing here touches shared state; the
//! endpoint override travels as an argument.

use std::sync::Arc;

use tracing::{debug, error};
use url::Url;

use crate::config::StorefrontConfig;
use crate::error::ShellResult;
use crate::session::{Session, SessionData, SessionStore};
use storefront_backend::{CallContext, ShopApi};
use storefront_core::validation::validate_channel_token;
use storefront_core::{top_level_collections, ActiveOrder, SessionContext};

/// Name of the response header that carries a re-committed session.
pub const SET_COOKIE: &str = "set-cookie";

// =============================================================================
// Request / Response
// =============================================================================

/// The parts of an incoming page request the composer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    /// Raw `Cookie` header.
    pub cookie_header: Option<String>,
}

impl PageRequest {
    pub fn new(path: impl Into<String>, cookie_header: Option<String>) -> Self {
        PageRequest {
            path: path.into(),
            cookie_header,
        }
    }
}

/// A composed Session Context plus headers the outer response must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedContext {
    pub context: SessionContext,
    pub response_headers: Vec<(String, String)>,
}

/// Result of an order endpoint call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    pub order: Option<ActiveOrder>,
    pub response_headers: Vec<(String, String)>,
}

// =============================================================================
// Composer
// =============================================================================

/// Composes Session Contexts and serves the order calls that share the same
/// session handling.
#[derive(Clone)]
pub struct ShellComposer {
    api: Arc<dyn ShopApi>,
    sessions: SessionStore,
    default_api_url: Url,
    default_channel_token: String,
}

impl ShellComposer {
    pub fn new(api: Arc<dyn ShopApi>, config: &StorefrontConfig) -> ShellResult<Self> {
        Ok(ShellComposer {
            api,
            sessions: SessionStore::new(&config.session),
            default_api_url: config.api_url()?,
            default_channel_token: config.default_channel_token().to_string(),
        })
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Routing and identity for every backend call made on behalf of
    /// `session`.
    pub fn call_context(&self, session: &Session, api_url_override: Option<&Url>) -> CallContext {
        let api_url = api_url_override.unwrap_or(&self.default_api_url).clone();
        let channel = session
            .channel()
            .unwrap_or(&self.default_channel_token)
            .to_string();

        CallContext::new(api_url)
            .with_channel(channel)
            .with_auth_token(session.auth_token().map(str::to_string))
    }

    /// Builds the Session Context for one page request.
    ///
    /// ## Errors
    /// The first failing backend call, as [`crate::ShellError::Backend`].
    pub async fn compose_context(
        &self,
        request: &PageRequest,
        api_url_override: Option<&Url>,
    ) -> ShellResult<ComposedContext> {
        let session = self.sessions.read(request.cookie_header.as_deref());
        let ctx = self.call_context(&session, api_url_override);

        debug!(
            path = %request.path,
            api_url = %ctx.api_url,
            channel = ctx.channel_token.as_deref().unwrap_or("-"),
            "Composing session context"
        );

        let (collections, lookup, active_channel, countries) = tokio::try_join!(
            self.api.collections(&ctx),
            self.api.active_customer(&ctx),
            self.api.active_channel(&ctx),
            self.api.available_countries(&ctx),
        )
        .map_err(|e| {
            error!(path = %request.path, error = %e, "Session context composition failed");
            e
        })?;

        let mut response_headers = Vec::new();
        if let Some(token) = lookup.refreshed_auth_token {
            if session.auth_token() != Some(token.as_str()) {
                let data = SessionData {
                    auth_token: Some(token),
                    ..session.data().clone()
                };
                response_headers.push((SET_COOKIE.to_string(), self.sessions.commit(&data)?));
            }
        }

        let context = SessionContext {
            active_customer: lookup.customer,
            active_channel,
            collections: top_level_collections(collections),
            countries,
            session_channel_changed: session.channel().is_some(),
        };

        debug!(
            signed_in = context.is_signed_in(),
            channel = %context.channel_token(),
            collections = context.collections.len(),
            "Session context composed"
        );

        Ok(ComposedContext {
            context,
            response_headers,
        })
    }

    /// Active order for the request's session.
    pub async fn active_order(
        &self,
        request: &PageRequest,
        api_url_override: Option<&Url>,
    ) -> ShellResult<Option<ActiveOrder>> {
        let session = self.sessions.read(request.cookie_header.as_deref());
        let ctx = self.call_context(&session, api_url_override);
        Ok(self.api.active_order(&ctx).await?)
    }

    /// Stores `token` as the session's explicit channel and returns the
    /// active order as seen in that channel.
    pub async fn switch_channel(
        &self,
        request: &PageRequest,
        token: &str,
        api_url_override: Option<&Url>,
    ) -> ShellResult<OrderUpdate> {
        validate_channel_token(token)?;
        let token = token.trim();

        let session = self.sessions.read(request.cookie_header.as_deref());
        let data = SessionData {
            channel: Some(token.to_string()),
            ..session.data().clone()
        };
        let set_cookie = self.sessions.commit(&data)?;

        let ctx = self.call_context(&Session::new(data), api_url_override);
        let order = self.api.active_order(&ctx).await?;

        debug!(token = %token, "Session channel set");
        Ok(OrderUpdate {
            order,
            response_headers: vec![(SET_COOKIE.to_string(), set_cookie)],
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
