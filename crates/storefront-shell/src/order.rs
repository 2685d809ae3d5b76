//! # Order Management
//!
//! The client-side collaborator that owns the active order (cart). The shell
//! only asks it to refresh after every new Session Context and to switch
//! channel; cart pricing and mutations live elsewhere.
//!
//! ```text
//! ShellClient ──refresh()────────────► GET  /api/active-order
//!             ──switch_channel("eu")─► POST /api/channel { token }
//!                                        (server writes `channel` into the
//!                                         session cookie, returns the order)
//! ```
//!
//! Calls may overlap (the boot refresh races the geolocation switch). Each
//! call takes a sequence number when it is issued; a response only replaces
//! the cached order if no later-issued call has already stored one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::ShellResult;
use crate::remote::StorefrontConnection;
use storefront_core::ActiveOrder;

/// Owner of the client-held active order.
#[async_trait]
pub trait OrderManager: Send + Sync {
    /// Re-fetches the active order.
    async fn refresh(&self) -> ShellResult<Option<ActiveOrder>>;

    /// Persists `token` as the session's channel and re-fetches the order.
    async fn switch_channel(&self, token: &str) -> ShellResult<Option<ActiveOrder>>;

    /// Last known active order, without I/O.
    fn active_order(&self) -> Option<ActiveOrder>;
}

#[derive(Debug, Serialize)]
struct ChannelSwitch<'a> {
    token: &'a str,
}

#[derive(Debug, Default)]
struct CachedOrder {
    /// Sequence number of the call that produced `order`.
    sequence: u64,
    order: Option<ActiveOrder>,
}

/// [`OrderManager`] talking to the storefront server's order endpoints.
#[derive(Debug)]
pub struct RemoteOrderManager {
    connection: StorefrontConnection,
    issued: AtomicU64,
    current: RwLock<CachedOrder>,
}

impl RemoteOrderManager {
    pub fn new(connection: StorefrontConnection) -> Self {
        RemoteOrderManager {
            connection,
            issued: AtomicU64::new(0),
            current: RwLock::new(CachedOrder::default()),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Caches `order` unless a later-issued call already stored its result.
    fn store(&self, sequence: u64, order: &Option<ActiveOrder>) {
        if let Ok(mut current) = self.current.write() {
            if sequence < current.sequence {
                debug!(sequence, latest = current.sequence, "Dropping outdated order response");
                return;
            }
            current.sequence = sequence;
            current.order = order.clone();
        }
    }
}

#[async_trait]
impl OrderManager for RemoteOrderManager {
    async fn refresh(&self) -> ShellResult<Option<ActiveOrder>> {
        let sequence = self.next_sequence();
        let url = self.connection.endpoint("api/active-order")?;
        let order: Option<ActiveOrder> = self.connection.get_json(url).await?;

        debug!(quantity = order.as_ref().map_or(0, |o| o.total_quantity), "Active order refreshed");
        self.store(sequence, &order);
        Ok(order)
    }

    async fn switch_channel(&self, token: &str) -> ShellResult<Option<ActiveOrder>> {
        let sequence = self.next_sequence();
        let url = self.connection.endpoint("api/channel")?;
        let order: Option<ActiveOrder> = self
            .connection
            .post_json(url, &ChannelSwitch { token })
            .await?;

        debug!(token = %token, "Channel switched");
        self.store(sequence, &order);
        Ok(order)
    }

    fn active_order(&self) -> Option<ActiveOrder> {
        self.current.read().ok().and_then(|c| c.order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use url::Url;

    async fn connection(app: Router) -> StorefrontConnection {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let base = Url::parse(&format!("http://{}/", addr)).unwrap();
        StorefrontConnection::new(base, Duration::from_secs(2)).unwrap()
    }

    fn order_json(quantity: i64) -> Value {
        json!({
            "id": "1", "code": "XK2P", "state": "AddingItems", "active": true,
            "totalQuantity": quantity, "subTotalWithTax": 1000, "totalWithTax": 1000,
            "currencyCode": "EUR", "updatedAt": "2024-05-01T12:00:00Z", "lines": []
        })
    }

    #[tokio::test]
    async fn test_refresh_stores_order() {
        let app = Router::new().route(
            "/api/active-order",
            get(|| async { Json(order_json(3)) }),
        );
        let manager = RemoteOrderManager::new(connection(app).await);

        assert!(manager.active_order().is_none());
        let order = manager.refresh().await.unwrap().unwrap();
        assert_eq!(order.total_quantity, 3);
        assert_eq!(manager.active_order().unwrap().total_quantity, 3);
    }

    #[tokio::test]
    async fn test_refresh_with_no_order() {
        let app = Router::new().route("/api/active-order", get(|| async { Json(Value::Null) }));
        let manager = RemoteOrderManager::new(connection(app).await);

        assert!(manager.refresh().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_switch_channel_posts_token() {
        let app = Router::new().route(
            "/api/channel",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["token"], "eu");
                Json(order_json(1))
            }),
        );
        let manager = RemoteOrderManager::new(connection(app).await);

        let order = manager.switch_channel("eu").await.unwrap();
        assert_eq!(order.unwrap().total_quantity, 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_order() {
        let app = Router::new()
            .route("/api/channel", post(|| async { Json(order_json(2)) }))
            .route(
                "/api/active-order",
                get(|| async { StatusCode::BAD_GATEWAY }),
            );
        let manager = RemoteOrderManager::new(connection(app).await);

        manager.switch_channel("eu").await.unwrap();
        let err = manager.refresh().await.unwrap_err();
        assert!(matches!(err, ShellError::Remote { .. }));
        assert_eq!(manager.active_order().unwrap().total_quantity, 2);
    }

    #[tokio::test]
    async fn test_slow_refresh_does_not_overwrite_newer_switch() {
        let app = Router::new()
            .route(
                "/api/active-order",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    Json(order_json(1))
                }),
            )
            .route("/api/channel", post(|| async { Json(order_json(5)) }));
        let manager = Arc::new(RemoteOrderManager::new(connection(app).await));

        let refresh = tokio::spawn({
            let manager = manager.clone();
            async move { manager.refresh().await }
        });
        // Let the refresh take its sequence number before the switch is issued
        tokio::time::sleep(Duration::from_millis(50)).await;

        manager.switch_channel("eu").await.unwrap();
        assert_eq!(manager.active_order().unwrap().total_quantity, 5);

        let stale = refresh.await.unwrap().unwrap();
        assert_eq!(stale.unwrap().total_quantity, 1);
        assert_eq!(manager.active_order().unwrap().total_quantity, 5);
    }
}
