//! # Order Repository
//!
//! Reads the visitor's active order (the cart). Used by the order endpoints
//! of the storefront server, never by Session Context composition.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{CallContext, GraphqlClient};
use crate::error::BackendResult;
use storefront_core::ActiveOrder;

const OPERATION: &str = "ActiveOrder";

const QUERY: &str = r#"
query ActiveOrder {
    activeOrder {
        id
        code
        state
        active
        totalQuantity
        subTotalWithTax
        totalWithTax
        currencyCode
        updatedAt
        lines {
            id
            quantity
            linePriceWithTax
            productVariant {
                id
                name
            }
            featuredAsset {
                id
                preview
            }
        }
    }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveOrderData {
    active_order: Option<ActiveOrder>,
}

/// Repository for the active order.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    client: GraphqlClient,
}

impl OrderRepository {
    pub fn new(client: GraphqlClient) -> Self {
        OrderRepository { client }
    }

    /// Returns the active order, or `None` when the visitor has no cart yet.
    pub async fn active(&self, ctx: &CallContext) -> BackendResult<Option<ActiveOrder>> {
        let reply = self
            .client
            .execute::<ActiveOrderData>(ctx, OPERATION, QUERY, json!({}))
            .await?;

        let order = reply.data.active_order;
        debug!(
            code = order.as_ref().map(|o| o.code.as_str()).unwrap_or("-"),
            quantity = order.as_ref().map_or(0, |o| o.total_quantity),
            "Fetched active order"
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BackendConfig;
    use crate::testing::{spawn_fake_shop, FakeReply};
    use storefront_core::Money;

    fn repo() -> OrderRepository {
        OrderRepository::new(GraphqlClient::new(&BackendConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_active_order_decodes_lines() {
        let shop = spawn_fake_shop(|_| {
            FakeReply::ok(json!({ "activeOrder": {
                "id": "1", "code": "XK2P", "state": "AddingItems", "active": true,
                "totalQuantity": 2, "subTotalWithTax": 9800, "totalWithTax": 9800,
                "currencyCode": "EUR", "updatedAt": "2024-05-01T12:00:00.000Z",
                "lines": [{
                    "id": "10", "quantity": 2, "linePriceWithTax": 9800,
                    "productVariant": { "id": "v1", "name": "FPGA Board" },
                    "featuredAsset": null
                }]
            }}))
        })
        .await;

        let order = repo()
            .active(&CallContext::new(shop.url.clone()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(order.total_quantity, 2);
        assert_eq!(order.total_with_tax, Money::from_minor(9800));
        assert_eq!(order.lines[0].product_variant.name, "FPGA Board");
    }

    #[tokio::test]
    async fn test_no_active_order() {
        let shop = spawn_fake_shop(|_| FakeReply::ok(json!({ "activeOrder": null }))).await;

        let order = repo().active(&CallContext::new(shop.url.clone())).await.unwrap();
        assert!(order.is_none());
    }
}
