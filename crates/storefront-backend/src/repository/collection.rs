//! # Collection Repository
//!
//! Reads the catalog collection tree. The tree contains the synthetic root
//! and nested categories; filtering down to top-level categories is left to
//! `storefront_core::top_level_collections`.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{CallContext, GraphqlClient};
use crate::error::BackendResult;
use storefront_core::Collection;

const OPERATION: &str = "Collections";

const QUERY: &str = r#"
query Collections($options: CollectionListOptions) {
    collections(options: $options) {
        items {
            id
            name
            slug
            parent {
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
struct CollectionsData {
    collections: CollectionList,
}

#[derive(Debug, Deserialize)]
struct CollectionList {
    items: Vec<Collection>,
}

/// Repository for catalog collections.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    client: GraphqlClient,
}

impl CollectionRepository {
    pub fn new(client: GraphqlClient) -> Self {
        CollectionRepository { client }
    }

    /// Lists every collection, in backend order.
    pub async fn list(&self, ctx: &CallContext) -> BackendResult<Vec<Collection>> {
        let reply = self
            .client
            .execute::<CollectionsData>(ctx, OPERATION, QUERY, json!({ "options": {} }))
            .await?;

        let items = reply.data.collections.items;
        debug!(count = items.len(), "Fetched collections");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BackendConfig;
    use crate::testing::{spawn_fake_shop, FakeReply};

    #[tokio::test]
    async fn test_list_decodes_tree() {
        let shop = spawn_fake_shop(|_| {
            FakeReply::ok(json!({
                "collections": { "items": [
                    { "id": "1", "name": "__root_collection__", "slug": "root", "parent": null },
                    { "id": "2", "name": "Electronics", "slug": "electronics",
                      "parent": { "name": "__root_collection__" },
                      "featuredAsset": { "id": "a", "preview": "https://cdn.example/e.png" } },
                    { "id": "3", "name": "Boards", "slug": "boards", "parent": { "name": "Electronics" } }
                ]}
            }))
        })
        .await;

        let repo = CollectionRepository::new(GraphqlClient::new(&BackendConfig::default()).unwrap());
        let collections = repo.list(&CallContext::new(shop.url.clone())).await.unwrap();

        assert_eq!(collections.len(), 3);
        assert!(collections[1].is_top_level());
        assert_eq!(
            collections[1].featured_asset.as_ref().map(|a| a.preview.as_str()),
            Some("https://cdn.example/e.png")
        );
        assert_eq!(shop.requests()[0].operation, "Collections");
    }
}
