//! # Channel Repository
//!
//! Resolves the channel selected by the `vendure-token` header of the call.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{CallContext, GraphqlClient};
use crate::error::BackendResult;
use storefront_core::Channel;

const OPERATION: &str = "ActiveChannel";

const QUERY: &str = r#"
query ActiveChannel {
    activeChannel {
        id
        code
        token
        currencyCode
        defaultLanguageCode
        pricesIncludeTax
    }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveChannelData {
    active_channel: Channel,
}

/// Repository for the active channel.
#[derive(Debug, Clone)]
pub struct ChannelRepository {
    client: GraphqlClient,
}

impl ChannelRepository {
    pub fn new(client: GraphqlClient) -> Self {
        ChannelRepository { client }
    }

    pub async fn active(&self, ctx: &CallContext) -> BackendResult<Channel> {
        let reply = self
            .client
            .execute::<ActiveChannelData>(ctx, OPERATION, QUERY, json!({}))
            .await?;

        let channel = reply.data.active_channel;
        debug!(token = %channel.token, currency = %channel.currency_code, "Resolved active channel");
        Ok(channel)
    }
}
