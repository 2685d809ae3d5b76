//! # Shop API Seam
//!
//! [`ShopApi`] is the seam between the shell and the commerce backend. The
//! composer and the server depend on the trait, so tests substitute fakes
//! and production uses [`ShopBackend`].
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────────────────┐
//! │  ShellComposer       │        │  ShopBackend                         │
//! │  storefront-server   │──dyn──►│  ├── CollectionRepository            │
//! │                      │ShopApi │  ├── CustomerRepository              │
//! └──────────────────────┘        │  ├── ChannelRepository               │
//!                                 │  ├── CountryRepository               │
//!                                 │  └── OrderRepository                 │
//!                                 └──────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::client::{BackendConfig, CallContext, GraphqlClient};
use crate::error::BackendResult;
use crate::repository::{
    ChannelRepository, CollectionRepository, CountryRepository, CustomerLookup,
    CustomerRepository, OrderRepository,
};
use storefront_core::{ActiveOrder, Channel, Collection, Country};

/// Read operations the storefront shell needs from the shop API.
///
/// Implementations perform no retries and keep no per-visitor state; every
/// call is fully described by its [`CallContext`].
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Full collection tree, in backend order.
    async fn collections(&self, ctx: &CallContext) -> BackendResult<Vec<Collection>>;

    /// Customer behind the call's auth token, plus any refreshed token.
    async fn active_customer(&self, ctx: &CallContext) -> BackendResult<CustomerLookup>;

    /// Channel selected by the call's channel token.
    async fn active_channel(&self, ctx: &CallContext) -> BackendResult<Channel>;

    /// Countries valid for checkout in the call's channel.
    async fn available_countries(&self, ctx: &CallContext) -> BackendResult<Vec<Country>>;

    /// The visitor's cart, if any.
    async fn active_order(&self, ctx: &CallContext) -> BackendResult<Option<ActiveOrder>>;
}

/// Production [`ShopApi`] over GraphQL.
#[derive(Debug, Clone)]
pub struct ShopBackend {
    client: GraphqlClient,
}

impl ShopBackend {
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        Ok(ShopBackend {
            client: GraphqlClient::new(config)?,
        })
    }

    pub fn catalog(&self) -> CollectionRepository {
        CollectionRepository::new(self.client.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.client.clone())
    }

    pub fn channels(&self) -> ChannelRepository {
        ChannelRepository::new(self.client.clone())
    }

    pub fn countries(&self) -> CountryRepository {
        CountryRepository::new(self.client.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.client.clone())
    }
}

#[async_trait]
impl ShopApi for ShopBackend {
    async fn collections(&self, ctx: &CallContext) -> BackendResult<Vec<Collection>> {
        self.catalog().list(ctx).await
    }

    async fn active_customer(&self, ctx: &CallContext) -> BackendResult<CustomerLookup> {
        self.customers().active(ctx).await
    }

    async fn active_channel(&self, ctx: &CallContext) -> BackendResult<Channel> {
        self.channels().active(ctx).await
    }

    async fn available_countries(&self, ctx: &CallContext) -> BackendResult<Vec<Country>> {
        self.countries().available(ctx).await
    }

    async fn active_order(&self, ctx: &CallContext) -> BackendResult<Option<ActiveOrder>> {
        self.orders().active(ctx).await
    }
}
