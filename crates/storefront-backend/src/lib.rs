//! # storefront-backend: Shop API Access
//!
//! This crate talks to the headless commerce backend's GraphQL shop API.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Data Flow                               │
//! │                                                                         │
//! │  Shell State Composer / storefront-server                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                storefront-backend (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   ShopApi     │    │ Repositories  │    │ GraphqlClient│   │   │
//! │  │   │   (api.rs)    │    │ (repository/) │    │ (client.rs)  │   │   │
//! │  │   │               │    │               │    │              │   │   │
//! │  │   │ trait seam    │───►│ Collection    │───►│ envelope     │   │   │
//! │  │   │ ShopBackend   │    │ Customer ...  │    │ headers      │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   Shop API  (per-request endpoint, e.g. https://host/shop-api)  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`client`] - GraphQL envelope, headers, per-call context
//! - [`repository`] - One repository per entity
//! - [`api`] - The [`ShopApi`] trait and its production implementation
//! - [`error`] - Backend error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_backend::{BackendConfig, CallContext, ShopApi, ShopBackend};
//!
//! let backend = ShopBackend::new(&BackendConfig::default())?;
//! let ctx = CallContext::new(api_url).with_channel("eu");
//! let channel = backend.active_channel(&ctx).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod client;
pub mod error;
pub mod repository;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{ShopApi, ShopBackend};
pub use client::{
    BackendConfig, CallContext, GraphqlClient, GraphqlReply, AUTH_TOKEN_HEADER,
    CHANNEL_TOKEN_HEADER,
};
pub use error::{BackendError, BackendResult};
pub use repository::CustomerLookup;
