//! # storefront-shell: Session Composition and Client Shell
//!
//! This crate builds the per-request Session Context on the server and
//! drives the shell state the client holds between navigations.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Storefront Shell                               │
//! │                                                                         │
//! │   PAGE REQUEST (server)                 BROWSER (client)               │
//! │   ─────────────────────                 ────────────────               │
//! │   ┌───────────────────┐   JSON Session  ┌──────────────────────────┐   │
//! │   │  ShellComposer    │ ──Context────►  │  ShellClient             │   │
//! │   │  (composer.rs)    │   + Set-Cookie  │  (client.rs)             │   │
//! │   └─────────┬─────────┘                 │  reuse / recompute       │   │
//! │             │                           │  order refresh, geo once │   │
//! │   ┌─────────▼─────────┐                 └───┬───────────┬──────────┘   │
//! │   │  SessionStore     │                     │           │              │
//! │   │  (session.rs)     │        ┌────────────▼───┐  ┌────▼───────────┐  │
//! │   └─────────┬─────────┘        │ OrderManager   │  │ GeoLocator     │  │
//! │             │                  │ (order.rs)     │  │ (geolocation)  │  │
//! │   ┌─────────▼─────────┐        └────────────────┘  └────────────────┘  │
//! │   │  ShopApi          │                                                │
//! │   │  (backend crate)  │        StorefrontConfig (config.rs)            │
//! │   └───────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - TOML + environment configuration
//! - [`session`] - Signed cookie session
//! - [`composer`] - Session Context composition
//! - [`client`] - Client shell: navigation, refresh coupling, geolocation
//! - [`order`] - Order management collaborator
//! - [`geolocation`] - IP geolocation lookup
//! - [`remote`] - Cookie-keeping connection to the storefront server
//! - [`error`] - Shell error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod composer;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod order;
pub mod remote;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{
    BootTasks, ContextLoader, Navigated, NavigationOutcome, RemoteContextLoader, ShellClient,
    ShellDeps,
};
pub use composer::{ComposedContext, OrderUpdate, PageRequest, ShellComposer};
pub use config::StorefrontConfig;
pub use error::{ShellError, ShellResult};
pub use geolocation::{GeoLocator, IpApiLocator};
pub use order::{OrderManager, RemoteOrderManager};
pub use remote::StorefrontConnection;
pub use session::{Session, SessionData, SessionStore};
