//! # storefront-core: Pure Domain Logic for the Storefront Shell
//!
//! This crate holds the domain model of the storefront shell as plain types
//! and pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Rendering tree (header, cards, cart)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON (camelCase)                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            storefront-server  /  storefront-shell               │   │
//! │  │     compose_context, ShellClient, session cookie, geolocation   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐   │   │
//! │  │   │   types   │  │   money   │  │ navigation │  │   view   │   │   │
//! │  │   │ Session-  │  │  Money    │  │ ReloadRule │  │ Header-  │   │   │
//! │  │   │  Context  │  │  format   │  │ decide()   │  │  View    │   │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Session Context and the shop entities it is built from
//! - [`money`] - Minor-unit money with currency display
//! - [`navigation`] - Reuse/recompute rules for client-side navigations
//! - [`view`] - Header and product card view models
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod navigation;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use navigation::{decide, should_reuse, ReloadRule, ReuseDecision, Submission};
pub use types::*;
pub use view::{HeaderView, ProductCardView};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name of the synthetic, invisible collection whose children are the real
/// top-level categories.
pub const ROOT_COLLECTION_NAME: &str = "__root_collection__";

/// Channel token used when the visitor made no explicit choice.
pub const DEFAULT_CHANNEL_TOKEN: &str = "__default_channel__";

/// Channel selected for first-time visitors located in the EU.
pub const EU_CHANNEL_TOKEN: &str = "eu";

/// Sign-in page.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Account page.
pub const ACCOUNT_PATH: &str = "/account";

/// Home page.
pub const HOME_PATH: &str = "/";

/// Form action that submits a payment for the active order.
pub const PAYMENT_ACTION_PATH: &str = "/checkout/payment";
