//! # Domain Types
//!
//! Core domain types used throughout the storefront shell.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session Context                                 │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ activeCustomer  │   │  activeChannel  │   │   collections   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Option<        │   │  token          │   │  top-level only │       │
//! │  │    Customer>    │   │  currencyCode   │   │  (children of   │       │
//! │  │  None = guest   │   │  languageCode   │   │   the root)     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌───────────────────────┐                        │
//! │  │   countries     │   │ sessionChannelChanged │                        │
//! │  │  valid for      │   │ explicit choice made? │                        │
//! │  │  checkout       │   │                       │                        │
//! │  └─────────────────┘   └───────────────────────┘                        │
//! │                                                                         │
//! │  Held separately (client side):  ActiveOrder (the cart)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All types use camelCase JSON so the same structs deserialize from the shop
//! API and serialize to the rendering tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::ROOT_COLLECTION_NAME;

// =============================================================================
// Customer
// =============================================================================

/// A signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl Customer {
    /// Full name for greetings.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// =============================================================================
// Channel
// =============================================================================

/// A sales-region configuration, identified by its token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub code: String,
    /// Token sent as `vendure-token` to select this channel.
    pub token: String,
    pub currency_code: String,
    pub default_language_code: String,
    #[serde(default)]
    pub prices_include_tax: bool,
}

// =============================================================================
// Collection
// =============================================================================

/// Image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub preview: String,
}

/// The parent of a collection, as much of it as the shell needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CollectionParent {
    pub name: String,
}

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent: Option<CollectionParent>,
    #[serde(default)]
    pub featured_asset: Option<Asset>,
}

impl Collection {
    /// True when this collection hangs directly off the synthetic root.
    pub fn is_top_level(&self) -> bool {
        self.parent
            .as_ref()
            .is_some_and(|parent| parent.name == ROOT_COLLECTION_NAME)
    }
}

/// Keeps the direct children of the synthetic root, in backend order.
///
/// The root itself has no parent and deeper collections have a real
/// category as parent; both are dropped.
pub fn top_level_collections(all: Vec<Collection>) -> Vec<Collection> {
    all.into_iter().filter(Collection::is_top_level).collect()
}

// =============================================================================
// Country
// =============================================================================

/// A country valid for checkout in the active channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub code: String,
    pub name: String,
}

// =============================================================================
// Session Context
// =============================================================================

/// Immutable per-request snapshot of identity, channel, top-level categories
/// and checkout countries.
///
/// ## Invariant
/// Exactly one Session Context exists per rendered page. It has no mutating
/// methods: a channel switch, sign-in or sign-out produces a new snapshot via
/// composition. The client shell keeps it behind an `Arc` and swaps the `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub active_customer: Option<Customer>,
    pub active_channel: Channel,
    pub collections: Vec<Collection>,
    pub countries: Vec<Country>,
    pub session_channel_changed: bool,
}

impl SessionContext {
    /// True when a customer is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.active_customer
            .as_ref()
            .is_some_and(|customer| !customer.id.is_empty())
    }

    /// Token of the channel this page was rendered for.
    pub fn channel_token(&self) -> &str {
        &self.active_channel.token
    }
}

// =============================================================================
// Active Order
// =============================================================================

/// Variant reference on an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantRef {
    pub id: String,
    pub name: String,
}

/// A line in the active order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: String,
    #[ts(type = "number")]
    pub quantity: i64,
    pub line_price_with_tax: Money,
    pub product_variant: ProductVariantRef,
    #[serde(default)]
    pub featured_asset: Option<Asset>,
}

/// The visitor's current cart. Held outside the Session Context and
/// refreshed independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOrder {
    pub id: String,
    pub code: String,
    pub state: String,
    pub active: bool,
    #[ts(type = "number")]
    pub total_quantity: i64,
    pub sub_total_with_tax: Money,
    pub total_with_tax: Money,
    pub currency_code: String,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

// =============================================================================
// Search Result (product card source)
// =============================================================================

/// Price of a search hit: a single value, or a range across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum PriceWithTax {
    Single { value: Money },
    Range { min: Money, max: Money },
}

/// One product in a search listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub product_name: String,
    pub slug: String,
    #[serde(default)]
    pub product_asset: Option<Asset>,
    pub price_with_tax: PriceWithTax,
    pub currency_code: String,
}

// =============================================================================
// Geolocation
// =============================================================================

/// Reply of the geolocation service for the caller's IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub in_eu: bool,
}

impl GeoLocation {
    /// Channel to default to for this location, if any.
    pub fn default_channel<'a>(&self, eu_channel_token: &'a str) -> Option<&'a str> {
        self.in_eu.then_some(eu_channel_token)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
