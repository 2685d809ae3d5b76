//! # View Models
//!
//! Plain data derived from the Session Context and the active order for the
//! page header and product cards. The rendering tree only lays these out.

use serde::Serialize;
use ts_rs::TS;

use crate::types::{ActiveOrder, PriceWithTax, SearchResultItem, SessionContext};
use crate::{ACCOUNT_PATH, SIGN_IN_PATH};

// =============================================================================
// Header
// =============================================================================

/// Everything the page header shows that depends on state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub is_signed_in: bool,
    /// `/account` when signed in, `/sign-in` otherwise.
    pub account_link: String,
    pub account_label: String,
    /// Channel currently selected in the channel switcher.
    pub active_channel_token: String,
    #[ts(type = "number")]
    pub cart_quantity: i64,
    /// Badge text on the cart icon; absent for an empty cart.
    pub cart_badge: Option<String>,
    pub cart_tray_open: bool,
}

impl HeaderView {
    /// Builds the header from the page snapshot and client-held state.
    pub fn build(
        context: &SessionContext,
        active_order: Option<&ActiveOrder>,
        active_channel_token: &str,
        cart_tray_open: bool,
    ) -> Self {
        let is_signed_in = context.is_signed_in();
        let cart_quantity = active_order.map_or(0, |order| order.total_quantity);

        HeaderView {
            is_signed_in,
            account_link: if is_signed_in { ACCOUNT_PATH } else { SIGN_IN_PATH }.to_string(),
            account_label: if is_signed_in { "My Account" } else { "Sign In" }.to_string(),
            active_channel_token: active_channel_token.to_string(),
            cart_quantity,
            cart_badge: (cart_quantity > 0).then(|| cart_quantity.to_string()),
            cart_tray_open,
        }
    }
}

// =============================================================================
// Product Card
// =============================================================================

/// A product tile in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductCardView {
    pub href: String,
    pub name: String,
    pub image: Option<String>,
    pub price: String,
}

impl From<&SearchResultItem> for ProductCardView {
    fn from(item: &SearchResultItem) -> Self {
        ProductCardView {
            href: format!("/products/{}", item.slug),
            name: item.product_name.clone(),
            image: item.product_asset.as_ref().map(|asset| asset.preview.clone()),
            price: format_price(&item.price_with_tax, &item.currency_code),
        }
    }
}

/// Formats a single price, or a range as `"min - max"`.
///
/// A range whose bounds are equal collapses to one amount.
pub fn format_price(price: &PriceWithTax, currency_code: &str) -> String {
    match price {
        PriceWithTax::Single { value } => value.format(currency_code),
        PriceWithTax::Range { min, max } if min == max => min.format(currency_code),
        PriceWithTax::Range { min, max } => format!(
            "{} - {}",
            min.format(currency_code),
            max.format(currency_code)
        ),
    }
}
