//! # Money Module
//!
//! Provides the `Money` type for displaying prices coming from the shop API.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The shop API reports every price in the smallest currency unit:        │
//! │                                                                         │
//! │    priceWithTax { value: 12999 }  currencyCode: "EUR"                  │
//! │                                                                         │
//! │  The storefront never computes prices (that lives server side).        │
//! │  It only carries minor units around and formats them for display:      │
//! │                                                                         │
//! │    Money(12999).format("EUR")  →  "€129.99"                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_minor(1099);
//! assert_eq!(price.format("USD"), "$10.99");
//! assert_eq!(price.format("CHF"), "CHF 10.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD/EUR).
///
/// Serializes as a bare integer, matching the shop API's price fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_minor(1099);
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(1099).major(), 10);
    /// assert_eq!(Money::from_minor(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Formats the amount for display in the given ISO 4217 currency.
    ///
    /// USD, EUR and GBP use their symbol; any other code is written as a
    /// prefix followed by a space.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(12999).format("EUR"), "€129.99");
    /// assert_eq!(Money::from_minor(-550).format("GBP"), "-£5.50");
    /// assert_eq!(Money::from_minor(500).format("sek"), "SEK 5.00");
    /// ```
    pub fn format(&self, currency_code: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let code = currency_code.trim().to_ascii_uppercase();
        let prefix = match currency_symbol(&code) {
            Some(symbol) => symbol.to_string(),
            None => format!("{} ", code),
        };
        format!(
            "{}{}{}.{:02}",
            sign,
            prefix,
            self.major().abs(),
            self.minor_part()
        )
    }
}

/// Symbol for the currencies the storefront's channels sell in.
fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display without a currency; for logs only.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
