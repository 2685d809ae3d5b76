//! # Navigation Reuse Rules
//!
//! Decides, before each client-side navigation, whether the Session Context
//! of the previous page may be reused or must be composed again.
//!
//! ## Rule Table (first match wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  #  Rule           Condition                              Decision      │
//! │  ─  ─────────────  ─────────────────────────────────────  ──────────    │
//! │  1  AfterSignIn    prev = /sign-in                        recompute     │
//! │  2  AfterSignOut   prev = /account  and  next = /         recompute     │
//! │  3  AfterPayment   submission action = /checkout/payment  recompute     │
//! │  -  (none)                                                reuse         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only pathnames are compared: query strings and fragments are stripped, and
//! a trailing slash is ignored (except for the root path itself). The rules
//! are pure; nothing here performs I/O.
//!
//! ## Usage
//! ```rust
//! use storefront_core::navigation::{decide, should_reuse, ReloadRule, ReuseDecision, Submission};
//!
//! assert!(should_reuse("/products/x", "/products/y", None));
//! assert!(!should_reuse("/sign-in", "/account", None));
//!
//! let payment = Submission::post("/checkout/payment");
//! assert_eq!(
//!     decide("/checkout", "/checkout/confirmation", Some(&payment)),
//!     ReuseDecision::Recompute(ReloadRule::AfterPayment)
//! );
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ACCOUNT_PATH, HOME_PATH, PAYMENT_ACTION_PATH, SIGN_IN_PATH};

/// Base used to resolve relative URLs into pathnames.
const PATH_BASE: &str = "http://storefront.local/";

// =============================================================================
// Inputs
// =============================================================================

/// A pending form submission that triggers the navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Target of the form (path or absolute URL).
    pub action: String,
    /// HTTP method of the form, upper-case.
    pub method: String,
}

impl Submission {
    /// A POST submission to `action`.
    pub fn post(action: impl Into<String>) -> Self {
        Submission {
            action: action.into(),
            method: "POST".to_string(),
        }
    }
}

/// A navigation reduced to the pathnames the rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub prev_path: String,
    pub next_path: String,
    pub submission_path: Option<String>,
}

impl Navigation {
    pub fn new(prev_url: &str, next_url: &str, submission: Option<&Submission>) -> Self {
        Navigation {
            prev_path: pathname(prev_url),
            next_path: pathname(next_url),
            submission_path: submission.map(|s| pathname(&s.action)),
        }
    }
}

/// Extracts the normalized pathname of an absolute or relative URL.
///
/// ## Example
/// ```rust
/// use storefront_core::navigation::pathname;
///
/// assert_eq!(pathname("https://shop.example/account/?tab=orders"), "/account");
/// assert_eq!(pathname("/sign-in#form"), "/sign-in");
/// assert_eq!(pathname(""), "/");
/// ```
pub fn pathname(url: &str) -> String {
    let raw = Url::parse(PATH_BASE)
        .and_then(|base| base.join(url.trim()))
        .map(|resolved| resolved.path().to_string())
        .unwrap_or_else(|_| {
            // Unresolvable input: fall back to everything before ? or #
            url.split(['?', '#']).next().unwrap_or_default().to_string()
        });

    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        HOME_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

// =============================================================================
// Rules
// =============================================================================

/// A named condition that forces the Session Context to be recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadRule {
    /// Leaving the sign-in page: the visitor may have just authenticated.
    AfterSignIn,
    /// Account page to home page: the visitor may have just signed out.
    AfterSignOut,
    /// A payment was submitted: order state changed.
    AfterPayment,
}

impl ReloadRule {
    /// All rules in evaluation order.
    pub const PRIORITY: [ReloadRule; 3] = [
        ReloadRule::AfterSignIn,
        ReloadRule::AfterSignOut,
        ReloadRule::AfterPayment,
    ];

    /// Returns true if this rule's condition holds for the navigation.
    pub fn applies(&self, nav: &Navigation) -> bool {
        match self {
            ReloadRule::AfterSignIn => nav.prev_path == SIGN_IN_PATH,
            ReloadRule::AfterSignOut => {
                nav.prev_path == ACCOUNT_PATH && nav.next_path == HOME_PATH
            }
            ReloadRule::AfterPayment => {
                nav.submission_path.as_deref() == Some(PAYMENT_ACTION_PATH)
            }
        }
    }

    /// Short description for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            ReloadRule::AfterSignIn => "just signed in",
            ReloadRule::AfterSignOut => "just signed out",
            ReloadRule::AfterPayment => "submitted payment for order",
        }
    }
}

impl std::fmt::Display for ReloadRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReloadRule::AfterSignIn => write!(f, "after_sign_in"),
            ReloadRule::AfterSignOut => write!(f, "after_sign_out"),
            ReloadRule::AfterPayment => write!(f, "after_payment"),
        }
    }
}

// =============================================================================
// Decision
// =============================================================================

/// Outcome of the reuse check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReuseDecision {
    /// Keep the previous Session Context unchanged.
    Reuse,
    /// Compose a new Session Context; carries the rule that fired.
    Recompute(ReloadRule),
}

impl ReuseDecision {
    pub fn is_reuse(&self) -> bool {
        matches!(self, ReuseDecision::Reuse)
    }
}

/// Evaluates the rule table for a navigation.
pub fn decide(prev_url: &str, next_url: &str, submission: Option<&Submission>) -> ReuseDecision {
    let nav = Navigation::new(prev_url, next_url, submission);
    ReloadRule::PRIORITY
        .iter()
        .copied()
        .find(|rule| rule.applies(&nav))
        .map_or(ReuseDecision::Reuse, ReuseDecision::Recompute)
}

/// True if the previous Session Context may be reused.
pub fn should_reuse(prev_url: &str, next_url: &str, submission: Option<&Submission>) -> bool {
    decide(prev_url, next_url, submission).is_reuse()
}

// =============================================================================
// Unit Tests
// =============================================================================
