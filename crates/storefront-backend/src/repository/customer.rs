//! # Customer Repository
//!
//! Resolves the signed-in customer for the auth token in the call context.
//! The shop API answers `activeCustomer: null` for anonymous visitors and
//! expired tokens alike; both are a successful lookup with no customer.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{CallContext, GraphqlClient};
use crate::error::BackendResult;
use storefront_core::Customer;

const OPERATION: &str = "ActiveCustomer";

const QUERY: &str = r#"
query ActiveCustomer {
    activeCustomer {
        id
        firstName
        lastName
        emailAddress
    }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveCustomerData {
    active_customer: Option<Customer>,
}

/// Result of an identity lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerLookup {
    /// `None` for anonymous visitors.
    pub customer: Option<Customer>,
    /// New auth token issued by the shop API, to be written back into the
    /// session cookie.
    pub refreshed_auth_token: Option<String>,
}

impl CustomerLookup {
    /// An anonymous visitor with nothing to write back.
    pub fn anonymous() -> Self {
        CustomerLookup {
            customer: None,
            refreshed_auth_token: None,
        }
    }
}

/// Repository for the active customer.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    client: GraphqlClient,
}

impl CustomerRepository {
    pub fn new(client: GraphqlClient) -> Self {
        CustomerRepository { client }
    }

    /// Looks up the customer behind `ctx.auth_token`.
    pub async fn active(&self, ctx: &CallContext) -> BackendResult<CustomerLookup> {
        let reply = self
            .client
            .execute::<ActiveCustomerData>(ctx, OPERATION, QUERY, json!({}))
            .await?;

        let customer = reply.data.active_customer;
        debug!(
            signed_in = customer.is_some(),
            token_refreshed = reply.auth_token.is_some(),
            "Resolved active customer"
        );

        Ok(CustomerLookup {
            customer,
            refreshed_auth_token: reply.auth_token,
        })
    }
}
