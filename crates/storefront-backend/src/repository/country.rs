//! # Country Repository
//!
//! Countries that checkout accepts in the active channel.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{CallContext, GraphqlClient};
use crate::error::BackendResult;
use storefront_core::Country;

const OPERATION: &str = "AvailableCountries";

const QUERY: &str = r#"
query AvailableCountries {
    availableCountries {
        id
        code
        name
    }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailableCountriesData {
    available_countries: Vec<Country>,
}

/// Repository for checkout countries.
#[derive(Debug, Clone)]
pub struct CountryRepository {
    client: GraphqlClient,
}

impl CountryRepository {
    pub fn new(client: GraphqlClient) -> Self {
        CountryRepository { client }
    }

    pub async fn available(&self, ctx: &CallContext) -> BackendResult<Vec<Country>> {
        let reply = self
            .client
            .execute::<AvailableCountriesData>(ctx, OPERATION, QUERY, json!({}))
            .await?;

        let countries = reply.data.available_countries;
        debug!(count = countries.len(), "Fetched available countries");
        Ok(countries)
    }
}
