//! # Storefront Server Connection
//!
//! HTTP connection from the client shell to the storefront server. It keeps
//! the session cookie between calls, the way a browser would, so context
//! loads and order calls see the same session.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{ShellError, ShellResult};

/// Cookie-keeping HTTP client bound to one storefront server. Cheap to clone;
/// clones share the cookie jar.
#[derive(Debug, Clone)]
pub struct StorefrontConnection {
    http: reqwest::Client,
    base_url: Url,
}

impl StorefrontConnection {
    /// Connection to the server mounted at `base_url`.
    ///
    /// Endpoints are resolved relative to `base_url`, so a server mounted
    /// under a prefix keeps it: `http://host/shop/` calls
    /// `http://host/shop/api/root`. A missing trailing slash is added.
    pub fn new(mut base_url: Url, timeout: Duration) -> ShellResult<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ShellError::InvalidConfig(e.to_string()))?;

        Ok(StorefrontConnection { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` below the base URL; a leading `/` is ignored.
    pub(crate) fn endpoint(&self, path: &str) -> ShellResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ShellResult<T> {
        debug!(url = %url, "GET storefront server");
        let response = self.http.get(url.clone()).send().await;
        Self::decode(url, response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> ShellResult<T> {
        debug!(url = %url, "POST storefront server");
        let response = self.http.post(url.clone()).json(body).send().await;
        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(
        url: Url,
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> ShellResult<T> {
        let remote = |e: reqwest::Error| ShellError::Remote {
            endpoint: url.path().to_string(),
            message: e.to_string(),
        };

        response
            .and_then(|r| r.error_for_status())
            .map_err(remote)?
            .json::<T>()
            .await
            .map_err(remote)
    }
}
