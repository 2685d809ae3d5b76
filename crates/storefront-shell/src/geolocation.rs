//! # Geolocation
//!
//! Looks up the visitor's region from their IP so first-time visitors in
//! the EU land on the EU channel. One unauthenticated GET, short timeout,
//! no retry. Callers treat every failure as "no opinion".

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::GeolocationSettings;
use crate::error::{ShellError, ShellResult};
use storefront_core::GeoLocation;

/// Source of the visitor's approximate location.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self) -> ShellResult<GeoLocation>;
}

/// [`GeoLocator`] backed by an ipapi.co-compatible JSON endpoint.
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    http: reqwest::Client,
    url: Url,
}

impl IpApiLocator {
    pub fn new(settings: &GeolocationSettings) -> ShellResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| ShellError::InvalidConfig(e.to_string()))?;

        Ok(IpApiLocator {
            http,
            url: Url::parse(&settings.url)?,
        })
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn locate(&self) -> ShellResult<GeoLocation> {
        let location = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ShellError::Geolocation(e.to_string()))?
            .json::<GeoLocation>()
            .await
            .map_err(|e| ShellError::Geolocation(e.to_string()))?;

        debug!(country = ?location.country, in_eu = location.in_eu, "Geolocated visitor");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/json/", addr)
    }

    fn settings(url: String) -> GeolocationSettings {
        GeolocationSettings {
            enabled: true,
            url,
            timeout_ms: 2000,
        }
    }

    #[tokio::test]
    async fn test_locate_parses_reply() {
        let url = serve(Router::new().route(
            "/json/",
            get(|| async { Json(json!({ "ip": "1.2.3.4", "country": "DE", "in_eu": true })) }),
        ))
        .await;

        let location = IpApiLocator::new(&settings(url)).unwrap().locate().await.unwrap();
        assert_eq!(location.country.as_deref(), Some("DE"));
        assert!(location.in_eu);
    }

    #[tokio::test]
    async fn test_locate_rate_limited_is_error() {
        let url = serve(Router::new().route(
            "/json/",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        ))
        .await;

        let err = IpApiLocator::new(&settings(url)).unwrap().locate().await.unwrap_err();
        assert!(matches!(err, ShellError::Geolocation(_)));
    }

    #[tokio::test]
    async fn test_locate_non_json_is_error() {
        let url = serve(Router::new().route("/json/", get(|| async { "<html>" }))).await;

        let err = IpApiLocator::new(&settings(url)).unwrap().locate().await.unwrap_err();
        assert!(matches!(err, ShellError::Geolocation(_)));
    }
}
