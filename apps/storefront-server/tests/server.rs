//! End-to-end tests for the storefront router against an in-process shop API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use url::Url;

use storefront_backend::{BackendError, BackendResult, CallContext, CustomerLookup, ShopApi};
use storefront_core::{
    ActiveOrder, Channel, Collection, CollectionParent, Country, Money, ROOT_COLLECTION_NAME,
};
use storefront_server::config::parse_tenants;
use storefront_server::{build_router, AppState};
use storefront_shell::{ShellComposer, StorefrontConfig};

const DEFAULT_API_URL: &str = "https://default.example/shop-api";

// =============================================================================
// Fake shop API
// =============================================================================

#[derive(Default)]
struct FakeShop {
    fail_channel: bool,
    refreshed_token: Option<String>,
    calls: Mutex<Vec<CallContext>>,
}

impl FakeShop {
    fn record(&self, ctx: &CallContext) {
        self.calls.lock().unwrap().push(ctx.clone());
    }

    fn api_urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.api_url.to_string())
            .collect()
    }
}

#[async_trait]
impl ShopApi for FakeShop {
    async fn collections(&self, ctx: &CallContext) -> BackendResult<Vec<Collection>> {
        self.record(ctx);
        Ok(vec![
            Collection {
                id: "1".into(),
                name: ROOT_COLLECTION_NAME.into(),
                slug: "root".into(),
                parent: None,
                featured_asset: None,
            },
            Collection {
                id: "2".into(),
                name: "Electronics".into(),
                slug: "electronics".into(),
                parent: Some(CollectionParent {
                    name: ROOT_COLLECTION_NAME.into(),
                }),
                featured_asset: None,
            },
            Collection {
                id: "3".into(),
                name: "Cameras".into(),
                slug: "cameras".into(),
                parent: Some(CollectionParent {
                    name: "Electronics".into(),
                }),
                featured_asset: None,
            },
        ])
    }

    async fn active_customer(&self, ctx: &CallContext) -> BackendResult<CustomerLookup> {
        self.record(ctx);
        Ok(CustomerLookup {
            refreshed_auth_token: self.refreshed_token.clone(),
            ..CustomerLookup::anonymous()
        })
    }

    async fn active_channel(&self, ctx: &CallContext) -> BackendResult<Channel> {
        self.record(ctx);
        if self.fail_channel {
            return Err(BackendError::Http {
                operation: "activeChannel".into(),
                status: 503,
            });
        }
        let token = ctx.channel_token.clone().unwrap_or_default();
        Ok(Channel {
            id: "1".into(),
            code: token.clone(),
            token,
            currency_code: "USD".into(),
            default_language_code: "en".into(),
            prices_include_tax: false,
        })
    }

    async fn available_countries(&self, ctx: &CallContext) -> BackendResult<Vec<Country>> {
        self.record(ctx);
        Ok(vec![Country {
            id: "1".into(),
            code: "DE".into(),
            name: "Germany".into(),
        }])
    }

    async fn active_order(&self, ctx: &CallContext) -> BackendResult<Option<ActiveOrder>> {
        self.record(ctx);
        let currency = match ctx.channel_token.as_deref() {
            Some("eu") => "EUR",
            _ => "USD",
        };
        Ok(Some(ActiveOrder {
            id: "10".into(),
            code: "XK2P".into(),
            state: "AddingItems".into(),
            active: true,
            total_quantity: 2,
            sub_total_with_tax: Money::from_minor(2400),
            total_with_tax: Money::from_minor(2400),
            currency_code: currency.into(),
            updated_at: Utc::now(),
            lines: vec![],
        }))
    }
}

// =============================================================================
// Harness
// =============================================================================

fn storefront_config() -> StorefrontConfig {
    let mut config = StorefrontConfig::default();
    config.backend.api_url = DEFAULT_API_URL.into();
    config.session.secret = "integration-secret".into();
    config
}

async fn spawn_server(shop: Arc<FakeShop>, tenants: HashMap<String, Url>) -> SocketAddr {
    let composer = ShellComposer::new(shop, &storefront_config()).unwrap();
    let app = build_router(Arc::new(AppState::new(composer, tenants)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn cookie_pair(response: &reqwest::Response) -> String {
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("set-cookie header")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let addr = spawn_server(Arc::new(FakeShop::default()), HashMap::new()).await;

    let body = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_root_returns_session_context() {
    let addr = spawn_server(Arc::new(FakeShop::default()), HashMap::new()).await;

    let response = reqwest::get(format!("http://{}/api/root?path=/products/x", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().get("set-cookie").is_none());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["activeCustomer"], Value::Null);
    assert_eq!(
        body["activeChannel"]["token"],
        storefront_config().default_channel_token()
    );
    assert_eq!(body["sessionChannelChanged"], false);
    assert_eq!(body["countries"][0]["code"], "DE");

    let collections = body["collections"].as_array().unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0]["slug"], "electronics");
}

#[tokio::test]
async fn test_backend_failure_is_bad_gateway() {
    let shop = Arc::new(FakeShop {
        fail_channel: true,
        ..FakeShop::default()
    });
    let addr = spawn_server(shop, HashMap::new()).await;

    let response = reqwest::get(format!("http://{}/api/root?path=/", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "BACKEND_UNAVAILABLE");
    assert!(body.get("activeChannel").is_none());
}

#[tokio::test]
async fn test_channel_switch_persists_in_session() {
    let addr = spawn_server(Arc::new(FakeShop::default()), HashMap::new()).await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("http://{}/api/channel", addr))
        .json(&json!({ "token": "eu" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let cookie = cookie_pair(&response);

    let order: Value = response.json().await.unwrap();
    assert_eq!(order["currencyCode"], "EUR");

    let body: Value = http
        .get(format!("http://{}/api/root?path=/", addr))
        .header("cookie", cookie.as_str())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["activeChannel"]["token"], "eu");
    assert_eq!(body["sessionChannelChanged"], true);

    let order: Value = http
        .get(format!("http://{}/api/active-order", addr))
        .header("cookie", cookie.as_str())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(order["currencyCode"], "EUR");
}

#[tokio::test]
async fn test_invalid_channel_token_is_rejected() {
    let addr = spawn_server(Arc::new(FakeShop::default()), HashMap::new()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/channel", addr))
        .json(&json!({ "token": "eu; Path=/" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(response.headers().get("set-cookie").is_none());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_tenant_host_overrides_api_url() {
    let shop = Arc::new(FakeShop::default());
    let tenants = parse_tenants("eu.shop.test=https://eu.example/shop-api").unwrap();
    let addr = spawn_server(shop.clone(), tenants).await;
    let http = reqwest::Client::new();

    http.get(format!("http://{}/api/root?path=/", addr))
        .header("host", "eu.shop.test")
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let urls = shop.api_urls();
    assert_eq!(urls.len(), 4);
    assert!(urls.iter().all(|u| u == "https://eu.example/shop-api"));

    http.get(format!("http://{}/api/root?path=/", addr))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let urls = shop.api_urls();
    assert_eq!(urls.len(), 8);
    assert!(urls[4..].iter().all(|u| u == DEFAULT_API_URL));
}

#[tokio::test]
async fn test_refreshed_auth_token_is_committed_to_cookie() {
    let shop = Arc::new(FakeShop {
        refreshed_token: Some("token-2".into()),
        ..FakeShop::default()
    });
    let addr = spawn_server(shop.clone(), HashMap::new()).await;
    let http = reqwest::Client::new();

    let response = http
        .get(format!("http://{}/api/root?path=/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let cookie = cookie_pair(&response);
    assert!(cookie.starts_with("__session="));

    // The committed cookie now carries the token: sent as bearer auth, no re-commit
    let response = http
        .get(format!("http://{}/api/root?path=/", addr))
        .header("cookie", cookie.as_str())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().get("set-cookie").is_none());

    let calls = shop.calls.lock().unwrap();
    assert!(calls[4..]
        .iter()
        .all(|c| c.auth_token.as_deref() == Some("token-2")));
}
