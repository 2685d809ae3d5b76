//! Fake shop API for unit tests, served by axum on `127.0.0.1:0`.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use url::Url;

use crate::client::{AUTH_TOKEN_HEADER, CHANNEL_TOKEN_HEADER};

/// What the fake saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation: String,
    pub variables: Value,
    pub channel_token: Option<String>,
    pub authorization: Option<String>,
}

/// What the fake answers.
pub struct FakeReply {
    status: u16,
    body: Value,
    auth_token: Option<String>,
}

impl FakeReply {
    pub fn ok(data: Value) -> Self {
        FakeReply {
            status: 200,
            body: json!({ "data": data }),
            auth_token: None,
        }
    }

    pub fn errors(messages: &[&str]) -> Self {
        let errors: Vec<Value> = messages.iter().map(|m| json!({ "message": m })).collect();
        FakeReply {
            status: 200,
            body: json!({ "data": null, "errors": errors }),
            auth_token: None,
        }
    }

    pub fn status(status: u16) -> Self {
        FakeReply {
            status,
            body: json!({}),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> FakeReply + Send + Sync>;

#[derive(Clone)]
struct FakeState {
    responder: Responder,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Handle to a running fake.
pub struct FakeShop {
    pub url: Url,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeShop {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn graphql(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let request = RecordedRequest {
        operation: body["operationName"].as_str().unwrap_or_default().to_string(),
        variables: body["variables"].clone(),
        channel_token: header(&headers, CHANNEL_TOKEN_HEADER),
        authorization: header(&headers, "authorization"),
    };
    state.requests.lock().unwrap().push(request.clone());

    let reply = (state.responder)(&request);
    let status = StatusCode::from_u16(reply.status).unwrap();
    let mut response = (status, Json(reply.body)).into_response();
    if let Some(token) = reply.auth_token {
        response
            .headers_mut()
            .insert(AUTH_TOKEN_HEADER, HeaderValue::from_str(&token).unwrap());
    }
    response
}

/// Starts a fake shop API that answers every call with `responder`.
pub async fn spawn_fake_shop<F>(responder: F) -> FakeShop
where
    F: Fn(&RecordedRequest) -> FakeReply + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        responder: Arc::new(responder),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/shop-api", post(graphql))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeShop {
        url: Url::parse(&format!("http://{}/shop-api", addr)).unwrap(),
        requests,
    }
}
