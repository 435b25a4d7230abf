//! Common test utilities for integration tests
//!
//! Builds the real router over an in-memory store, so these tests run
//! without PostgreSQL. Requests go through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use staffdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use staffdesk_shared::store::memory::MemoryStore;
use std::{collections::HashMap, sync::Arc};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Test context containing the app and its backing store
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub config: Config,
}

/// Status, headers and parsed JSON body of a response
///
/// An empty body parses as `Value::Null`.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `Set-Cookie` header, if any
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Builds a test configuration with the given overrides
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("DATABASE_URL".to_string(), "postgresql://unused/test".to_string()),
        ("SESSION_SECRET".to_string(), TEST_SECRET.to_string()),
    ]);
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }

    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

impl TestContext {
    /// Creates a context with an empty store and default configuration
    pub fn new() -> Self {
        Self::with_config(test_config(&[]))
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config.clone());

        Self {
            app: build_router(state),
            store,
            config,
        }
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sends a JSON request, authenticated with a bearer token if given
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        self.send(json_request(method, uri, token, body)).await
    }

    /// Registers an account and returns its ID
    pub async fn register(&self, name: &str, email: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/register",
                None,
                Some(json!({ "name": name, "email": email, "password": TEST_PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["accountId"].as_str().unwrap().to_string()
    }

    /// Logs in and returns the full response
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers an account, logs in and returns the session token
    pub async fn register_and_login(&self, name: &str, email: &str) -> String {
        self.register(name, email).await;

        let response = self.login(email, TEST_PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        response.body["accessToken"].as_str().unwrap().to_string()
    }

    /// Creates an employee as the given session and returns the record
    pub async fn create_employee(&self, token: &str, body: Value) -> Value {
        let response = self
            .request(Method::POST, "/api/employees", Some(token), Some(body))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body
    }
}

/// Builds a JSON request
pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
