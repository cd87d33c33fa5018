/// Common test utilities for integration tests
///
/// Every test gets its own application backed by:
/// - an in-memory record store
/// - a statistics client pointed at a closed local port, so every remote
///   call fails fast
/// - a small temporary dataset for the predictor

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use coronablog_api::app::{build_router, AppState};
use coronablog_api::config::Config;
use coronablog_shared::auth::AccountStatus;
use coronablog_shared::store::{MemoryStore, RecordStore};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::Service as _;

pub const PASSWORD: &str = "Corona2020";

const DATASET: &str = "\
Country,Cases,Deaths,Date
Turkey,1,0,2020-03-11
Turkey,5,0,2020-03-12
Turkey,18,1,2020-03-13
Turkey,47,1,2020-03-14
Turkey,98,2,2020-03-15
Turkey,191,3,2020-03-16
Turkey,359,4,2020-03-17
Turkey,670,9,2020-03-18
";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub app: axum::Router,
    _dataset: NamedTempFile,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestContext {
    pub fn new() -> Self {
        let mut dataset = NamedTempFile::new().expect("create dataset file");
        dataset
            .write_all(DATASET.as_bytes())
            .expect("write dataset file");

        let mut config = Config::default();
        config.stats.base_url = "http://127.0.0.1:1".to_string();
        config.stats.timeout_secs = 2;
        config.prediction.dataset_path = dataset.path().to_path_buf();

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config).expect("build app state");
        let app = build_router(state.clone());

        Self {
            store,
            state,
            app,
            _dataset: dataset,
        }
    }

    /// Sends a request through the full middleware stack
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// Registers `handle` with [`PASSWORD`] and returns the account ID
    pub async fn register(&self, handle: &str) -> i64 {
        let response = self
            .post(
                "/register",
                None,
                json!({
                    "name": format!("{} Tester", handle),
                    "handle": handle,
                    "email": format!("{}@example.com", handle),
                    "password": PASSWORD,
                    "confirm_password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_i64().unwrap()
    }

    /// Logs in and returns the login response
    pub async fn login(&self, handle: &str) -> TestResponse {
        self.post(
            "/login",
            None,
            json!({ "handle": handle, "password": PASSWORD }),
        )
        .await
    }

    /// Logs in and returns the bearer token
    pub async fn token(&self, handle: &str) -> String {
        let response = self.login(handle).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Registers an account, promotes it to admin and logs it in
    pub async fn admin_token(&self, handle: &str) -> String {
        let id = self.register(handle).await;
        self.store
            .update_account_status(id, AccountStatus::Admin)
            .await
            .unwrap();
        self.token(handle).await
    }
}

/// A valid article payload
pub fn article(title: &str) -> Value {
    json!({
        "title": title,
        "content": "Vaccination centres open on Monday. Bring an ID <b>and</b> your appointment code.",
        "keywords": "covid, vaccine",
    })
}
