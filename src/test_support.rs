//! Shared helpers for router-level tests: config, token minting and a thin
//! request driver over the real `Router`.
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde::Serialize;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{
    app::build_router,
    config::{AppEnv, Config, JwtKeyConfig},
    repos::{MemoryNoteStore, Note, NoteStore, error::{RepoError, RepoResult}},
    services::auth::AuthService,
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret";

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn sign<T: Serialize>(claims: &T) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("test token should sign")
}

fn token(sub: &str, fresh: bool) -> String {
    sign(&json!({
        "sub": sub,
        "exp": now() + 600,
        "iat": now(),
        "type": "access",
        "fresh": fresh,
    }))
}

pub fn access_token(sub: &str) -> String {
    token(sub, true)
}

pub fn stale_access_token(sub: &str) -> String {
    token(sub, false)
}

pub fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().expect("addr"),
        app_env: AppEnv::Development,
        database_url: None,
        database_max_connections: 1,
        jwt_key: JwtKeyConfig::Secret(TEST_SECRET.to_string()),
        auth_issuer: None,
        auth_audience: None,
        access_token_leeway_seconds: 0,
        cors_allowed_origins: Vec::new(),
        request_body_limit_bytes: 1024 * 1024,
    }
}

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(Arc::new(MemoryNoteStore::new()), config)
    }

    pub fn with_store(notes: Arc<dyn NoteStore>) -> Self {
        Self::build(notes, test_config())
    }

    pub fn with_body_limit(bytes: usize) -> Self {
        Self::with_config(Config {
            request_body_limit_bytes: bytes,
            ..test_config()
        })
    }

    fn build(notes: Arc<dyn NoteStore>, config: Config) -> Self {
        let auth = AuthService::new(&config.jwt_key, None, None, 0).expect("auth service");
        let state = AppState::new(notes, Arc::new(auth));

        Self {
            router: build_router(state, &config),
        }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let res = self.router.clone().oneshot(req).await.expect("response");
        let status = res.status();
        let headers = res.headers().clone();

        let bytes = to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };

        (status, headers, body)
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Body>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let (status, _, body) = self.send(req).await;
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn get_anonymous(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(json_body(&body)))
            .await
    }

    pub async fn post_raw(&self, uri: &str, token: &str, raw: &'static str) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(Body::from(raw)))
            .await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(token), Some(json_body(&body)))
            .await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, Some(token), None).await
    }
}

fn json_body(value: &Value) -> Body {
    Body::from(serde_json::to_vec(value).expect("json"))
}

/// A store whose backend is always down.
pub struct FailingNoteStore;

fn unavailable<T>() -> RepoResult<T> {
    Err(RepoError::Db(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl NoteStore for FailingNoteStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn create(&self, _owner: &str, _title: &str, _body: &str) -> RepoResult<Note> {
        unavailable()
    }

    async fn find_for_owner(&self, _id: i64, _owner: &str) -> RepoResult<Note> {
        unavailable()
    }

    async fn list_for_owner(&self, _owner: &str) -> RepoResult<Vec<Note>> {
        unavailable()
    }

    async fn update(&self, _id: i64, _owner: &str, _title: &str, _body: &str) -> RepoResult<Note> {
        unavailable()
    }

    async fn delete(&self, _id: i64, _owner: &str) -> RepoResult<Note> {
        unavailable()
    }
}
