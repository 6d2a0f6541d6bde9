//! Shared harness for the HTTP integration tests.
//!
//! Builds the real router against a wiremock server standing in for TMDB.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use supawatch::config::Config;
use supawatch::server::{create_router, AppContext};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

pub struct TestApp {
    pub tmdb: MockServer,
    pub router: Router,
    pub playlists: TempDir,
}

/// Config pointing at `tmdb`, with a credential and no rate limit.
pub fn test_config(tmdb: &MockServer, playlists: &TempDir) -> Config {
    let mut config = Config::default();
    config.tmdb.api_key = Some(TOKEN.to_string());
    config.tmdb.base_url = tmdb.uri();
    config.tmdb.requests_per_second = 0;
    config.playlists.dir = playlists.path().to_path_buf();
    config
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let tmdb = MockServer::start().await;
    let playlists = TempDir::new().unwrap();
    let mut config = test_config(&tmdb, &playlists);
    customize(&mut config);

    let router = create_router(AppContext::new(config));
    TestApp {
        tmdb,
        router,
        playlists,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
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

    pub async fn upstream_requests(&self) -> Vec<wiremock::Request> {
        self.tmdb.received_requests().await.unwrap_or_default()
    }
}

/// Value of `key` in the query string of an upstream request.
pub fn query_value(request: &wiremock::Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
