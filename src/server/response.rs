//! Success responses for proxy endpoints.

use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::select::envelope;
use crate::tmdb::CachePolicy;

/// Shared-cache directive sent with every successful proxy response.
pub const SUCCESS_CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate=86400";

/// Header listing the cache tags of the upstream data behind a response.
pub static CACHE_TAG: HeaderName = HeaderName::from_static("cache-tag");

/// JSON body plus the proxy's caching headers.
#[derive(Debug)]
pub struct ProxyResponse<T = Value> {
    status: StatusCode,
    body: T,
    tags: Vec<String>,
}

impl<T: Serialize> ProxyResponse<T> {
    pub fn new(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            tags: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Echo the tags of the policy the data was fetched under.
    pub fn tagged(mut self, policy: &CachePolicy) -> Self {
        self.tags.extend(policy.tags.iter().cloned());
        self
    }
}

impl ProxyResponse<Value> {
    /// `{data: <upstream body>}`
    pub fn data(upstream: Value) -> Self {
        Self::new(envelope(upstream))
    }
}

impl<T: Serialize> IntoResponse for ProxyResponse<T> {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        let headers = response.headers_mut();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(SUCCESS_CACHE_CONTROL));
        if !self.tags.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&self.tags.join(",")) {
                headers.insert(CACHE_TAG.clone(), value);
            }
        }
        response
    }
}
