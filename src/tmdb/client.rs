//! The single chokepoint for every TMDB call.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{ACCEPT, CACHE_CONTROL, RETRY_AFTER};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use supawatch_common::{Error, Result};
use tracing::{debug, warn};

use super::cache::CachePolicy;
use super::coalesce::InflightRequests;
use crate::config::TmdbConfig;

/// Every upstream call is made in this language.
pub const LANGUAGE: &str = "en-US";

/// Query parameters for an upstream call. `None` values are skipped.
pub type Params<'a> = [(&'a str, Option<String>)];

/// Upstream path, kept as raw segments so ids and list names are
/// percent-encoded when the URL is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<String>,
}

impl Endpoint {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// TMDB v3 client.
///
/// Holds the credential injected at startup, an optional token-bucket rate
/// limiter and the optional in-flight coalescing map. Cheap to share behind
/// an `Arc`.
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    max_retries: u32,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    inflight: Option<Arc<InflightRequests>>,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        let limiter = NonZeroU32::new(config.requests_per_second)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));

        let inflight = config
            .coalesce_inflight
            .then(|| Arc::new(InflightRequests::new()));

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token().map(String::from),
            max_retries: config.max_retries,
            limiter,
            inflight,
        }
    }

    /// Whether a credential is available.
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Build the upstream URL: base + endpoint, `language` first, then the
    /// caller's parameters in order.
    pub fn url(&self, endpoint: &Endpoint, params: &Params<'_>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Internal(format!("invalid TMDB base url: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| Error::Internal("TMDB base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(&endpoint.segments);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("language", LANGUAGE);
            for (key, value) in params {
                if let Some(value) = value {
                    query.append_pair(key, value);
                }
            }
        }

        Ok(url)
    }

    /// Fetch one upstream resource as raw JSON.
    ///
    /// Fails with [`Error::NotConfigured`] when no credential is set,
    /// [`Error::Upstream`] on a non-2xx status and [`Error::Transport`] on
    /// network or decode failures.
    pub async fn fetch(
        &self,
        endpoint: &Endpoint,
        params: &Params<'_>,
        policy: &CachePolicy,
    ) -> Result<Value> {
        let token = self.token.clone().ok_or_else(Error::api_key_missing)?;
        let url = self.url(endpoint, params)?;

        let request = UpstreamRequest {
            http: self.http.clone(),
            url: url.clone(),
            token,
            cache_directive: policy.request_directive(),
            limiter: self.limiter.clone(),
            max_retries: self.max_retries,
        };

        debug!(endpoint = %endpoint, revalidate = policy.revalidate.as_secs(), "TMDB fetch");

        let result = match &self.inflight {
            Some(inflight) => {
                inflight
                    .run(request_key(&url), move || request.send().boxed())
                    .await
            }
            None => request.send().await,
        };

        if let Err(ref e) = result {
            warn!(endpoint = %endpoint, error = %e, "TMDB fetch failed");
        }
        result
    }
}

/// Normalized coalescing key: path plus query pairs in sorted order.
fn request_key(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();

    let query: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{}?{}", url.path(), query.join("&"))
}

/// Everything one upstream call needs, owned so the call can be shared
/// between coalesced callers.
struct UpstreamRequest {
    http: reqwest::Client,
    url: Url,
    token: String,
    cache_directive: String,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    max_retries: u32,
}

impl UpstreamRequest {
    async fn send(self) -> Result<Value> {
        let mut retries = 0u32;
        loop {
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            let resp = self
                .http
                .get(self.url.clone())
                .bearer_auth(&self.token)
                .header(ACCEPT, "application/json")
                .header(CACHE_CONTROL, &self.cache_directive)
                .send()
                .await
                .map_err(|e| Error::Transport(format!("TMDB request failed: {e}")))?;

            let status = resp.status();

            if status == StatusCode::TOO_MANY_REQUESTS && retries < self.max_retries {
                retries += 1;
                let wait = resp
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if !status.is_success() {
                return Err(Error::Upstream {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }

            return resp
                .json::<Value>()
                .await
                .map_err(|e| Error::Transport(format!("TMDB parse error: {e}")));
        }
    }
}
