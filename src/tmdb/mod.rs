//! TMDB (The Movie Database) upstream access.
//!
//! [`TmdbClient::fetch`] is the only way the proxy talks to TMDB. It appends
//! `language=en-US`, attaches the bearer credential, forwards the
//! [`CachePolicy`] hint, and maps failures onto the shared error taxonomy.
//!
//! Features:
//! - Optional token-bucket rate limiting via [`governor`].
//! - Opt-in bounded retry on HTTP 429 honoring `Retry-After`.
//! - Optional in-flight coalescing of identical concurrent calls.

mod cache;
mod client;
mod coalesce;

pub use cache::CachePolicy;
pub use client::{Endpoint, Params, TmdbClient, LANGUAGE};
pub use coalesce::InflightRequests;
