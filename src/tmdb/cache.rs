//! Freshness hints for upstream calls.
//!
//! A [`CachePolicy`] never causes anything to be stored in-process. Its
//! revalidate window is forwarded to TMDB as a `Cache-Control: max-age`
//! request directive, so any shared cache sitting between the proxy and TMDB
//! may answer with an entry that fresh. Its tags are echoed on the proxy
//! response (`Cache-Tag`) for CDN purging.

use std::time::Duration;

/// Revalidate window plus cache tags for one upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub revalidate: Duration,
    pub tags: Vec<String>,
}

impl CachePolicy {
    /// Movie, series and person records, and their sub-resources.
    pub const DETAILS: CachePolicy = CachePolicy::new(Duration::from_secs(3600));
    /// Popular, top-rated, discover and similar listings.
    pub const LISTS: CachePolicy = CachePolicy::new(Duration::from_secs(900));
    /// Free-text search results.
    pub const SEARCH: CachePolicy = CachePolicy::new(Duration::from_secs(300));
    /// Genre taxonomies.
    pub const STATIC: CachePolicy = CachePolicy::new(Duration::from_secs(86400));

    pub const fn new(revalidate: Duration) -> Self {
        Self {
            revalidate,
            tags: Vec::new(),
        }
    }

    /// Copy of this policy with one more tag.
    pub fn tagged(&self, tag: impl Into<String>) -> Self {
        let mut policy = self.clone();
        policy.tags.push(tag.into());
        policy
    }

    /// Value for the upstream `Cache-Control` request header.
    pub fn request_directive(&self) -> String {
        format!("max-age={}", self.revalidate.as_secs())
    }
}
