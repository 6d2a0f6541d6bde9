//! Where pages come from.

use std::sync::Arc;

use async_trait::async_trait;
use supawatch_common::{Page, Result};

/// A paginated listing, 1-based.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Page>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        (**self).fetch_page(page).await
    }
}

/// Free-text search with an adult-content toggle.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(&self, query: &str, include_adult: bool, page: u32) -> Result<Page>;
}

/// One fixed query of a [`SearchSource`], usable as a [`PageSource`].
pub struct SearchPages<B: ?Sized> {
    backend: Arc<B>,
    query: String,
    include_adult: bool,
}

impl<B: SearchSource + ?Sized> SearchPages<B> {
    pub fn new(backend: Arc<B>, query: impl Into<String>, include_adult: bool) -> Self {
        Self {
            backend,
            query: query.into(),
            include_adult,
        }
    }
}

#[async_trait]
impl<B: SearchSource + ?Sized> PageSource for SearchPages<B> {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        self.backend
            .search(&self.query, self.include_adult, page)
            .await
    }
}
