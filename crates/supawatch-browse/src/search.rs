//! Debounced multi-search.
//!
//! Keystrokes go through a [`Debouncer`]; once the text settles it is
//! normalized and, if it differs from the active query, the result
//! accumulator is reset and refilled from page 1. Toggling adult content
//! resets the accumulator too. [`SearchFilters`] narrow and order the
//! accumulated results locally.

use std::cmp::Ordering;
use std::sync::Arc;

use supawatch_common::{MediaItem, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::debounce::Debouncer;
use crate::paginator::{LoadOutcome, Paginator};
use crate::source::{SearchPages, SearchSource};

/// Canonical form of a search term: `+` decoded to space, trimmed, inner
/// whitespace collapsed.
pub fn normalize_query(raw: &str) -> String {
    raw.replace('+', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaTypeFilter {
    #[default]
    All,
    Movie,
    Tv,
    Person,
}

impl MediaTypeFilter {
    fn matches(self, item: &MediaItem) -> bool {
        let wanted = match self {
            Self::All => return true,
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Person => "person",
        };
        item.media_type.as_deref() == Some(wanted)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Most popular first.
    #[default]
    Popularity,
    /// Highest vote average first.
    Rating,
    /// Newest first; undated items last.
    ReleaseDate,
    /// Case-insensitive title order.
    Title,
}

/// Client-side narrowing of accumulated search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub media_type: MediaTypeFilter,
    /// Keep items tagged with any of these genres. Empty keeps everything.
    pub genres: Vec<u64>,
    pub sort_by: SortBy,
}

impl SearchFilters {
    pub fn apply(&self, items: &[MediaItem]) -> Vec<MediaItem> {
        let mut filtered: Vec<MediaItem> = items
            .iter()
            .filter(|item| self.media_type.matches(item))
            .filter(|item| {
                self.genres.is_empty() || item.genre_ids.iter().any(|g| self.genres.contains(g))
            })
            .cloned()
            .collect();

        match self.sort_by {
            SortBy::Popularity => {
                filtered.sort_by(|a, b| desc(a.popularity, b.popularity));
            }
            SortBy::Rating => {
                filtered.sort_by(|a, b| desc(a.vote_average, b.vote_average));
            }
            // ISO dates order lexically; missing dates sort as oldest.
            SortBy::ReleaseDate => {
                filtered.sort_by(|a, b| b.date().unwrap_or("").cmp(a.date().unwrap_or("")));
            }
            SortBy::Title => {
                filtered.sort_by_cached_key(|item| item.display_title().to_lowercase());
            }
        }

        filtered
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// One search box and its result grid.
pub struct SearchSession<B: SearchSource + ?Sized> {
    backend: Arc<B>,
    debouncer: Debouncer<String>,
    query: String,
    include_adult: bool,
    /// Whether the active query has been started since it last changed.
    started: bool,
    results: Paginator<SearchPages<B>>,
    pub filters: SearchFilters,
}

impl<B: SearchSource + ?Sized + 'static> SearchSession<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_debouncer(backend, Debouncer::default())
    }

    pub fn with_debouncer(backend: Arc<B>, debouncer: Debouncer<String>) -> Self {
        let results = Paginator::new(SearchPages::new(backend.clone(), "", false)).with_dedupe();
        Self {
            backend,
            debouncer,
            query: String::new(),
            include_adult: false,
            started: false,
            results,
            filters: SearchFilters::default(),
        }
    }

    /// Record a keystroke. Nothing is fetched until the input settles.
    pub fn input(&mut self, raw: impl Into<String>) {
        self.debouncer.push(raw.into());
    }

    /// Wait for the pending input to settle, apply it and load the first
    /// page if the query changed. `None` when nothing was fetched.
    pub async fn settle(&mut self, cancel: &CancellationToken) -> Result<Option<LoadOutcome>> {
        match self.debouncer.settled().await {
            Some(raw) => self.submit(&raw, cancel).await,
            None => Ok(None),
        }
    }

    /// Apply a query immediately, bypassing the debouncer (e.g. a query
    /// taken from the URL). Blank queries clear the results and never fetch.
    ///
    /// Resubmitting the active query changes nothing, unless its first page
    /// never arrived (error or cancellation), in which case that page is
    /// requested again.
    pub async fn submit(
        &mut self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<LoadOutcome>> {
        let query = normalize_query(raw);
        if self.started && query == self.query {
            if self.results.is_empty() && self.results.has_more() {
                return self.load_more(cancel).await;
            }
            return Ok(None);
        }

        self.query = query;
        self.restart();
        self.load_more(cancel).await
    }

    /// Switch the adult-content toggle. A change restarts the search.
    pub async fn set_include_adult(
        &mut self,
        include_adult: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<LoadOutcome>> {
        if include_adult == self.include_adult {
            return Ok(None);
        }
        self.include_adult = include_adult;
        self.restart();
        self.load_more(cancel).await
    }

    /// Next page of the active query; `None` when the query is blank.
    pub async fn load_more(&self, cancel: &CancellationToken) -> Result<Option<LoadOutcome>> {
        if self.query.is_empty() {
            return Ok(None);
        }
        self.results.load_next(cancel).await.map(Some)
    }

    fn restart(&mut self) {
        self.started = true;
        debug!(query = %self.query, include_adult = self.include_adult, "Restarting search");
        self.results.reset_with(SearchPages::new(
            self.backend.clone(),
            self.query.clone(),
            self.include_adult,
        ));
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn include_adult(&self) -> bool {
        self.include_adult
    }

    pub fn results(&self) -> &Paginator<SearchPages<B>> {
        &self.results
    }

    /// Accumulated results after [`SearchFilters`].
    pub fn visible(&self) -> Vec<MediaItem> {
        self.filters.apply(&self.results.items())
    }
}
