//! Append-only page accumulator behind every infinite-scroll grid.
//!
//! A [`Paginator`] requests page 1, 2, 3... from its [`PageSource`] and
//! appends each non-empty page. The first empty page ends the listing:
//! `has_more` drops to false and no further fetch happens until
//! [`Paginator::reset`].
//!
//! Only one load runs at a time. A load started before a reset is discarded
//! when it completes, and a load whose [`CancellationToken`] fires, or whose
//! future is dropped, leaves the state as it was.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use supawatch_common::{MediaItem, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::source::PageSource;

/// What a call to [`Paginator::load_next`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and this many new items were appended.
    Appended(usize),
    /// The listing has ended; nothing was appended.
    Exhausted,
    /// Another load was already in flight; nothing was fetched.
    Busy,
    /// The paginator was reset while the fetch was in flight.
    Stale,
    /// The cancellation token fired before the fetch completed.
    Cancelled,
}

struct State<S> {
    source: Arc<S>,
    items: Vec<MediaItem>,
    seen: HashSet<u64>,
    next_page: u32,
    has_more: bool,
    loading: bool,
    generation: u64,
}

impl<S> State<S> {
    fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
        self.next_page = 1;
        self.has_more = true;
        self.loading = false;
        self.generation += 1;
    }
}

/// Clears the loading flag if a load is dropped mid-fetch, unless a reset
/// has started a newer generation since.
struct LoadingGuard<'a, S> {
    state: &'a Mutex<State<S>>,
    generation: u64,
    armed: bool,
}

impl<S> LoadingGuard<'_, S> {
    /// The load reached its own bookkeeping; nothing to undo.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock();
        if state.generation == self.generation {
            debug!("Load dropped mid-fetch");
            state.loading = false;
        }
    }
}

pub struct Paginator<S> {
    state: Mutex<State<S>>,
    dedupe: bool,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: Mutex::new(State {
                source: Arc::new(source),
                items: Vec::new(),
                seen: HashSet::new(),
                next_page: 1,
                has_more: true,
                loading: false,
                generation: 0,
            }),
            dedupe: false,
        }
    }

    /// Skip items whose id is already accumulated.
    pub fn with_dedupe(mut self) -> Self {
        self.dedupe = true;
        self
    }

    /// Fetch the next page and append it.
    ///
    /// Errors clear the loading flag and leave the cursor and items
    /// untouched, so the same page is requested again on the next call.
    pub async fn load_next(&self, cancel: &CancellationToken) -> Result<LoadOutcome> {
        let (source, page, generation) = {
            let mut state = self.state.lock();
            if !state.has_more {
                return Ok(LoadOutcome::Exhausted);
            }
            if state.loading {
                return Ok(LoadOutcome::Busy);
            }
            state.loading = true;
            (state.source.clone(), state.next_page, state.generation)
        };
        let loading = LoadingGuard {
            state: &self.state,
            generation,
            armed: true,
        };

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = source.fetch_page(page) => Some(result),
        };
        loading.disarm();

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(page, "Discarding page fetched before reset");
            return Ok(LoadOutcome::Stale);
        }
        state.loading = false;

        let Some(result) = fetched else {
            return Ok(LoadOutcome::Cancelled);
        };
        let fetched = result?;

        if fetched.results.is_empty() {
            debug!(page, "Empty page, listing exhausted");
            state.has_more = false;
            return Ok(LoadOutcome::Exhausted);
        }

        let before = state.items.len();
        for item in fetched.results {
            if self.dedupe && !state.seen.insert(item.id) {
                continue;
            }
            state.items.push(item);
        }
        state.next_page = page + 1;

        Ok(LoadOutcome::Appended(state.items.len() - before))
    }

    /// Infinite-scroll hook: load the next page when the sentinel element
    /// comes into view, unless a load is running or the listing has ended.
    pub async fn on_sentinel_visible(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<LoadOutcome>> {
        if !self.should_load() {
            return Ok(None);
        }
        self.load_next(cancel).await.map(Some)
    }

    fn should_load(&self) -> bool {
        let state = self.state.lock();
        !state.loading && state.has_more
    }

    /// Drop everything and start again from page 1.
    pub fn reset(&self) {
        self.state.lock().clear();
    }

    /// Reset and read from a different source from now on.
    pub fn reset_with(&self, source: S) {
        let mut state = self.state.lock();
        state.source = Arc::new(source);
        state.clear();
    }

    /// Snapshot of the accumulated items.
    pub fn items(&self) -> Vec<MediaItem> {
        self.state.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// The page the next load will request.
    pub fn next_page(&self) -> u32 {
        self.state.lock().next_page
    }

    /// Number of resets so far.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }
}
