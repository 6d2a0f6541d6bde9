//! In-flight request coalescing.
//!
//! Identical upstream requests that overlap in time share one pending call:
//! the first caller becomes the leader and its future is stored as a
//! [`Shared`] in the map, later callers clone and await it. The entry is
//! removed as soon as the leader finishes or is dropped, so nothing outlives
//! the call that produced it.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use supawatch_common::Result;
use tracing::debug;

type SharedFetch = Shared<BoxFuture<'static, Result<Value>>>;

/// Map of upstream calls currently in flight, keyed by normalized request.
#[derive(Default)]
pub struct InflightRequests {
    pending: DashMap<String, (u64, SharedFetch)>,
    next_generation: AtomicU64,
}

impl InflightRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the call produced by `make`, or join an identical one already in
    /// flight under `key`.
    pub async fn run<F>(&self, key: String, make: F) -> Result<Value>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Value>>,
    {
        let (shared, guard) = match self.pending.entry(key.clone()) {
            Entry::Occupied(e) => {
                let shared = e.get().1.clone();
                drop(e);
                debug!(key = %key, "Joining in-flight upstream request");
                (shared, None)
            }
            Entry::Vacant(e) => {
                let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                let shared = make().shared();
                e.insert((generation, shared.clone()));
                let guard = LeaderGuard {
                    pending: &self.pending,
                    key,
                    generation,
                };
                (shared, Some(guard))
            }
        };

        let result = shared.await;
        drop(guard);
        result
    }

    /// Number of distinct requests currently in flight.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Removes the leader's entry on completion or cancellation. The generation
/// check keeps a late drop from evicting a newer leader's entry.
struct LeaderGuard<'a> {
    pending: &'a DashMap<String, (u64, SharedFetch)>,
    key: String,
    generation: u64,
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        self.pending
            .remove_if(&self.key, |_, (generation, _)| *generation == self.generation);
    }
}
