//! Quiet-period gate for keystroke input.

use std::time::Duration;
use tokio::time::Instant;

/// Quiet period used by the search box.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(800);
/// Shortest accepted window.
pub const MIN_WINDOW: Duration = Duration::from_millis(500);
/// Longest accepted window.
pub const MAX_WINDOW: Duration = Duration::from_millis(800);

/// Holds the latest input and releases it once it has stopped changing
/// for the window.
#[derive(Debug)]
pub struct Debouncer<T> {
    /// Latest value and when it arrived.
    pending: Option<(T, Instant)>,
    /// How long a value must stay unchanged to be released.
    window: Duration,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl<T> Debouncer<T> {
    /// `window` is clamped to 500..=800 ms.
    pub fn new(window: Duration) -> Self {
        Self {
            pending: None,
            window: window.clamp(MIN_WINDOW, MAX_WINDOW),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a new input, restarting the quiet period.
    pub fn push(&mut self, value: T) {
        self.push_at(value, Instant::now());
    }

    pub fn push_at(&mut self, value: T, at: Instant) {
        self.pending = Some((value, at));
    }

    /// When the pending value will be released, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.window)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if it has been quiet for the window as of `now`.
    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Wait until the pending value settles and take it.
    ///
    /// Returns `None` at once when nothing is pending.
    pub async fn settled(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.poll_at(Instant::now())
    }
}
