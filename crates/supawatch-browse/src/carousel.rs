//! Auto-rotating hero banner.

use std::time::Duration;
use tokio::time::Instant;

/// Most items the banner shows.
pub const MAX_ITEMS: usize = 8;
/// Default rotation period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);
const MIN_INTERVAL: Duration = Duration::from_secs(12);
const MAX_INTERVAL: Duration = Duration::from_secs(15);

/// Rotates through up to [`MAX_ITEMS`] featured items.
///
/// The banner advances one slot (wrapping) each interval. While a detail
/// dialog is open it holds still, and any manual navigation restarts the
/// countdown. Time is passed in explicitly so the caller owns the clock;
/// [`HeroCarousel::run`] drives it from a tokio timer.
#[derive(Debug, Clone)]
pub struct HeroCarousel<T> {
    items: Vec<T>,
    current: usize,
    interval: Duration,
    dialog_open: bool,
    last_change: Instant,
}

impl<T> HeroCarousel<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::with_interval(items, DEFAULT_INTERVAL)
    }

    /// `interval` is clamped to 12..=15 s.
    pub fn with_interval(mut items: Vec<T>, interval: Duration) -> Self {
        items.truncate(MAX_ITEMS);
        Self {
            items,
            current: 0,
            interval: interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
            dialog_open: false,
            last_change: Instant::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.current)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_paused(&self) -> bool {
        self.dialog_open
    }

    /// A detail dialog opened or closed. Closing restarts the countdown.
    pub fn set_dialog_open(&mut self, open: bool) {
        self.set_dialog_open_at(open, Instant::now());
    }

    pub fn set_dialog_open_at(&mut self, open: bool, now: Instant) {
        if self.dialog_open && !open {
            self.last_change = now;
        }
        self.dialog_open = open;
    }

    pub fn next(&mut self) {
        self.next_at(Instant::now());
    }

    pub fn next_at(&mut self, now: Instant) {
        if !self.items.is_empty() {
            self.go_to((self.current + 1) % self.items.len(), now);
        }
    }

    pub fn previous(&mut self) {
        self.previous_at(Instant::now());
    }

    pub fn previous_at(&mut self, now: Instant) {
        if !self.items.is_empty() {
            let len = self.items.len();
            self.go_to((self.current + len - 1) % len, now);
        }
    }

    /// Show slot `index`. Out-of-range indexes are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        self.jump_to_at(index, Instant::now())
    }

    pub fn jump_to_at(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.go_to(index, now);
        true
    }

    fn go_to(&mut self, index: usize, now: Instant) {
        self.current = index;
        self.last_change = now;
    }

    /// When the next automatic advance is due, unless paused or there is
    /// nothing to rotate.
    pub fn due_at(&self) -> Option<Instant> {
        (!self.dialog_open && self.items.len() > 1).then(|| self.last_change + self.interval)
    }

    /// Advance if the interval has elapsed as of `now`. Returns whether the
    /// banner moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.due_at() {
            Some(due) if now >= due => {
                self.current = (self.current + 1) % self.items.len();
                self.last_change = now;
                true
            }
            _ => false,
        }
    }

    /// Sleep until the next advance and perform it. Returns `None` when
    /// the carousel is paused or has fewer than two items.
    pub async fn run(&mut self) -> Option<usize> {
        let due = self.due_at()?;
        tokio::time::sleep_until(due).await;
        self.tick(Instant::now()).then_some(self.current)
    }
}
