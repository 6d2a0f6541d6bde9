//! Client-side browsing controllers for the supawatch proxy.
//!
//! These are UI-agnostic state machines: a [`Paginator`] accumulates pages
//! from a [`PageSource`], a [`SearchSession`] debounces free-text input in
//! front of one, and a [`HeroCarousel`] rotates featured items. The
//! [`ProxyClient`] implements the page sources over the proxy's HTTP API.
//!
//! ```
//! use supawatch_browse::{normalize_query, HeroCarousel};
//!
//! assert_eq!(normalize_query("  star+wars  "), "star wars");
//!
//! let carousel = HeroCarousel::new((1..=10).collect::<Vec<u32>>());
//! assert_eq!(carousel.len(), 8);
//! ```

pub mod carousel;
pub mod client;
pub mod debounce;
pub mod paginator;
pub mod search;
pub mod source;

pub use carousel::HeroCarousel;
pub use client::{
    DetailsView, DiscoverSource, FilmographySource, ListSource, ProxyClient, SimilarSource,
};
pub use debounce::Debouncer;
pub use paginator::{LoadOutcome, Paginator};
pub use search::{normalize_query, MediaTypeFilter, SearchFilters, SearchSession, SortBy};
pub use source::{PageSource, SearchPages, SearchSource};
