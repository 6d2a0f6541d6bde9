//! Supawatch-Common: Shared error taxonomy and media types.
//!
//! This crate provides functionality used by both the proxy server and the
//! browsing controllers:
//!
//! - **Error Handling**: one error enum whose variants carry their HTTP status
//! - **Media Types**: transient projections of TMDB payloads (items, details,
//!   credits, trailers)
//! - **Playlist Types**: channels and playlist descriptors for the IPTV tool
//!
//! # Examples
//!
//! ```
//! use supawatch_common::{Error, MediaKind, Result};
//!
//! let kind: MediaKind = "tv".parse().unwrap();
//! assert_eq!(kind.path_segment(), "tv");
//!
//! fn example() -> Result<()> {
//!     Err(Error::missing(["id"]))
//! }
//! assert_eq!(example().unwrap_err().http_status(), 400);
//! ```

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
