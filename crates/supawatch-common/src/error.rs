//! Error taxonomy shared by the proxy and the browsing controllers.
//!
//! Every variant knows its own HTTP status via [`Error::http_status`], so the
//! server never has to inspect message text to tell a client error from an
//! upstream failure.
//!
//! The enum is `Clone` because a single coalesced upstream failure is handed
//! to every request that was waiting on it.

use std::fmt;

/// Unified error type for supawatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// One or more required query parameters were absent or empty.
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    /// A parameter was present but could not be interpreted.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the query string.
        name: String,
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// TMDB answered with a non-success status.
    #[error("TMDB API error: {status} {status_text}")]
    Upstream {
        /// HTTP status code returned by TMDB.
        status: u16,
        /// Canonical reason phrase for `status`.
        status_text: String,
    },

    /// The upstream call failed before a status was available, or the body
    /// could not be decoded.
    #[error("{0}")]
    Transport(String),

    /// A required credential or setting is absent.
    #[error("{0}")]
    NotConfigured(String),

    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "playlist").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to the HTTP status the proxy responds with.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::MissingParameters(_) => 400,
            Error::InvalidParameter { .. } => 400,
            Error::NotFound { .. } => 404,
            Error::Upstream { .. } => 500,
            Error::Transport(_) => 500,
            Error::NotConfigured(_) => 500,
            Error::Io(_) => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Returns `true` for errors caused by the caller's request.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }

    /// Convenience constructor for [`Error::MissingParameters`].
    pub fn missing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::MissingParameters(names.into_iter().map(Into::into).collect())
    }

    /// Convenience constructor for [`Error::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// The error raised when no TMDB credential has been configured.
    pub fn api_key_missing() -> Self {
        Error::NotConfigured("TMDB API key is not configured".into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
