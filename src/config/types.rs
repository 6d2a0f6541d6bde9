use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub playlists: PlaylistConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding a built frontend, served with SPA fallback
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// Bearer token (TMDB "API Read Access Token"). `TMDB_API_KEY` overrides it.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Client-side rate limit towards TMDB (0 = unlimited)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Retries on HTTP 429 before giving up (0 = fail immediately)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Share one pending upstream call among identical concurrent requests
    #[serde(default = "default_true")]
    pub coalesce_inflight: bool,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_requests_per_second() -> u32 {
    40
}
fn default_max_retries() -> u32 {
    0
}
fn default_true() -> bool {
    true
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            requests_per_second: default_requests_per_second(),
            max_retries: default_max_retries(),
            coalesce_inflight: true,
        }
    }
}

impl TmdbConfig {
    /// The configured token, treating an empty string as absent.
    pub fn token(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

// Keeps the token out of logs.
impl fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &self.token().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("requests_per_second", &self.requests_per_second)
            .field("max_retries", &self.max_retries)
            .field("coalesce_inflight", &self.coalesce_inflight)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistConfig {
    /// Directory scanned for `.m3u` / `.m3u8` files
    #[serde(default = "default_playlist_dir")]
    pub dir: PathBuf,
}

fn default_playlist_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            dir: default_playlist_dir(),
        }
    }
}
