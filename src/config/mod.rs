mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable holding the TMDB bearer token.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./supawatch.toml",
        "~/.config/supawatch/config.toml",
        "/etc/supawatch/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Read the credential from the environment once, at load time.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.tmdb.api_key = Some(key);
        }
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.tmdb.base_url.trim().is_empty() {
        anyhow::bail!("TMDB base_url cannot be empty");
    }

    if config.tmdb.timeout_secs == 0 {
        anyhow::bail!("TMDB timeout_secs must be greater than 0");
    }

    if config.tmdb.token().is_none() {
        tracing::warn!(
            "No TMDB credential configured; set {} or tmdb.api_key",
            API_KEY_ENV
        );
    }

    if !config.playlists.dir.exists() {
        tracing::warn!("Playlist directory does not exist: {:?}", config.playlists.dir);
    }

    Ok(())
}
