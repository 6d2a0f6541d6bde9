//! IPTV playlist sub-tool.
//!
//! Playlists are plain `.m3u` / `.m3u8` files in one directory. They are
//! listed and parsed on demand; nothing is kept between requests.

mod m3u;

pub use m3u::parse_m3u;

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use supawatch_common::{Channel, Error, PlaylistInfo, Result};

const PLAYLIST_EXTENSIONS: [&str; 2] = ["m3u", "m3u8"];

/// A parsed playlist with its distinct groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub playlist: PlaylistInfo,
    pub groups: Vec<String>,
    pub channels: Vec<Channel>,
}

fn is_playlist(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            PLAYLIST_EXTENSIONS
                .iter()
                .any(|ext| e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Display name: file stem with `_` and `-` turned into spaces.
pub fn display_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    stem.replace(['_', '-'], " ")
}

/// Playlists in `dir`, sorted by display name.
pub fn list_playlists(dir: &Path) -> Result<Vec<PlaylistInfo>> {
    let mut playlists = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_playlist(&path) {
            continue;
        }
        if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
            playlists.push(PlaylistInfo {
                name: display_name(filename),
                filename: filename.to_string(),
            });
        }
    }

    playlists.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.filename.cmp(&b.filename)));
    Ok(playlists)
}

/// Resolve `filename` inside `dir`, rejecting anything that is not a plain
/// playlist file name.
fn resolve(dir: &Path, filename: &str) -> Result<PathBuf> {
    let candidate = Path::new(filename);
    let plain = matches!(
        candidate.components().collect::<Vec<_>>().as_slice(),
        [Component::Normal(_)]
    );
    if !plain || !is_playlist(candidate) {
        return Err(Error::not_found("playlist", filename));
    }

    let path = dir.join(candidate);
    if !path.is_file() {
        return Err(Error::not_found("playlist", filename));
    }
    Ok(path)
}

/// Read and parse one playlist from `dir`.
pub fn load_playlist(dir: &Path, filename: &str) -> Result<Playlist> {
    let path = resolve(dir, filename)?;
    let content = std::fs::read_to_string(&path)?;
    let channels = parse_m3u(&content);

    tracing::debug!(file = %filename, channels = channels.len(), "Parsed playlist");

    Ok(Playlist {
        playlist: PlaylistInfo {
            filename: filename.to_string(),
            name: display_name(filename),
        },
        groups: groups(&channels),
        channels,
    })
}

/// Distinct channel groups, sorted.
pub fn groups(channels: &[Channel]) -> Vec<String> {
    channels
        .iter()
        .map(|c| c.group.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Channels in `group` (all groups if `None`) whose name contains `search`,
/// case-insensitively.
pub fn filter_channels<'a>(
    channels: &'a [Channel],
    group: Option<&str>,
    search: Option<&str>,
) -> Vec<&'a Channel> {
    let needle = search.map(str::to_lowercase).unwrap_or_default();
    channels
        .iter()
        .filter(|c| group.map_or(true, |g| c.group == g))
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .collect()
}
