//! IPTV playlist endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use supawatch_common::{Error, PlaylistInfo};

use super::error::ApiError;
use super::AppContext;
use crate::playlist::{self, Playlist};

pub fn playlist_routes() -> Router<AppContext> {
    Router::new()
        .route("/playlists", get(list_playlists))
        .route("/playlists/:file/channels", get(playlist_channels))
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelQuery {
    pub group: Option<String>,
    pub q: Option<String>,
}

async fn list_playlists(State(ctx): State<AppContext>) -> Result<Json<Vec<PlaylistInfo>>, ApiError> {
    let dir = ctx.config.playlists.dir.clone();
    let playlists = tokio::task::spawn_blocking(move || playlist::list_playlists(&dir))
        .await
        .map_err(|e| Error::Internal(format!("playlist task failed: {e}")))??;
    Ok(Json(playlists))
}

async fn playlist_channels(
    State(ctx): State<AppContext>,
    Path(file): Path<String>,
    Query(query): Query<ChannelQuery>,
) -> Result<Json<Playlist>, ApiError> {
    let dir = ctx.config.playlists.dir.clone();
    let mut loaded = tokio::task::spawn_blocking(move || playlist::load_playlist(&dir, &file))
        .await
        .map_err(|e| Error::Internal(format!("playlist task failed: {e}")))??;

    let group = query.group.as_deref().filter(|g| !g.is_empty());
    let search = query.q.as_deref().filter(|q| !q.is_empty());
    if group.is_some() || search.is_some() {
        loaded.channels = playlist::filter_channels(&loaded.channels, group, search)
            .into_iter()
            .cloned()
            .collect();
    }

    Ok(Json(loaded))
}
