//! Per-resource movie and TV endpoints.
//!
//! Each handler validates its query, makes exactly one upstream call and
//! wraps the raw body as `{data}` (trailer routes return the selected video
//! record instead).

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use supawatch_common::{MediaKind, Trailer};

use super::error::ApiError;
use super::params::QueryParams;
use super::response::ProxyResponse;
use super::AppContext;
use crate::select::select_trailer;
use crate::tmdb::{CachePolicy, Endpoint};

type ApiResult<T = ProxyResponse> = Result<T, ApiError>;

const IMAGE_LANGUAGES: &str = "en,null";

pub fn media_routes() -> Router<AppContext> {
    Router::new()
        .route("/getMovieList", get(movie_list))
        .route("/getTVList", get(tv_list))
        .route("/getMovieDiscover", get(movie_discover))
        .route("/getSearch", get(search))
        .route("/getDetails", get(details))
        .route("/getCredits", get(credits))
        .route("/getTVCredits", get(tv_credits))
        .route("/getMovieImages", get(images))
        .route("/getTVImages", get(tv_images))
        .route("/getTrailer", get(trailer))
        .route("/getTVTrailer", get(tv_trailer))
        .route("/getSimilar", get(similar))
        .route("/getEpisodes", get(episodes))
        .route("/getGenres", get(genres))
}

fn detail_policy(kind: MediaKind, id: &str) -> CachePolicy {
    CachePolicy::DETAILS.tagged(format!("{kind}:{id}"))
}

async fn list(ctx: &AppContext, kind: MediaKind, q: &QueryParams) -> ApiResult {
    let [list] = q.require(["list"])?;
    let page = q.page()?;

    let data = ctx
        .tmdb
        .fetch(
            &Endpoint::new([kind.path_segment(), list]),
            &[("page", Some(page.to_string()))],
            &CachePolicy::LISTS,
        )
        .await?;
    Ok(ProxyResponse::data(data))
}

async fn movie_list(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    list(&ctx, MediaKind::Movie, &q).await
}

async fn tv_list(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    list(&ctx, MediaKind::Tv, &q).await
}

async fn movie_discover(
    State(ctx): State<AppContext>,
    Query(q): Query<QueryParams>,
) -> ApiResult {
    let [genre] = q.require(["genre"])?;
    let page = q.page()?;

    let data = ctx
        .tmdb
        .fetch(
            &Endpoint::new(["discover", "movie"]),
            &[
                ("with_genres", Some(genre.to_string())),
                ("page", Some(page.to_string())),
                ("sort_by", Some("popularity.desc".to_string())),
            ],
            &CachePolicy::LISTS,
        )
        .await?;
    Ok(ProxyResponse::data(data))
}

async fn search(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    let [query] = q.require(["query"])?;
    let page = q.page()?;
    let include_adult = q.flag("include_adult", false)?;

    let data = ctx
        .tmdb
        .fetch(
            &Endpoint::new(["search", "multi"]),
            &[
                ("query", Some(query.to_string())),
                ("page", Some(page.to_string())),
                ("include_adult", Some(include_adult.to_string())),
            ],
            &CachePolicy::SEARCH,
        )
        .await?;
    Ok(ProxyResponse::data(data))
}

/// `/{type}/{id}` plus an optional sub-resource, as `{data}`.
async fn detail_resource(
    ctx: &AppContext,
    kind: MediaKind,
    id: &str,
    resource: Option<&str>,
    params: &[(&str, Option<String>)],
) -> ApiResult {
    let mut segments = vec![kind.path_segment(), id];
    segments.extend(resource);

    let policy = detail_policy(kind, id);
    let data = ctx
        .tmdb
        .fetch(&Endpoint::new(segments), params, &policy)
        .await?;
    Ok(ProxyResponse::data(data).tagged(&policy))
}

async fn details(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    let [id] = q.require(["id"])?;
    detail_resource(&ctx, q.media_kind(), id, None, &[]).await
}

async fn credits(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    let [id] = q.require(["id"])?;
    detail_resource(&ctx, q.media_kind(), id, Some("credits"), &[]).await
}

async fn tv_credits(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    let [id] = q.require(["id"])?;
    detail_resource(&ctx, MediaKind::Tv, id, Some("credits"), &[]).await
}

async fn images(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    let [id] = q.require(["id"])?;
    let params = [("include_image_language", Some(IMAGE_LANGUAGES.to_string()))];
    detail_resource(&ctx, q.media_kind(), id, Some("images"), &params).await
}

async fn tv_images(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    let [id] = q.require(["id"])?;
    let params = [("include_image_language", Some(IMAGE_LANGUAGES.to_string()))];
    detail_resource(&ctx, MediaKind::Tv, id, Some("images"), &params).await
}

async fn fetch_trailer(
    ctx: &AppContext,
    kind: MediaKind,
    id: &str,
) -> ApiResult<ProxyResponse<Trailer>> {
    let policy = detail_policy(kind, id);
    let videos = ctx
        .tmdb
        .fetch(
            &Endpoint::new([kind.path_segment(), id, "videos"]),
            &[],
            &policy,
        )
        .await?;
    Ok(ProxyResponse::new(select_trailer(Some(&videos))).tagged(&policy))
}

async fn trailer(
    State(ctx): State<AppContext>,
    Query(q): Query<QueryParams>,
) -> ApiResult<ProxyResponse<Trailer>> {
    let [id] = q.require(["id"])?;
    fetch_trailer(&ctx, q.media_kind(), id).await
}

async fn tv_trailer(
    State(ctx): State<AppContext>,
    Query(q): Query<QueryParams>,
) -> ApiResult<ProxyResponse<Trailer>> {
    let [id] = q.require(["id"])?;
    fetch_trailer(&ctx, MediaKind::Tv, id).await
}

async fn similar(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    let [id] = q.require(["id"])?;
    let page = q.page()?;
    let kind = q.media_kind();

    let data = ctx
        .tmdb
        .fetch(
            &Endpoint::new([kind.path_segment(), id, "similar"]),
            &[("page", Some(page.to_string()))],
            &CachePolicy::LISTS,
        )
        .await?;
    Ok(ProxyResponse::data(data))
}

async fn episodes(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    let [id, season] = q.require(["id", "season"])?;

    let policy = detail_policy(MediaKind::Tv, id);
    let data = ctx
        .tmdb
        .fetch(
            &Endpoint::new(["tv", id, "season", season]),
            &[],
            &policy,
        )
        .await?;
    Ok(ProxyResponse::data(data).tagged(&policy))
}

async fn genres(State(ctx): State<AppContext>, Query(q): Query<QueryParams>) -> ApiResult {
    let kind = q.media_kind();
    let policy = CachePolicy::STATIC.tagged(format!("genres:{kind}"));

    let data = ctx
        .tmdb
        .fetch(
            &Endpoint::new(["genre", kind.path_segment(), "list"]),
            &[],
            &policy,
        )
        .await?;
    Ok(ProxyResponse::data(data).tagged(&policy))
}
