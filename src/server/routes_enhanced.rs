//! Composite endpoints: one upstream call with `append_to_response`, then
//! reshaped by [`crate::select`].

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use supawatch_common::MediaKind;

use super::error::ApiError;
use super::params::QueryParams;
use super::response::ProxyResponse;
use super::AppContext;
use crate::select::{EnhancedDetails, EnhancedPerson, MEDIA_APPENDS, PERSON_APPENDS};
use crate::tmdb::{CachePolicy, Endpoint};

pub fn enhanced_routes() -> Router<AppContext> {
    Router::new()
        .route("/getMovieDetailsEnhanced", get(movie_details))
        .route("/getTVSeriesDetailsEnhanced", get(tv_details))
        .route("/getPersonEnhanced", get(person))
}

async fn enhanced_details(
    ctx: &AppContext,
    kind: MediaKind,
    q: &QueryParams,
) -> Result<ProxyResponse<EnhancedDetails>, ApiError> {
    let [id] = q.require(["id"])?;
    let policy = CachePolicy::DETAILS.tagged(format!("{kind}:{id}"));

    let data = ctx
        .tmdb
        .fetch(
            &Endpoint::new([kind.path_segment(), id]),
            &[
                ("append_to_response", Some(MEDIA_APPENDS.join(","))),
                ("include_image_language", Some("en,null".to_string())),
            ],
            &policy,
        )
        .await?;

    Ok(ProxyResponse::new(EnhancedDetails::from_upstream(data)).tagged(&policy))
}

async fn movie_details(
    State(ctx): State<AppContext>,
    Query(q): Query<QueryParams>,
) -> Result<ProxyResponse<EnhancedDetails>, ApiError> {
    enhanced_details(&ctx, MediaKind::Movie, &q).await
}

async fn tv_details(
    State(ctx): State<AppContext>,
    Query(q): Query<QueryParams>,
) -> Result<ProxyResponse<EnhancedDetails>, ApiError> {
    enhanced_details(&ctx, MediaKind::Tv, &q).await
}

async fn person(
    State(ctx): State<AppContext>,
    Query(q): Query<QueryParams>,
) -> Result<ProxyResponse<EnhancedPerson>, ApiError> {
    let [id] = q.require(["id"])?;
    let policy = CachePolicy::DETAILS.tagged(format!("person:{id}"));

    let data = ctx
        .tmdb
        .fetch(
            &Endpoint::new(["person", id]),
            &[("append_to_response", Some(PERSON_APPENDS.join(",")))],
            &policy,
        )
        .await?;

    Ok(ProxyResponse::new(EnhancedPerson::from_upstream(data)).tagged(&policy))
}
