//! Person records.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;

use super::error::ApiError;
use super::params::QueryParams;
use super::response::ProxyResponse;
use super::AppContext;
use crate::tmdb::{CachePolicy, Endpoint};

pub fn people_routes() -> Router<AppContext> {
    Router::new().route("/getPeople", get(person))
}

async fn person(
    State(ctx): State<AppContext>,
    Query(q): Query<QueryParams>,
) -> Result<ProxyResponse, ApiError> {
    let [id] = q.require(["id"])?;
    let policy = CachePolicy::DETAILS.tagged(format!("person:{id}"));

    let data = ctx
        .tmdb
        .fetch(&Endpoint::new(["person", id]), &[], &policy)
        .await?;
    Ok(ProxyResponse::data(data).tagged(&policy))
}
