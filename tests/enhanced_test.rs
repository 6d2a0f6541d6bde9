//! Composite endpoints: logo/trailer selection and payload slimming.

mod common;

use axum::http::StatusCode;
use common::{query_value, spawn_app};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn movie_payload(videos: Value) -> Value {
    json!({
        "id": 550,
        "title": "Fight Club",
        "runtime": 139,
        "images": {"logos": [
            {"iso_639_1": "fr", "file_path": "/fr.png"},
            {"iso_639_1": "en", "file_path": "/en.png"},
            {"iso_639_1": "es", "file_path": "/es.png"}
        ]},
        "videos": {"results": videos},
        "credits": {"cast": [{"id": 287, "name": "Brad Pitt"}], "crew": []},
        "recommendations": {"page": 1, "results": [{"id": 807}]}
    })
}

fn assert_slim(data: &Value) {
    let object = data.as_object().expect("data is an object");
    for key in ["images", "videos", "credits", "recommendations"] {
        assert!(!object.contains_key(key), "{key} must not be inside data");
    }
}

#[tokio::test]
async fn movie_details_are_reshaped() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .and(query_param("append_to_response", "images,videos,credits,recommendations"))
        .and(query_param("include_image_language", "en,null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_payload(json!([
            {"type": "Teaser", "site": "YouTube", "key": "teaser", "name": "Teaser"},
            {"type": "Trailer", "site": "YouTube", "key": "trailer", "name": "Official Trailer"}
        ]))))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getMovieDetailsEnhanced?id=550").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_slim(&res.body["data"]);
    assert_eq!(res.body["data"]["title"], "Fight Club");
    assert_eq!(res.body["logo"], "/en.png");
    assert_eq!(
        res.body["trailer"],
        json!({"key": "trailer", "name": "Official Trailer", "type": "Trailer"})
    );
    assert_eq!(res.body["credits"]["cast"][0]["name"], "Brad Pitt");
    assert_eq!(res.body["recommendations"]["results"][0]["id"], 807);
    assert_eq!(res.headers["cache-tag"], "movie:550");
}

#[tokio::test]
async fn featurette_only_gives_null_trailer() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_payload(json!([
            {"type": "Featurette", "site": "YouTube", "key": "f", "name": "Behind the scenes"}
        ]))))
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getMovieDetailsEnhanced?id=550").await;
    assert_eq!(res.body["trailer"], json!({"key": null, "name": null, "type": null}));
}

#[tokio::test]
async fn series_details_use_tv_path() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/tv/1399"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "images": {"logos": [{"iso_639_1": "de", "file_path": "/de.png"}]}
        })))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getTVSeriesDetailsEnhanced?id=1399").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_slim(&res.body["data"]);
    assert_eq!(res.body["logo"], Value::Null);
    assert_eq!(res.body["credits"], Value::Null);
    assert_eq!(res.body["trailer"]["key"], Value::Null);

    let requests = app.upstream_requests().await;
    assert_eq!(
        query_value(&requests[0], "append_to_response").as_deref(),
        Some("images,videos,credits,recommendations")
    );
}

#[tokio::test]
async fn person_details_split_credits() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/person/287"))
        .and(query_param("append_to_response", "movie_credits,tv_credits,images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 287,
            "name": "Brad Pitt",
            "movie_credits": {"cast": [{"id": 550}]},
            "tv_credits": {"cast": []},
            "images": {"profiles": []}
        })))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getPersonEnhanced?id=287").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"], json!({"id": 287, "name": "Brad Pitt"}));
    assert_eq!(res.body["movieCredits"]["cast"][0]["id"], 550);
    assert_eq!(res.body["tvCredits"], json!({"cast": []}));
    assert_eq!(res.body["images"], json!({"profiles": []}));
}

#[tokio::test]
async fn enhanced_routes_require_id() {
    let app = spawn_app().await;
    for route in [
        "/api/getMovieDetailsEnhanced",
        "/api/getTVSeriesDetailsEnhanced",
        "/api/getPersonEnhanced",
    ] {
        let res = app.get(route).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["error"], "Missing required parameters: id");
        assert!(res.body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn upstream_error_surfaces_status_text() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/movie/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getMovieDetailsEnhanced?id=1").await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "TMDB API error: 401 Unauthorized");
}
