//! Per-resource proxy endpoints against a mocked TMDB.

mod common;

use axum::http::StatusCode;
use common::{query_value, spawn_app, spawn_app_with, TOKEN};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn list_defaults_to_first_page_and_wraps_data() {
    let app = spawn_app().await;
    let upstream = json!({"page": 1, "results": [{"id": 550}], "total_pages": 10});

    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(query_param("page", "1"))
        .and(query_param("language", "en-US"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(header("accept", "application/json"))
        .respond_with(ok(upstream.clone()))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getMovieList?list=popular").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"data": upstream}));
    assert_eq!(
        res.headers["cache-control"],
        "public, s-maxage=3600, stale-while-revalidate=86400"
    );
    assert!(res.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn language_is_first_query_param() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/tv/top_rated"))
        .respond_with(ok(json!({"results": []})))
        .mount(&app.tmdb)
        .await;

    app.get("/api/getTVList?list=top_rated&page=3").await;

    let requests = app.upstream_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("language=en-US&page=3"));
    assert_eq!(
        requests[0].headers.get("cache-control").unwrap(),
        "max-age=900"
    );
}

#[tokio::test]
async fn missing_parameters_are_listed() {
    let app = spawn_app().await;
    let cases = [
        ("/api/getMovieList", "list"),
        ("/api/getTVList", "list"),
        ("/api/getMovieDiscover", "genre"),
        ("/api/getSearch", "query"),
        ("/api/getDetails", "id"),
        ("/api/getCredits", "id"),
        ("/api/getTVCredits", "id"),
        ("/api/getMovieImages", "id"),
        ("/api/getTVImages", "id"),
        ("/api/getTrailer", "id"),
        ("/api/getTVTrailer", "id"),
        ("/api/getSimilar", "id"),
        ("/api/getPeople", "id"),
        ("/api/getEpisodes", "id, season"),
    ];

    for (route, missing) in cases {
        let res = app.get(route).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{route}");
        assert_eq!(
            res.body["error"],
            format!("Missing required parameters: {missing}"),
            "{route}"
        );
        let timestamp = res.body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    assert!(app.upstream_requests().await.is_empty());
}

#[tokio::test]
async fn empty_value_counts_as_missing() {
    let app = spawn_app().await;
    let res = app.get("/api/getEpisodes?id=1399&season=").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Missing required parameters: season");
}

#[tokio::test]
async fn invalid_page_is_rejected() {
    let app = spawn_app().await;
    let res = app.get("/api/getMovieList?list=popular&page=abc").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].as_str().unwrap().contains("page"));
}

#[tokio::test]
async fn non_boolean_include_adult_is_rejected_before_upstream() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(ok(json!({"results": []})))
        .expect(0)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getSearch?query=alien&include_adult=yes").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body["error"],
        "Invalid parameter 'include_adult': expected true or false, got 'yes'"
    );
}

#[tokio::test]
async fn upstream_failure_maps_to_500() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/movie/0"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getDetails?id=0").await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "TMDB API error: 404 Not Found");
}

#[tokio::test]
async fn missing_credential_never_calls_upstream() {
    let app = spawn_app_with(|config| config.tmdb.api_key = None).await;
    Mock::given(method("GET"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getPeople?id=287").await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "TMDB API key is not configured");
}

#[tokio::test]
async fn discover_sends_genre_and_sort() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "28"))
        .and(query_param("page", "2"))
        .and(query_param("sort_by", "popularity.desc"))
        .respond_with(ok(json!({"results": []})))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getMovieDiscover?genre=28&page=2").await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn search_defaults_adult_to_false() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(ok(json!({"results": []})))
        .mount(&app.tmdb)
        .await;

    app.get("/api/getSearch?query=star%20wars").await;
    app.get("/api/getSearch?query=alien&include_adult=true&page=2").await;

    let requests = app.upstream_requests().await;
    assert_eq!(query_value(&requests[0], "query").as_deref(), Some("star wars"));
    assert_eq!(query_value(&requests[0], "include_adult").as_deref(), Some("false"));
    assert_eq!(query_value(&requests[0], "page").as_deref(), Some("1"));
    assert_eq!(query_value(&requests[1], "include_adult").as_deref(), Some("true"));
    assert_eq!(
        requests[0].headers.get("cache-control").unwrap(),
        "max-age=300"
    );
}

#[tokio::test]
async fn type_parameter_selects_tv() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/tv/1399/credits"))
        .respond_with(ok(json!({"cast": []})))
        .expect(1)
        .mount(&app.tmdb)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/1399/credits"))
        .respond_with(ok(json!({"cast": []})))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    assert_eq!(app.get("/api/getCredits?id=1399&type=tv").await.status, StatusCode::OK);
    assert_eq!(app.get("/api/getCredits?id=1399&type=other").await.status, StatusCode::OK);
}

#[tokio::test]
async fn images_request_english_and_untagged() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/tv/1399/images"))
        .and(query_param("include_image_language", "en,null"))
        .respond_with(ok(json!({"logos": []})))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getTVImages?id=1399").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["cache-tag"], "tv:1399");
}

#[tokio::test]
async fn trailer_route_returns_selected_video() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/movie/550/videos"))
        .respond_with(ok(json!({"results": [
            {"type": "Featurette", "site": "YouTube", "key": "f", "name": "Featurette"},
            {"type": "Teaser", "site": "YouTube", "key": "t", "name": "Teaser"}
        ]})))
        .mount(&app.tmdb)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/1/videos"))
        .respond_with(ok(json!({"results": [
            {"type": "Clip", "site": "YouTube", "key": "c", "name": "Clip"}
        ]})))
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getTrailer?id=550").await;
    assert_eq!(res.body, json!({"key": "t", "name": "Teaser", "type": "Teaser"}));

    let res = app.get("/api/getTVTrailer?id=1").await;
    assert_eq!(res.body, json!({"key": null, "name": null, "type": null}));
}

#[tokio::test]
async fn episodes_and_genres_routes() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/tv/1399/season/2"))
        .respond_with(ok(json!({"episodes": []})))
        .expect(1)
        .mount(&app.tmdb)
        .await;
    Mock::given(method("GET"))
        .and(path("/genre/tv/list"))
        .respond_with(ok(json!({"genres": [{"id": 18, "name": "Drama"}]})))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getEpisodes?id=1399&season=2").await;
    assert_eq!(res.body, json!({"data": {"episodes": []}}));

    let res = app.get("/api/getGenres?type=tv").await;
    assert_eq!(res.body["data"]["genres"][0]["name"], "Drama");
}

#[tokio::test]
async fn similar_uses_type_and_page() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/tv/1399/similar"))
        .and(query_param("page", "4"))
        .respond_with(ok(json!({"results": []})))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getSimilar?id=1399&type=tv&page=4").await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn path_segments_are_encoded() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .respond_with(ok(json!({})))
        .mount(&app.tmdb)
        .await;

    app.get("/api/getPeople?id=1%2F..%2Fsecret").await;

    let requests = app.upstream_requests().await;
    assert_eq!(requests[0].url.path(), "/person/1%2F..%2Fsecret");
}

#[tokio::test]
async fn concurrent_identical_requests_share_one_upstream_call() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .respond_with(ok(json!({"id": 550})).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let (a, b) = tokio::join!(
        app.get("/api/getDetails?id=550"),
        app.get("/api/getDetails?id=550")
    );
    assert_eq!(a.body, json!({"data": {"id": 550}}));
    assert_eq!(b.body, a.body);
}

#[tokio::test]
async fn sequential_requests_are_not_cached() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .respond_with(ok(json!({"id": 550})))
        .expect(2)
        .mount(&app.tmdb)
        .await;

    app.get("/api/getDetails?id=550").await;
    app.get("/api/getDetails?id=550").await;
}

#[tokio::test]
async fn coalescing_can_be_disabled() {
    let app = spawn_app_with(|config| config.tmdb.coalesce_inflight = false).await;
    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .respond_with(ok(json!({"id": 550})).set_delay(Duration::from_millis(200)))
        .expect(2)
        .mount(&app.tmdb)
        .await;

    tokio::join!(
        app.get("/api/getDetails?id=550"),
        app.get("/api/getDetails?id=550")
    );
}

#[tokio::test]
async fn rate_limited_upstream_is_retried_when_enabled() {
    let app = spawn_app_with(|config| config.tmdb.max_retries = 1).await;
    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&app.tmdb)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .respond_with(ok(json!({"id": 550})))
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getDetails?id=550").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.upstream_requests().await.len(), 2);
}

#[tokio::test]
async fn rate_limited_upstream_fails_by_default() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&app.tmdb)
        .await;

    let res = app.get("/api/getDetails?id=550").await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "TMDB API error: 429 Too Many Requests");
}

#[tokio::test]
async fn health_and_request_id() {
    let app = spawn_app().await;
    let res = app.get("/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.headers.contains_key("x-request-id"));
}
