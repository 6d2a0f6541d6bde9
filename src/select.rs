//! Reshaping of composite TMDB payloads.
//!
//! The enhanced endpoints fetch a record together with its appended
//! sub-resources in one upstream call. This module picks the English logo
//! and the best promotional video out of those sub-resources, and moves the
//! appended keys out of the primary record so the response stays flat.

use serde::Serialize;
use serde_json::{Map, Value};
use supawatch_common::Trailer;

/// Sub-resources appended to movie and series detail calls.
pub const MEDIA_APPENDS: [&str; 4] = ["images", "videos", "credits", "recommendations"];

/// Sub-resources appended to person detail calls.
pub const PERSON_APPENDS: [&str; 3] = ["movie_credits", "tv_credits", "images"];

const LOGO_LANGUAGE: &str = "en";
const VIDEO_SITE: &str = "YouTube";

/// Video types eligible as a trailer, best first.
const VIDEO_PREFERENCE: [&str; 2] = ["Trailer", "Teaser"];

/// File path of the first English logo in a TMDB `images` object.
///
/// Logos in other languages are never used as a fallback.
pub fn select_logo(images: Option<&Value>) -> Option<String> {
    images?
        .get("logos")?
        .as_array()?
        .iter()
        .find(|logo| logo.get("iso_639_1").and_then(Value::as_str) == Some(LOGO_LANGUAGE))
        .and_then(|logo| logo.get("file_path"))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Pick the promotional video from a TMDB `videos` object.
///
/// The first YouTube `Trailer` wins, then the first YouTube `Teaser`.
/// Anything else (featurettes, clips, other hosts) is ignored, and the
/// all-null [`Trailer`] is returned when nothing qualifies.
pub fn select_trailer(videos: Option<&Value>) -> Trailer {
    let Some(results) = videos
        .and_then(|v| v.get("results"))
        .and_then(Value::as_array)
    else {
        return Trailer::none();
    };

    VIDEO_PREFERENCE
        .iter()
        .find_map(|wanted| {
            results.iter().find(|video| {
                str_field(video, "type") == Some(wanted)
                    && str_field(video, "site") == Some(VIDEO_SITE)
            })
        })
        .map(|video| Trailer {
            key: str_field(video, "key").map(String::from),
            name: str_field(video, "name").map(String::from),
            kind: str_field(video, "type").map(String::from),
        })
        .unwrap_or_default()
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Remove `keys` from a JSON object and return them in the same order.
/// Keys that were absent (or a non-object `data`) yield `null`.
pub fn detach_appended<const N: usize>(data: &mut Value, keys: [&str; N]) -> [Value; N] {
    keys.map(|key| {
        data.as_object_mut()
            .and_then(|object| object.remove(key))
            .unwrap_or(Value::Null)
    })
}

/// Body of the enhanced movie and series endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancedDetails {
    pub data: Value,
    pub logo: Option<String>,
    pub trailer: Trailer,
    pub credits: Value,
    pub recommendations: Value,
}

impl EnhancedDetails {
    /// Split a `/movie/{id}` or `/tv/{id}` payload fetched with
    /// [`MEDIA_APPENDS`].
    pub fn from_upstream(mut data: Value) -> Self {
        let [images, videos, credits, recommendations] = detach_appended(&mut data, MEDIA_APPENDS);

        Self {
            logo: select_logo(Some(&images)),
            trailer: select_trailer(Some(&videos)),
            data,
            credits,
            recommendations,
        }
    }
}

/// Body of the enhanced person endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedPerson {
    pub data: Value,
    pub movie_credits: Value,
    pub tv_credits: Value,
    pub images: Value,
}

impl EnhancedPerson {
    /// Split a `/person/{id}` payload fetched with [`PERSON_APPENDS`].
    pub fn from_upstream(mut data: Value) -> Self {
        let [movie_credits, tv_credits, images] = detach_appended(&mut data, PERSON_APPENDS);
        Self {
            data,
            movie_credits,
            tv_credits,
            images,
        }
    }
}

/// `{data: <upstream body>}`, the envelope of every plain proxy endpoint.
pub fn envelope(data: Value) -> Value {
    let mut body = Map::with_capacity(1);
    body.insert("data".into(), data);
    Value::Object(body)
}
