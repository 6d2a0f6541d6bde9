//! HTTP client for the supawatch proxy and the page sources built on it.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use supawatch_common::{
    Credits, Error, Genre, MediaDetails, MediaItem, MediaKind, Page, Result, Trailer,
};
use tracing::{debug, warn};

use crate::source::{PageSource, SearchSource};

/// Items on the first page that get a trailer lookup.
pub const TRAILER_FANOUT: usize = 8;
/// Page size of the locally paged filmography.
pub const FILMOGRAPHY_PAGE_SIZE: usize = 20;

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

/// Body of the enhanced movie/series endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailsView {
    pub data: MediaDetails,
    pub logo: Option<String>,
    pub trailer: Trailer,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub recommendations: Option<Page>,
}

#[derive(Deserialize)]
struct PersonView {
    #[serde(default, rename = "movieCredits")]
    movie_credits: Option<PersonCredits>,
}

#[derive(Deserialize)]
struct PersonCredits {
    #[serde(default)]
    cast: Vec<MediaItem>,
}

/// Client for the proxy's `/api` surface.
#[derive(Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    /// `base_url` is the proxy origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, route: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/api/{}", self.base_url, route);
        debug!(route, "Proxy request");

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("proxy request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(Error::Transport(format!(
                "proxy returned {}: {}",
                status.as_u16(),
                message
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| Error::Transport(format!("proxy parse error: {e}")))
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.get::<Envelope<T>>(route, query).await.map(|e| e.data)
    }

    /// One page of a named list (`popular`, `top_rated`, ...).
    pub async fn list_page(&self, kind: MediaKind, list: &str, page: u32) -> Result<Page> {
        let route = match kind {
            MediaKind::Movie => "getMovieList",
            MediaKind::Tv => "getTVList",
        };
        self.get_data(route, &[("list", list.to_string()), ("page", page.to_string())])
            .await
    }

    pub async fn discover_page(&self, genre: u64, page: u32) -> Result<Page> {
        self.get_data(
            "getMovieDiscover",
            &[("genre", genre.to_string()), ("page", page.to_string())],
        )
        .await
    }

    pub async fn similar_page(&self, kind: MediaKind, id: u64, page: u32) -> Result<Page> {
        self.get_data(
            "getSimilar",
            &[
                ("id", id.to_string()),
                ("type", kind.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    pub async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>> {
        let list: GenreList = self
            .get_data("getGenres", &[("type", kind.to_string())])
            .await?;
        Ok(list.genres)
    }

    pub async fn trailer(&self, kind: MediaKind, id: u64) -> Result<Trailer> {
        self.get("getTrailer", &[("id", id.to_string()), ("type", kind.to_string())])
            .await
    }

    /// Trailers for the first [`TRAILER_FANOUT`] items, fetched concurrently.
    ///
    /// Failed lookups are logged and left out.
    pub async fn trailers_for(&self, kind: MediaKind, items: &[MediaItem]) -> Vec<(u64, Trailer)> {
        let lookups = items.iter().take(TRAILER_FANOUT).map(|item| async move {
            (item.id, self.trailer(kind, item.id).await)
        });

        join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(trailer) => Some((id, trailer)),
                Err(e) => {
                    warn!(id, error = %e, "Trailer lookup failed");
                    None
                }
            })
            .collect()
    }

    pub async fn details(&self, kind: MediaKind, id: u64) -> Result<DetailsView> {
        let route = match kind {
            MediaKind::Movie => "getMovieDetailsEnhanced",
            MediaKind::Tv => "getTVSeriesDetailsEnhanced",
        };
        self.get(route, &[("id", id.to_string())]).await
    }

    /// A person's movie roles as a locally paged source.
    pub async fn filmography(&self, person_id: u64) -> Result<FilmographySource> {
        let person: PersonView = self
            .get("getPersonEnhanced", &[("id", person_id.to_string())])
            .await?;
        let cast = person.movie_credits.map(|c| c.cast).unwrap_or_default();
        Ok(FilmographySource::new(cast, FILMOGRAPHY_PAGE_SIZE))
    }

    pub fn list_source(&self, kind: MediaKind, list: impl Into<String>) -> ListSource {
        ListSource {
            client: self.clone(),
            kind,
            list: list.into(),
        }
    }

    pub fn discover_source(&self, genre: u64) -> DiscoverSource {
        DiscoverSource {
            client: self.clone(),
            genre,
        }
    }

    pub fn similar_source(&self, kind: MediaKind, id: u64) -> SimilarSource {
        SimilarSource {
            client: self.clone(),
            kind,
            id,
        }
    }
}

#[async_trait]
impl SearchSource for ProxyClient {
    async fn search(&self, query: &str, include_adult: bool, page: u32) -> Result<Page> {
        self.get_data(
            "getSearch",
            &[
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("include_adult", include_adult.to_string()),
            ],
        )
        .await
    }
}

/// `popular`, `top_rated`, ... for movies or series.
pub struct ListSource {
    client: ProxyClient,
    kind: MediaKind,
    list: String,
}

#[async_trait]
impl PageSource for ListSource {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        self.client.list_page(self.kind, &self.list, page).await
    }
}

/// Movies of one genre, most popular first.
pub struct DiscoverSource {
    client: ProxyClient,
    genre: u64,
}

#[async_trait]
impl PageSource for DiscoverSource {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        self.client.discover_page(self.genre, page).await
    }
}

/// Titles similar to one movie or series.
pub struct SimilarSource {
    client: ProxyClient,
    kind: MediaKind,
    id: u64,
}

#[async_trait]
impl PageSource for SimilarSource {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        self.client.similar_page(self.kind, self.id, page).await
    }
}

/// Cast credits sorted by popularity, one entry per title, served in
/// fixed-size pages from memory.
pub struct FilmographySource {
    credits: Arc<Vec<MediaItem>>,
    page_size: usize,
}

impl FilmographySource {
    pub fn new(mut credits: Vec<MediaItem>, page_size: usize) -> Self {
        credits.sort_by(|a, b| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut seen = HashSet::new();
        credits.retain(|c| seen.insert(c.id));

        Self {
            credits: Arc::new(credits),
            page_size: page_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.credits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }
}

#[async_trait]
impl PageSource for FilmographySource {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        let start = (page.max(1) as usize - 1) * self.page_size;
        let results: Vec<MediaItem> = self
            .credits
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        let total_pages = self.credits.len().div_ceil(self.page_size) as u32;
        Ok(Page {
            page,
            results,
            total_pages,
            total_results: self.credits.len() as u64,
        })
    }
}
