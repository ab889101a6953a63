/// TMDB metadata provider
///
/// API Flow:
/// 1. Details: /movie/{id} or /tv/{id} → canonical fields for a new catalog title
/// 2. Search: /search/movie or /search/tv → paginated hits with TMDB ids
///
/// Image paths come back relative; they are expanded against the image CDN
/// (w500 posters, w1280 backdrops) before leaving this module.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        SearchHit, SearchPage, TitleDetails, TitleKind, TitleMetadata, TmdbMovieDetails,
        TmdbSearchResponse, TmdbSearchResult, TmdbTvDetails,
    },
    services::providers::MetadataProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, image_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            image_url,
            cache,
        }
    }

    /// GET a TMDB endpoint and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        tracing::debug!(path = %path, "Fetching from TMDB");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB has no resource at {}", path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(path = %path, status = %status, body = %body, "TMDB request failed");
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn movie_details(&self, tmdb_id: u64) -> AppResult<TmdbMovieDetails> {
        cached!(
            self.cache,
            CacheKey::Details {
                kind: TitleKind::Movie,
                tmdb_id
            },
            self.get_json::<TmdbMovieDetails>(&format!("/movie/{}", tmdb_id), &[])
        )
    }

    async fn tv_details(&self, tmdb_id: u64) -> AppResult<TmdbTvDetails> {
        cached!(
            self.cache,
            CacheKey::Details {
                kind: TitleKind::Tv,
                tmdb_id
            },
            self.get_json::<TmdbTvDetails>(&format!("/tv/{}", tmdb_id), &[])
        )
    }

    async fn search_uncached(&self, kind: TitleKind, query: &str, page: u32) -> AppResult<SearchPage> {
        let raw: TmdbSearchResponse<TmdbSearchResult> = self
            .get_json(
                &format!("/search/{}", kind),
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;

        Ok(search_page(raw, kind, &self.image_url))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_metadata(&self, kind: TitleKind, tmdb_id: u64) -> AppResult<TitleMetadata> {
        let metadata = match kind {
            TitleKind::Movie => movie_metadata(self.movie_details(tmdb_id).await?, &self.image_url),
            TitleKind::Tv => tv_metadata(self.tv_details(tmdb_id).await?, &self.image_url),
        };

        tracing::info!(
            tmdb_id,
            kind = %kind,
            title = %metadata.title,
            "Fetched title metadata"
        );

        Ok(metadata)
    }

    async fn search(&self, kind: TitleKind, query: &str, page: u32) -> AppResult<SearchPage> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation(
                "query parameter is required".to_string(),
            ));
        }
        let page = page.max(1);

        cached!(
            self.cache,
            CacheKey::Search {
                kind,
                query: query.to_string(),
                page
            },
            self.search_uncached(kind, query, page)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

/// Full CDN URL for a relative TMDB image path, empty when there is no image
pub fn image_url(base: &str, size: &str, path: Option<&str>) -> String {
    match path {
        Some(path) if !path.is_empty() => format!("{}/{}{}", base, size, path),
        _ => String::new(),
    }
}

pub fn movie_metadata(details: TmdbMovieDetails, image_base: &str) -> TitleMetadata {
    TitleMetadata {
        tmdb_id: details.id,
        imdb_id: details.imdb_id.filter(|id| !id.is_empty()),
        title: details.title,
        overview: details.overview,
        poster_path: image_url(image_base, POSTER_SIZE, details.poster_path.as_deref()),
        backdrop_path: image_url(image_base, BACKDROP_SIZE, details.backdrop_path.as_deref()),
        release_date: details.release_date,
        genres: details.genres.into_iter().map(Into::into).collect(),
        details: TitleDetails::Movie {
            runtime: details.runtime,
        },
    }
}

pub fn tv_metadata(details: TmdbTvDetails, image_base: &str) -> TitleMetadata {
    TitleMetadata {
        tmdb_id: details.id,
        imdb_id: None,
        title: details.name,
        overview: details.overview,
        poster_path: image_url(image_base, POSTER_SIZE, details.poster_path.as_deref()),
        backdrop_path: image_url(image_base, BACKDROP_SIZE, details.backdrop_path.as_deref()),
        release_date: details.first_air_date,
        genres: details.genres.into_iter().map(Into::into).collect(),
        details: TitleDetails::Tv {
            number_of_seasons: details.number_of_seasons,
            number_of_episodes: details.number_of_episodes,
            in_production: details.in_production,
        },
    }
}

fn search_page(
    raw: TmdbSearchResponse<TmdbSearchResult>,
    kind: TitleKind,
    image_base: &str,
) -> SearchPage {
    SearchPage {
        page: raw.page,
        total_pages: raw.total_pages,
        total_results: raw.total_results,
        results: raw
            .results
            .into_iter()
            .map(|r| SearchHit {
                tmdb_id: r.id,
                media_type: kind,
                title: r.title,
                overview: r.overview,
                poster_path: image_url(image_base, POSTER_SIZE, r.poster_path.as_deref()),
                backdrop_path: image_url(image_base, BACKDROP_SIZE, r.backdrop_path.as_deref()),
                release_date: r.release_date,
                vote_average: r.vote_average,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TmdbGenre;

    const IMAGES: &str = "https://image.tmdb.org/t/p";

    #[test]
    fn test_image_url_expands_relative_path() {
        assert_eq!(
            image_url(IMAGES, POSTER_SIZE, Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_image_url_empty_without_path() {
        assert_eq!(image_url(IMAGES, POSTER_SIZE, None), "");
        assert_eq!(image_url(IMAGES, BACKDROP_SIZE, Some("")), "");
    }

    #[test]
    fn test_movie_metadata_conversion() {
        let details = TmdbMovieDetails {
            id: 603,
            imdb_id: Some("tt0133093".to_string()),
            title: "The Matrix".to_string(),
            overview: "Neo".to_string(),
            poster_path: Some("/p.jpg".to_string()),
            backdrop_path: None,
            release_date: "1999-03-30".to_string(),
            runtime: Some(136),
            genres: vec![TmdbGenre {
                id: 28,
                name: "Action".to_string(),
            }],
        };

        let metadata = movie_metadata(details, IMAGES);
        assert_eq!(metadata.tmdb_id, 603);
        assert_eq!(metadata.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(metadata.poster_path, "https://image.tmdb.org/t/p/w500/p.jpg");
        assert_eq!(metadata.backdrop_path, "");
        assert_eq!(metadata.genres[0].genre_name, "Action");
        assert_eq!(metadata.details, TitleDetails::Movie { runtime: Some(136) });
    }

    #[test]
    fn test_tv_metadata_conversion() {
        let details = TmdbTvDetails {
            id: 1396,
            name: "Breaking Bad".to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: Some("/b.jpg".to_string()),
            first_air_date: "2008-01-20".to_string(),
            number_of_seasons: Some(5),
            number_of_episodes: Some(62),
            in_production: false,
            genres: vec![],
        };

        let metadata = tv_metadata(details, IMAGES);
        assert_eq!(metadata.title, "Breaking Bad");
        assert_eq!(metadata.release_date, "2008-01-20");
        assert_eq!(metadata.details.kind(), TitleKind::Tv);
        assert_eq!(
            metadata.backdrop_path,
            "https://image.tmdb.org/t/p/w1280/b.jpg"
        );
    }

    #[test]
    fn test_search_page_tags_hits_with_kind() {
        let raw = TmdbSearchResponse {
            page: 1,
            total_pages: 1,
            total_results: 1,
            results: vec![TmdbSearchResult {
                id: 1396,
                title: "Breaking Bad".to_string(),
                overview: String::new(),
                poster_path: None,
                backdrop_path: None,
                release_date: "2008-01-20".to_string(),
                vote_average: 8.9,
            }],
        };

        let page = search_page(raw, TitleKind::Tv, IMAGES);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].media_type, TitleKind::Tv);
        assert_eq!(page.results[0].tmdb_id, 1396);
    }
}
