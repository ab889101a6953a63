use serde::{Deserialize, Serialize};

mod annotation;
mod identity;
mod patch;
mod title;

pub use annotation::{
    Annotations, Comment, CommentList, Rating, RatingSummary, RatingUpsert, Review, ReviewList,
};
pub use identity::{Identity, Role};
pub use patch::{AnnotationChange, TitlePatch};
pub use title::{CatalogId, Genre, Title, TitleDetails, TitleKind, TitleMetadata};

#[cfg(test)]
pub(crate) use title::fixtures;

// ============================================================================
// Request Types
// ============================================================================

/// Request to add a title to the catalog from TMDB
#[derive(Debug, Deserialize)]
pub struct AddTitleRequest {
    pub tmdb_id: u64,
    pub media_type: TitleKind,
    pub video_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: f64,
}

// ============================================================================
// TMDB API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

impl From<TmdbGenre> for Genre {
    fn from(genre: TmdbGenre) -> Self {
        Genre {
            genre_id: genre.id,
            genre_name: genre.name,
        }
    }
}

/// Response from GET /movie/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub imdb_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

/// Response from GET /tv/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbTvDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: String,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub in_production: bool,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

/// A single search hit, normalized across movie and TV searches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub tmdb_id: u64,
    pub media_type: TitleKind,
    pub title: String,
    pub overview: String,
    pub poster_path: String,
    pub backdrop_path: String,
    pub release_date: String,
    pub vote_average: f64,
}

/// Paginated search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchPage {
    pub page: u32,
    pub results: Vec<SearchHit>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Raw paginated search envelope returned by TMDB
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Search result entry from /search/movie or /search/tv
///
/// Movies carry `title`/`release_date`, TV shows `name`/`first_air_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResult {
    pub id: u64,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, alias = "first_air_date")]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_title_request_parses_media_type() {
        let request: AddTitleRequest = serde_json::from_str(
            r#"{"tmdb_id": 1396, "media_type": "tv", "video_url": "https://example.com/bb.mp4"}"#,
        )
        .unwrap();
        assert_eq!(request.media_type, TitleKind::Tv);
        assert_eq!(request.tmdb_id, 1396);
    }

    #[test]
    fn test_search_result_reads_tv_field_names() {
        let hit: TmdbSearchResult = serde_json::from_str(
            r#"{"id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20", "poster_path": null}"#,
        )
        .unwrap();
        assert_eq!(hit.title, "Breaking Bad");
        assert_eq!(hit.release_date, "2008-01-20");
        assert_eq!(hit.poster_path, None);
    }

    #[test]
    fn test_movie_details_tolerate_missing_optional_fields() {
        let details: TmdbMovieDetails =
            serde_json::from_str(r#"{"id": 603, "title": "The Matrix"}"#).unwrap();
        assert_eq!(details.runtime, None);
        assert!(details.genres.is_empty());
    }
}
