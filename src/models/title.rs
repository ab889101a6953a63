use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{Comment, Rating, Review};

/// External catalog identifier for a title, unique per title document
///
/// Formed from the media kind and the TMDB id (e.g. "movie-603", "tv-1396")
/// since TMDB reuses numeric ids across movies and TV shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Catalog id for a TMDB-backed title
    pub fn for_tmdb(kind: TitleKind, tmdb_id: u64) -> Self {
        Self(format!("{}-{}", kind, tmdb_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Movie,
    Tv,
}

impl TitleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleKind::Movie => "movie",
            TitleKind::Tv => "tv",
        }
    }
}

impl Display for TitleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub genre_id: u32,
    pub genre_name: String,
}

/// Metadata fields that differ between movies and TV shows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum TitleDetails {
    Movie {
        #[serde(default)]
        runtime: Option<u32>,
    },
    Tv {
        #[serde(default)]
        number_of_seasons: Option<u32>,
        #[serde(default)]
        number_of_episodes: Option<u32>,
        #[serde(default)]
        in_production: bool,
    },
}

impl TitleDetails {
    pub fn kind(&self) -> TitleKind {
        match self {
            TitleDetails::Movie { .. } => TitleKind::Movie,
            TitleDetails::Tv { .. } => TitleKind::Tv,
        }
    }
}

/// Canonical title fields supplied by the metadata source at creation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleMetadata {
    pub tmdb_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: String,
    #[serde(default)]
    pub backdrop_path: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub details: TitleDetails,
}

/// A movie or TV show catalog entry, the aggregate root for all annotations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub id: CatalogId,
    pub metadata: TitleMetadata,
    pub video_url: String,
    pub reviews: Vec<Review>,
    pub comments: Vec<Comment>,
    pub ratings: Vec<Rating>,
    /// Running sum of every stored rating value
    pub rating_sum: f64,
    pub average_rating: f64,
    pub total_ratings: u32,
    pub added_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Title {
    /// Creates a title with empty annotation collections
    pub fn new(
        metadata: TitleMetadata,
        video_url: String,
        added_by: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CatalogId::for_tmdb(metadata.details.kind(), metadata.tmdb_id),
            metadata,
            video_url,
            reviews: Vec::new(),
            comments: Vec::new(),
            ratings: Vec::new(),
            rating_sum: 0.0,
            average_rating: 0.0,
            total_ratings: 0,
            added_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> TitleKind {
        self.metadata.details.kind()
    }

    pub fn find_review(&self, review_id: &str) -> Option<&Review> {
        self.reviews.iter().find(|r| r.review_id == review_id)
    }

    pub fn review_by_user(&self, user_id: &str) -> Option<&Review> {
        self.reviews.iter().find(|r| r.user_id == user_id)
    }

    pub fn find_comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.comment_id == comment_id)
    }

    pub fn rating_by_user(&self, user_id: &str) -> Option<&Rating> {
        self.ratings.iter().find(|r| r.user_id == user_id)
    }
}
