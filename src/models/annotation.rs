use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's written review of a title; at most one per user and title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub review_id: String,
    pub user_id: String,
    /// Display name at the time the review was written
    pub user_name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A free-text comment on a title; users may post any number of these
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub comment_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's numeric score for a title; at most one per user and title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub user_id: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

/// The derived rating pair exposed to readers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: u32,
}

/// Outcome of a rating upsert, telling a first rating apart from a replacement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingUpsert {
    Added(RatingSummary),
    Replaced(RatingSummary),
}

impl RatingUpsert {
    pub fn summary(&self) -> RatingSummary {
        match self {
            RatingUpsert::Added(summary) | RatingUpsert::Replaced(summary) => *summary,
        }
    }
}

/// Everything attached to a title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Annotations {
    pub reviews: Vec<Review>,
    pub comments: Vec<Comment>,
    pub ratings: RatingSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewList {
    pub reviews: Vec<Review>,
    pub average_rating: f64,
    pub total_ratings: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentList {
    pub comments: Vec<Comment>,
    pub total: usize,
}
