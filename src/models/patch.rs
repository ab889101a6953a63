use chrono::{DateTime, Utc};

use super::{Comment, Rating, Review, Title};
use crate::services::aggregator::RatingAggregate;

/// One nested-collection change plus the derived fields it moves
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationChange {
    AppendReview(Review),
    EditReview {
        review_id: String,
        comment: String,
    },
    RemoveReview {
        review_id: String,
    },
    AppendComment(Comment),
    EditComment {
        comment_id: String,
        content: String,
    },
    RemoveComment {
        comment_id: String,
    },
    AppendRating {
        rating: Rating,
        aggregate: RatingAggregate,
    },
    ReplaceRating {
        user_id: String,
        rating: f64,
        aggregate: RatingAggregate,
    },
}

impl AnnotationChange {
    /// Short name used in logs
    pub fn label(&self) -> &'static str {
        match self {
            AnnotationChange::AppendReview(_) => "append_review",
            AnnotationChange::EditReview { .. } => "edit_review",
            AnnotationChange::RemoveReview { .. } => "remove_review",
            AnnotationChange::AppendComment(_) => "append_comment",
            AnnotationChange::EditComment { .. } => "edit_comment",
            AnnotationChange::RemoveComment { .. } => "remove_comment",
            AnnotationChange::AppendRating { .. } => "append_rating",
            AnnotationChange::ReplaceRating { .. } => "replace_rating",
        }
    }
}

/// A typed update applied to a title document as a single atomic step
#[derive(Debug, Clone, PartialEq)]
pub struct TitlePatch {
    pub change: AnnotationChange,
    pub at: DateTime<Utc>,
}

impl TitlePatch {
    pub fn new(change: AnnotationChange, at: DateTime<Utc>) -> Self {
        Self { change, at }
    }
}

impl Title {
    /// Applies a patch in place and refreshes the title's `updated_at`
    pub fn apply(&mut self, patch: &TitlePatch) {
        let at = patch.at;

        match &patch.change {
            AnnotationChange::AppendReview(review) => self.reviews.push(review.clone()),
            AnnotationChange::EditReview { review_id, comment } => {
                if let Some(review) = self.reviews.iter_mut().find(|r| &r.review_id == review_id) {
                    review.comment = comment.clone();
                    review.updated_at = at;
                }
            }
            AnnotationChange::RemoveReview { review_id } => {
                self.reviews.retain(|r| &r.review_id != review_id);
            }
            AnnotationChange::AppendComment(comment) => self.comments.push(comment.clone()),
            AnnotationChange::EditComment {
                comment_id,
                content,
            } => {
                if let Some(comment) = self
                    .comments
                    .iter_mut()
                    .find(|c| &c.comment_id == comment_id)
                {
                    comment.content = content.clone();
                    comment.updated_at = at;
                }
            }
            AnnotationChange::RemoveComment { comment_id } => {
                self.comments.retain(|c| &c.comment_id != comment_id);
            }
            AnnotationChange::AppendRating { rating, aggregate } => {
                self.ratings.push(rating.clone());
                self.set_aggregate(*aggregate);
            }
            AnnotationChange::ReplaceRating {
                user_id,
                rating,
                aggregate,
            } => {
                if let Some(existing) = self.ratings.iter_mut().find(|r| &r.user_id == user_id) {
                    existing.rating = *rating;
                    existing.created_at = at;
                }
                self.set_aggregate(*aggregate);
            }
        }

        self.updated_at = at;
    }

    fn set_aggregate(&mut self, aggregate: RatingAggregate) {
        self.rating_sum = aggregate.sum;
        self.total_ratings = aggregate.count;
        self.average_rating = aggregate.average();
    }
}
