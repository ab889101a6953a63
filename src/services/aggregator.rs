//! Incremental rating aggregation
//!
//! The title keeps an explicit running sum next to the rating count, so a new
//! or replaced rating updates the aggregate in O(1) without rescanning the
//! stored ratings. The average is always derived from `(sum, count)`.

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{AnnotationChange, Rating, RatingSummary, Title},
};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

/// A rating value that has passed range validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingValue(f64);

impl RatingValue {
    pub fn new(value: f64) -> AppResult<Self> {
        if !value.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(AppError::Validation(format!(
                "rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, value
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// Running `(sum, count)` pair for a title's ratings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingAggregate {
    pub sum: f64,
    pub count: u32,
}

impl RatingAggregate {
    pub fn new(sum: f64, count: u32) -> Self {
        Self { sum, count }
    }

    pub fn of(title: &Title) -> Self {
        Self::new(title.rating_sum, title.total_ratings)
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }

    /// Aggregate after a first rating from a new user
    pub fn admit(self, value: RatingValue) -> Self {
        Self {
            sum: self.sum + value.get(),
            count: self.count + 1,
        }
    }

    /// Aggregate after an existing rating changes from `previous` to `value`
    pub fn replace(self, previous: f64, value: RatingValue) -> Self {
        if previous == value.get() {
            return self;
        }

        Self {
            sum: (self.sum - previous + value.get()).max(0.0),
            count: self.count,
        }
    }

    pub fn summary(&self) -> RatingSummary {
        RatingSummary {
            average_rating: self.average(),
            total_ratings: self.count,
        }
    }
}

/// Plans a rating upsert against a title snapshot
///
/// A user's second rating replaces the first in place; the count only grows
/// for users who have not rated the title before.
pub fn plan_upsert(
    title: &Title,
    user_id: &str,
    value: RatingValue,
    now: DateTime<Utc>,
) -> (AnnotationChange, RatingAggregate) {
    let current = RatingAggregate::of(title);

    match title.rating_by_user(user_id) {
        Some(existing) => {
            let aggregate = current.replace(existing.rating, value);
            let change = AnnotationChange::ReplaceRating {
                user_id: user_id.to_string(),
                rating: value.get(),
                aggregate,
            };
            (change, aggregate)
        }
        None => {
            let aggregate = current.admit(value);
            let change = AnnotationChange::AppendRating {
                rating: Rating {
                    user_id: user_id.to_string(),
                    rating: value.get(),
                    created_at: now,
                },
                aggregate,
            };
            (change, aggregate)
        }
    }
}
