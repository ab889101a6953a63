//! Annotation store: reviews, comments and ratings on a title
//!
//! Every mutation is a read → plan → conditional apply cycle against the title
//! document. Planning runs against a versioned snapshot and produces a typed
//! patch; the store applies it only if the version is unchanged, otherwise the
//! cycle restarts from a fresh read, up to `max_attempts` times.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::{PatchOutcome, TitleStore},
    error::{AppError, AppResult},
    models::{
        AnnotationChange, Annotations, CatalogId, Comment, CommentList, Identity, RatingSummary,
        RatingUpsert, Review, ReviewList, Title, TitlePatch,
    },
    services::{
        aggregator::{self, RatingAggregate, RatingValue},
        authorizer,
    },
};

pub const REVIEW_MIN_CHARS: usize = 10;
pub const REVIEW_MAX_CHARS: usize = 1000;
pub const COMMENT_MIN_CHARS: usize = 1;
pub const COMMENT_MAX_CHARS: usize = 500;

/// Owns the annotation collections of every title
///
/// Holds no state of its own beyond the injected store; clones share it.
#[derive(Clone)]
pub struct AnnotationStore {
    store: Arc<dyn TitleStore>,
    max_attempts: u32,
}

impl AnnotationStore {
    /// Creates a store that retries a conflicting write up to `max_attempts` times
    pub fn new(store: Arc<dyn TitleStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    // ============================================================================
    // Reads
    // ============================================================================

    async fn snapshot(&self, title_id: &CatalogId) -> AppResult<Title> {
        self.store
            .load(title_id)
            .await?
            .map(|v| v.title)
            .ok_or_else(|| title_not_found(title_id))
    }

    /// Returns every review and comment on a title plus its rating summary
    ///
    /// Fails with `NotFound` when the title does not exist.
    pub async fn get_annotations(&self, title_id: &CatalogId) -> AppResult<Annotations> {
        let title = self.snapshot(title_id).await?;
        Ok(Annotations {
            ratings: RatingSummary {
                average_rating: title.average_rating,
                total_ratings: title.total_ratings,
            },
            reviews: title.reviews,
            comments: title.comments,
        })
    }

    /// Returns the reviews of a title alongside its average rating and rating count
    pub async fn list_reviews(&self, title_id: &CatalogId) -> AppResult<ReviewList> {
        let title = self.snapshot(title_id).await?;
        Ok(ReviewList {
            reviews: title.reviews,
            average_rating: title.average_rating,
            total_ratings: title.total_ratings,
        })
    }

    /// Returns the comments of a title in insertion order, with their count
    pub async fn list_comments(&self, title_id: &CatalogId) -> AppResult<CommentList> {
        let title = self.snapshot(title_id).await?;
        Ok(CommentList {
            total: title.comments.len(),
            comments: title.comments,
        })
    }

    // ============================================================================
    // Reviews
    // ============================================================================

    /// Adds the actor's review to a title
    ///
    /// A user holds at most one review per title. The text is trimmed and must
    /// be `REVIEW_MIN_CHARS..=REVIEW_MAX_CHARS` characters long.
    ///
    /// Errors:
    /// - `Validation` for text outside the length bounds, checked before any read
    /// - `NotFound` when the title does not exist
    /// - `Duplicate` when the actor already reviewed the title
    /// - `Conflict` when every write attempt lost a race
    pub async fn add_review(
        &self,
        title_id: &CatalogId,
        actor: &Identity,
        text: &str,
    ) -> AppResult<Review> {
        let text = validate_text("review", text, REVIEW_MIN_CHARS, REVIEW_MAX_CHARS)?;

        self.mutate(title_id, |title, now| {
            if title.review_by_user(&actor.user_id).is_some() {
                return Err(AppError::Duplicate(
                    "You have already reviewed this title. Use the update endpoint to modify your review."
                        .to_string(),
                ));
            }

            let review = Review {
                review_id: new_annotation_id(),
                user_id: actor.user_id.clone(),
                user_name: actor.display_name.clone(),
                comment: text.clone(),
                created_at: now,
                updated_at: now,
            };
            Ok((AnnotationChange::AppendReview(review.clone()), review))
        })
        .await
    }

    /// Rewrites the text of a review
    ///
    /// Only the author may edit; elevated roles get no bypass here.
    /// Fails with `NotFound` for an unknown review and `Forbidden` for anyone
    /// but the author.
    pub async fn update_review(
        &self,
        title_id: &CatalogId,
        review_id: &str,
        actor: &Identity,
        text: &str,
    ) -> AppResult<()> {
        let text = validate_text("review", text, REVIEW_MIN_CHARS, REVIEW_MAX_CHARS)?;

        self.mutate(title_id, |title, _| {
            let review = title
                .find_review(review_id)
                .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;
            authorizer::authorize_edit(actor, &review.user_id, "review")?;

            let change = AnnotationChange::EditReview {
                review_id: review_id.to_string(),
                comment: text.clone(),
            };
            Ok((change, ()))
        })
        .await
    }

    /// Removes a review
    ///
    /// Allowed for the author and for elevated actors. Fails with `NotFound`
    /// for an unknown review and `Forbidden` otherwise; a denied delete leaves
    /// the title untouched.
    pub async fn delete_review(
        &self,
        title_id: &CatalogId,
        review_id: &str,
        actor: &Identity,
    ) -> AppResult<()> {
        self.mutate(title_id, |title, _| {
            let review = title
                .find_review(review_id)
                .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;
            authorizer::authorize_removal(actor, &review.user_id, "review")?;

            let change = AnnotationChange::RemoveReview {
                review_id: review_id.to_string(),
            };
            Ok((change, ()))
        })
        .await
    }

    // ============================================================================
    // Comments
    // ============================================================================

    /// Appends a comment to a title
    ///
    /// Users may comment any number of times. The content is trimmed and must be
    /// `COMMENT_MIN_CHARS..=COMMENT_MAX_CHARS` characters long.
    pub async fn add_comment(
        &self,
        title_id: &CatalogId,
        actor: &Identity,
        content: &str,
    ) -> AppResult<Comment> {
        let content = validate_text("comment", content, COMMENT_MIN_CHARS, COMMENT_MAX_CHARS)?;

        self.mutate(title_id, |_, now| {
            let comment = Comment {
                comment_id: new_annotation_id(),
                user_id: actor.user_id.clone(),
                user_name: actor.display_name.clone(),
                content: content.clone(),
                created_at: now,
                updated_at: now,
            };
            Ok((AnnotationChange::AppendComment(comment.clone()), comment))
        })
        .await
    }

    /// Rewrites a comment; same ownership rules as `update_review`
    pub async fn update_comment(
        &self,
        title_id: &CatalogId,
        comment_id: &str,
        actor: &Identity,
        content: &str,
    ) -> AppResult<()> {
        let content = validate_text("comment", content, COMMENT_MIN_CHARS, COMMENT_MAX_CHARS)?;

        self.mutate(title_id, |title, _| {
            let comment = title
                .find_comment(comment_id)
                .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
            authorizer::authorize_edit(actor, &comment.user_id, "comment")?;

            let change = AnnotationChange::EditComment {
                comment_id: comment_id.to_string(),
                content: content.clone(),
            };
            Ok((change, ()))
        })
        .await
    }

    /// Removes a comment; same permission rules as `delete_review`
    pub async fn delete_comment(
        &self,
        title_id: &CatalogId,
        comment_id: &str,
        actor: &Identity,
    ) -> AppResult<()> {
        self.mutate(title_id, |title, _| {
            let comment = title
                .find_comment(comment_id)
                .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
            authorizer::authorize_removal(actor, &comment.user_id, "comment")?;

            let change = AnnotationChange::RemoveComment {
                comment_id: comment_id.to_string(),
            };
            Ok((change, ()))
        })
        .await
    }

    // ============================================================================
    // Ratings
    // ============================================================================

    /// Adds or replaces the actor's rating and returns the new aggregate
    ///
    /// The value must be finite and within `0..=10`; it is checked before the
    /// title is read. A first rating grows the count, a later one replaces the
    /// stored value in place. The outcome says which of the two happened.
    ///
    /// Errors:
    /// - `Validation` for a non-finite or out-of-range value
    /// - `NotFound` when the title does not exist
    /// - `Conflict` when every write attempt lost a race
    pub async fn upsert_rating(
        &self,
        title_id: &CatalogId,
        actor: &Identity,
        value: f64,
    ) -> AppResult<RatingUpsert> {
        let value = RatingValue::new(value)?;

        let (aggregate, replaced): (RatingAggregate, bool) = self
            .mutate(title_id, |title, now| {
                let replaced = title.rating_by_user(&actor.user_id).is_some();
                let (change, aggregate) =
                    aggregator::plan_upsert(title, &actor.user_id, value, now);
                Ok((change, (aggregate, replaced)))
            })
            .await?;

        let summary = aggregate.summary();
        Ok(if replaced {
            RatingUpsert::Replaced(summary)
        } else {
            RatingUpsert::Added(summary)
        })
    }

    // ============================================================================
    // Optimistic write loop
    // ============================================================================

    /// Runs `plan` against fresh snapshots until its patch lands
    ///
    /// `plan` may reject the snapshot with an error, which ends the loop
    /// immediately. A version mismatch re-reads and re-plans; after
    /// `max_attempts` mismatches the caller gets `Conflict`.
    async fn mutate<T, F>(&self, title_id: &CatalogId, plan: F) -> AppResult<T>
    where
        F: Fn(&Title, DateTime<Utc>) -> AppResult<(AnnotationChange, T)>,
    {
        for attempt in 1..=self.max_attempts {
            let snapshot = self
                .store
                .load(title_id)
                .await?
                .ok_or_else(|| title_not_found(title_id))?;

            let now = Utc::now();
            let (change, output) = plan(&snapshot.title, now)?;
            let label = change.label();
            let patch = TitlePatch::new(change, now);

            match self
                .store
                .apply_patch(title_id, snapshot.version, &patch)
                .await?
            {
                PatchOutcome::Applied { version } => {
                    tracing::debug!(
                        title_id = %title_id,
                        change = label,
                        attempt,
                        version,
                        "Applied annotation patch"
                    );
                    return Ok(output);
                }
                PatchOutcome::Conflict => {
                    tracing::warn!(
                        title_id = %title_id,
                        change = label,
                        attempt,
                        max_attempts = self.max_attempts,
                        "Concurrent update detected, retrying"
                    );
                }
            }
        }

        Err(AppError::Conflict(format!(
            "Title {} is being updated concurrently, try again",
            title_id
        )))
    }
}

fn title_not_found(title_id: &CatalogId) -> AppError {
    AppError::NotFound(format!("Title {} not found", title_id))
}

fn new_annotation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Trims `text` and checks its length in characters
fn validate_text(what: &str, text: &str, min: usize, max: usize) -> AppResult<String> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {} characters, got {}",
            what, min, max, len
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryTitleStore, VersionedTitle};
    use crate::models::{fixtures, Role, TitleKind};
    use std::sync::atomic::{AtomicU32, Ordering};

    const REVIEW: &str = "A thoughtful and long enough review.";

    fn alice() -> Identity {
        Identity::new("user-a", "Alice Liddell", Role::User)
    }

    fn bob() -> Identity {
        Identity::new("user-b", "Bob Ross", Role::User)
    }

    fn bob_admin() -> Identity {
        Identity::new("user-b", "Bob Ross", Role::Admin)
    }

    async fn setup() -> (AnnotationStore, Arc<InMemoryTitleStore>, CatalogId) {
        let backing = Arc::new(InMemoryTitleStore::new());
        let title = fixtures::movie(603);
        backing.insert(&title).await.unwrap();
        (AnnotationStore::new(backing.clone(), 5), backing, title.id)
    }

    #[tokio::test]
    async fn test_second_review_from_same_user_is_duplicate() {
        let (annotations, _, id) = setup().await;

        let review = annotations.add_review(&id, &alice(), REVIEW).await.unwrap();
        assert_eq!(review.user_name, "Alice Liddell");

        let second = annotations
            .add_review(&id, &alice(), "Another long enough review")
            .await;
        assert!(matches!(second, Err(AppError::Duplicate(_))));

        let list = annotations.list_reviews(&id).await.unwrap();
        assert_eq!(list.reviews.len(), 1);
        assert_eq!(list.reviews[0].comment, REVIEW);
    }

    #[tokio::test]
    async fn test_review_text_is_validated_before_any_read() {
        let (annotations, _, _) = setup().await;
        let missing = CatalogId::new("movie-1");

        let result = annotations.add_review(&missing, &alice(), "too short").await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = annotations.add_review(&missing, &alice(), REVIEW).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_review_requires_author() {
        let (annotations, _, id) = setup().await;
        let review = annotations.add_review(&id, &alice(), REVIEW).await.unwrap();

        let result = annotations
            .update_review(&id, &review.review_id, &bob_admin(), "Rewritten by an admin")
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        annotations
            .update_review(&id, &review.review_id, &alice(), "  Rewritten by the author  ")
            .await
            .unwrap();

        let list = annotations.list_reviews(&id).await.unwrap();
        assert_eq!(list.reviews[0].comment, "Rewritten by the author");
        assert!(list.reviews[0].updated_at >= list.reviews[0].created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_review_is_not_found() {
        let (annotations, _, id) = setup().await;
        let result = annotations
            .update_review(&id, "nope", &alice(), REVIEW)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_review_ownership_gate() {
        let (annotations, _, id) = setup().await;
        let review = annotations.add_review(&id, &alice(), REVIEW).await.unwrap();

        let result = annotations
            .delete_review(&id, &review.review_id, &bob())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(annotations.list_reviews(&id).await.unwrap().reviews.len(), 1);

        annotations
            .delete_review(&id, &review.review_id, &bob_admin())
            .await
            .unwrap();
        assert!(annotations.list_reviews(&id).await.unwrap().reviews.is_empty());

        // Alice may review again once her review is gone
        annotations.add_review(&id, &alice(), REVIEW).await.unwrap();
    }

    #[tokio::test]
    async fn test_same_user_may_post_many_comments() {
        let (annotations, _, id) = setup().await;

        annotations.add_comment(&id, &alice(), "first").await.unwrap();
        annotations.add_comment(&id, &alice(), "second").await.unwrap();

        let list = annotations.list_comments(&id).await.unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.comments[0].content, "first");
        assert_eq!(list.comments[1].content, "second");
    }

    #[tokio::test]
    async fn test_empty_comment_is_rejected() {
        let (annotations, _, id) = setup().await;
        let result = annotations.add_comment(&id, &alice(), "   ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let too_long = "x".repeat(COMMENT_MAX_CHARS + 1);
        let result = annotations.add_comment(&id, &alice(), &too_long).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_comment_scenario() {
        let (annotations, _, id) = setup().await;
        let comment = annotations.add_comment(&id, &alice(), "hello").await.unwrap();

        let result = annotations
            .delete_comment(&id, &comment.comment_id, &bob())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(annotations.list_comments(&id).await.unwrap().total, 1);

        annotations
            .delete_comment(&id, &comment.comment_id, &bob_admin())
            .await
            .unwrap();
        assert_eq!(annotations.list_comments(&id).await.unwrap().total, 0);

        let result = annotations
            .delete_comment(&id, &comment.comment_id, &alice())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_owner_may_edit_own_comment() {
        let (annotations, _, id) = setup().await;
        let comment = annotations.add_comment(&id, &alice(), "helo").await.unwrap();

        let result = annotations
            .update_comment(&id, &comment.comment_id, &bob(), "hello")
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        annotations
            .update_comment(&id, &comment.comment_id, &alice(), "hello")
            .await
            .unwrap();
        let list = annotations.list_comments(&id).await.unwrap();
        assert_eq!(list.comments[0].content, "hello");
    }

    #[tokio::test]
    async fn test_rating_scenario() {
        let (annotations, _, id) = setup().await;

        let first = annotations.upsert_rating(&id, &alice(), 8.0).await.unwrap();
        assert!(matches!(first, RatingUpsert::Added(_)));
        let summary = first.summary();
        assert_eq!((summary.average_rating, summary.total_ratings), (8.0, 1));

        let second = annotations.upsert_rating(&id, &bob(), 4.0).await.unwrap();
        assert!(matches!(second, RatingUpsert::Added(_)));
        let summary = second.summary();
        assert_eq!((summary.average_rating, summary.total_ratings), (6.0, 2));

        let replaced = annotations.upsert_rating(&id, &alice(), 10.0).await.unwrap();
        assert!(matches!(replaced, RatingUpsert::Replaced(_)));
        let summary = replaced.summary();
        assert_eq!((summary.average_rating, summary.total_ratings), (7.0, 2));

        let annotated = annotations.get_annotations(&id).await.unwrap();
        assert_eq!(annotated.ratings, summary);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_changes_nothing() {
        let (annotations, backing, id) = setup().await;
        annotations.upsert_rating(&id, &alice(), 5.0).await.unwrap();

        let result = annotations.upsert_rating(&id, &alice(), 11.0).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let stored = backing.load(&id).await.unwrap().unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.title.average_rating, 5.0);
    }

    #[tokio::test]
    async fn test_rating_unknown_title_is_not_found() {
        let (annotations, _, _) = setup().await;
        let result = annotations
            .upsert_rating(&CatalogId::new("tv-42"), &alice(), 5.0)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ratings_are_not_lost() {
        let (_, backing, id) = setup().await;
        let annotations = AnnotationStore::new(backing.clone(), 1000);

        let mut tasks = Vec::new();
        for i in 0..25u32 {
            let annotations = annotations.clone();
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                let actor = Identity::new(format!("user-{}", i), "Rater", Role::User);
                annotations
                    .upsert_rating(&id, &actor, f64::from(i % 11))
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = backing.load(&id).await.unwrap().unwrap().title;
        let sum: f64 = stored.ratings.iter().map(|r| r.rating).sum();
        assert_eq!(stored.total_ratings, 25);
        assert_eq!(stored.ratings.len(), 25);
        assert!((stored.average_rating * 25.0 - sum).abs() < 1e-9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reviews_by_one_user_store_one() {
        let (_, backing, id) = setup().await;
        let annotations = AnnotationStore::new(backing.clone(), 1000);

        let mut tasks = Vec::new();
        for i in 0..20 {
            let annotations = annotations.clone();
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                let text = format!("Review number {} from the same user", i);
                annotations.add_review(&id, &alice(), &text).await
            }));
        }

        let (mut added, mut duplicates) = (0, 0);
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => added += 1,
                Err(AppError::Duplicate(_)) => duplicates += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!((added, duplicates), (1, 19));
        let stored = backing.load(&id).await.unwrap().unwrap().title;
        assert_eq!(stored.reviews.len(), 1);
        assert_eq!(stored.reviews[0].user_id, "user-a");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_interleaved_ratings_and_comment_deletes_stay_consistent() {
        let (_, backing, id) = setup().await;
        let annotations = AnnotationStore::new(backing.clone(), 1000);

        // Comments that will be deleted while new ones are being added
        let mut doomed = Vec::new();
        for i in 0..5 {
            let comment = annotations
                .add_comment(&id, &alice(), &format!("soon gone {}", i))
                .await
                .unwrap();
            doomed.push(comment.comment_id);
        }

        let mut tasks = Vec::new();
        for i in 0..10u32 {
            let annotations = annotations.clone();
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                let rater = Identity::new(format!("rater-{}", i), "Rater", Role::User);
                annotations
                    .upsert_rating(&id, &rater, f64::from(i) * 0.7)
                    .await
                    .map(|_| ())
            }));
        }
        for i in 0..10 {
            let annotations = annotations.clone();
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                annotations
                    .add_comment(&id, &bob(), &format!("kept {}", i))
                    .await
                    .map(|_| ())
            }));
        }
        for comment_id in doomed {
            let annotations = annotations.clone();
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                annotations.delete_comment(&id, &comment_id, &alice()).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = backing.load(&id).await.unwrap().unwrap().title;
        let sum: f64 = stored.ratings.iter().map(|r| r.rating).sum();
        assert_eq!(stored.total_ratings, 10);
        assert_eq!(stored.ratings.len(), 10);
        assert!((stored.rating_sum - sum).abs() < 1e-9);
        assert!((stored.average_rating * 10.0 - sum).abs() < 1e-9);

        assert_eq!(stored.comments.len(), 10);
        assert!(stored.comments.iter().all(|c| c.user_id == "user-b"));
    }

    /// Store that reports a conflict on every patch
    struct AlwaysConflicting {
        inner: InMemoryTitleStore,
        attempts: AtomicU32,
    }

    #[async_trait::async_trait]
    impl TitleStore for AlwaysConflicting {
        async fn insert(&self, title: &Title) -> AppResult<()> {
            self.inner.insert(title).await
        }

        async fn load(&self, id: &CatalogId) -> AppResult<Option<VersionedTitle>> {
            self.inner.load(id).await
        }

        async fn list(&self, kind: Option<TitleKind>) -> AppResult<Vec<Title>> {
            self.inner.list(kind).await
        }

        async fn apply_patch(
            &self,
            _id: &CatalogId,
            _expected_version: i64,
            _patch: &TitlePatch,
        ) -> AppResult<PatchOutcome> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Ok(PatchOutcome::Conflict)
        }
    }

    #[tokio::test]
    async fn test_retry_budget_exhaustion_is_conflict() {
        let backing = Arc::new(AlwaysConflicting {
            inner: InMemoryTitleStore::new(),
            attempts: AtomicU32::new(0),
        });
        let title = fixtures::movie(603);
        backing.insert(&title).await.unwrap();
        let annotations = AnnotationStore::new(backing.clone(), 3);

        let result = annotations.upsert_rating(&title.id, &alice(), 7.0).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(backing.attempts.load(Ordering::SeqCst), 3);

        let stored = backing.load(&title.id).await.unwrap().unwrap();
        assert_eq!(stored.title.total_ratings, 0);
    }
}
