use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{
        AddTitleRequest, Annotations, CatalogId, Comment, CommentList, CommentRequest, Identity,
        RatingRequest, RatingSummary, RatingUpsert, Review, ReviewList, ReviewRequest,
        SearchPage, Title, TitleKind,
    },
};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::AppState;

/// Query parameters for `GET /titles`
#[derive(Debug, Deserialize)]
pub struct ListTitlesQuery {
    /// Restricts the listing to `movie` or `tv`
    #[serde(rename = "type")]
    pub kind: Option<TitleKind>,
}

/// Query parameters for `GET /search/{media_type}`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    /// 1-based page number; defaults to the first page
    pub page: Option<u32>,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

// ============================================================================
// Catalog
// ============================================================================

/// Lists catalog titles, optionally filtered by `?type=movie|tv`
pub async fn list_titles(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListTitlesQuery>,
) -> AppResult<Json<Vec<Title>>> {
    let titles = state.catalog.list_titles(params.kind).await?;
    Ok(Json(titles))
}

pub async fn get_title(
    State(state): State<AppState>,
    ApiPath(title_id): ApiPath<String>,
) -> AppResult<Json<Title>> {
    let title = state.catalog.get_title(&CatalogId::new(title_id)).await?;
    Ok(Json(title))
}

/// Adds a title to the catalog from its TMDB id
///
/// Returns 201 with the stored title. Metadata is fetched once, here.
pub async fn add_title(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    identity: Identity,
    ApiJson(request): ApiJson<AddTitleRequest>,
) -> AppResult<(StatusCode, Json<Title>)> {
    tracing::info!(
        request_id = %request_id,
        user_id = %identity.user_id,
        tmdb_id = request.tmdb_id,
        media_type = %request.media_type,
        "Adding title"
    );

    let title = state.catalog.add_title(request, &identity).await?;
    Ok((StatusCode::CREATED, Json(title)))
}

/// Passes a title search through to TMDB
pub async fn search(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<TitleKind>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> AppResult<Json<SearchPage>> {
    let page = state
        .catalog
        .search(kind, &params.query, params.page.unwrap_or(1))
        .await?;
    Ok(Json(page))
}

// ============================================================================
// Annotations
// ============================================================================

pub async fn get_annotations(
    State(state): State<AppState>,
    ApiPath(title_id): ApiPath<String>,
) -> AppResult<Json<Annotations>> {
    let annotations = state
        .annotations
        .get_annotations(&CatalogId::new(title_id))
        .await?;
    Ok(Json(annotations))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    ApiPath(title_id): ApiPath<String>,
) -> AppResult<Json<ReviewList>> {
    let reviews = state
        .annotations
        .list_reviews(&CatalogId::new(title_id))
        .await?;
    Ok(Json(reviews))
}

/// Posts the caller's review; 409 if they already reviewed the title
pub async fn add_review(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    identity: Identity,
    ApiPath(title_id): ApiPath<String>,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let title_id = CatalogId::new(title_id);
    let review = state
        .annotations
        .add_review(&title_id, &identity, &request.comment)
        .await?;

    tracing::info!(
        request_id = %request_id,
        title_id = %title_id,
        user_id = %identity.user_id,
        review_id = %review.review_id,
        "Review added"
    );

    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update_review(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath((title_id, review_id)): ApiPath<(String, String)>,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> AppResult<Json<Value>> {
    state
        .annotations
        .update_review(
            &CatalogId::new(title_id),
            &review_id,
            &identity,
            &request.comment,
        )
        .await?;
    Ok(Json(json!({ "message": "Review updated successfully" })))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    identity: Identity,
    ApiPath((title_id, review_id)): ApiPath<(String, String)>,
) -> AppResult<Json<Value>> {
    let title_id = CatalogId::new(title_id);
    state
        .annotations
        .delete_review(&title_id, &review_id, &identity)
        .await?;

    tracing::info!(
        request_id = %request_id,
        title_id = %title_id,
        review_id = %review_id,
        user_id = %identity.user_id,
        "Review deleted"
    );

    Ok(Json(json!({ "message": "Review deleted successfully" })))
}

pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(title_id): ApiPath<String>,
) -> AppResult<Json<CommentList>> {
    let comments = state
        .annotations
        .list_comments(&CatalogId::new(title_id))
        .await?;
    Ok(Json(comments))
}

pub async fn add_comment(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(title_id): ApiPath<String>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .annotations
        .add_comment(&CatalogId::new(title_id), &identity, &request.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath((title_id, comment_id)): ApiPath<(String, String)>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> AppResult<Json<Value>> {
    state
        .annotations
        .update_comment(
            &CatalogId::new(title_id),
            &comment_id,
            &identity,
            &request.content,
        )
        .await?;
    Ok(Json(json!({ "message": "Comment updated successfully" })))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    identity: Identity,
    ApiPath((title_id, comment_id)): ApiPath<(String, String)>,
) -> AppResult<Json<Value>> {
    let title_id = CatalogId::new(title_id);
    state
        .annotations
        .delete_comment(&title_id, &comment_id, &identity)
        .await?;

    tracing::info!(
        request_id = %request_id,
        title_id = %title_id,
        comment_id = %comment_id,
        user_id = %identity.user_id,
        "Comment deleted"
    );

    Ok(Json(json!({ "message": "Comment deleted successfully" })))
}

/// Adds or replaces the caller's rating
///
/// Responds 201 for a user's first rating of the title and 200 when it
/// replaces an earlier one. Both carry the new rating summary.
pub async fn upsert_rating(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(title_id): ApiPath<String>,
    ApiJson(request): ApiJson<RatingRequest>,
) -> AppResult<(StatusCode, Json<RatingSummary>)> {
    let outcome = state
        .annotations
        .upsert_rating(&CatalogId::new(title_id), &identity, request.rating)
        .await?;

    let status = match outcome {
        RatingUpsert::Added(_) => StatusCode::CREATED,
        RatingUpsert::Replaced(_) => StatusCode::OK,
    };
    Ok((status, Json(outcome.summary())))
}
