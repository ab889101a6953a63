use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
///
/// Read routes are public. Write routes authenticate through the
/// `Identity` extractor on each handler.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route(
            "/titles",
            get(handlers::list_titles).post(handlers::add_title),
        )
        .route("/titles/:title_id", get(handlers::get_title))
        .route("/search/:media_type", get(handlers::search))
        // Annotations
        .route(
            "/titles/:title_id/annotations",
            get(handlers::get_annotations),
        )
        .route(
            "/titles/:title_id/reviews",
            get(handlers::list_reviews).post(handlers::add_review),
        )
        .route(
            "/titles/:title_id/reviews/:review_id",
            put(handlers::update_review).delete(handlers::delete_review),
        )
        .route(
            "/titles/:title_id/comments",
            get(handlers::list_comments).post(handlers::add_comment),
        )
        .route(
            "/titles/:title_id/comments/:comment_id",
            put(handlers::update_comment).delete(handlers::delete_comment),
        )
        .route("/titles/:title_id/rating", post(handlers::upsert_rating))
        .layer(
            // Outermost first: the request ID must exist before the trace span is built
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
