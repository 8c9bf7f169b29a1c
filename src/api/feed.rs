//! Feed endpoint

use axum::{
    extract::{Query, State},
    response::Json,
};

use super::dto::{PaginationParams, PostResponse};
use crate::AppState;
use crate::auth::MaybeViewer;
use crate::error::AppError;
use crate::metrics::{DB_QUERIES_TOTAL, DB_QUERY_DURATION_SECONDS};
use crate::service::FeedService;

/// GET /api/v1/feed
///
/// Global feed, newest first. `limit` is clamped to the feed maximum.
pub async fn get_feed(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let limit = state.config.pagination.feed_limit(params.limit);
    let offset = params.offset.unwrap_or(0);

    let db_timer = DB_QUERY_DURATION_SECONDS
        .with_label_values(&["SELECT", "posts"])
        .start_timer();
    let posts = FeedService::new(state.db.clone())
        .feed(viewer.id(), limit, offset)
        .await?;
    DB_QUERIES_TOTAL
        .with_label_values(&["SELECT", "posts"])
        .inc();
    db_timer.observe_duration();

    Ok(Json(posts.into_iter().map(Into::into).collect()))
}
