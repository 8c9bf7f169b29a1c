//! Post, like and comment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::json;

use super::converters::{new_comment_response, new_post_response};
use super::dto::{
    CommentResponse, CreateCommentRequest, CreatePostRequest, PaginationParams, PostResponse,
};
use crate::AppState;
use crate::auth::{CurrentProfile, MaybeViewer};
use crate::error::AppError;
use crate::service::PostService;

fn build_post_service(state: &AppState) -> PostService {
    PostService::new(state.db.clone())
}

/// POST /api/v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    CurrentProfile(me): CurrentProfile,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let post = build_post_service(&state)
        .create(&me.id, &req.image_url, req.caption.as_deref())
        .await?;

    tracing::info!(post_id = %post.id, author_id = %me.id, "Post created");

    Ok((StatusCode::CREATED, Json(new_post_response(post, &me))))
}

/// GET /api/v1/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let view = build_post_service(&state).get(&id, viewer.id()).await?;
    Ok(Json(view.into()))
}

/// DELETE /api/v1/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentProfile(me): CurrentProfile,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    build_post_service(&state).delete(&id, &me.id).await?;
    tracing::info!(post_id = %id, author_id = %me.id, "Post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/posts/:id/like
pub async fn like(
    State(state): State<AppState>,
    CurrentProfile(me): CurrentProfile,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let created = build_post_service(&state).like(&id, &me.id).await?;
    tracing::debug!(post_id = %id, user_id = %me.id, created, "Like");

    Ok(Json(json!({ "liked": true, "created": created })))
}

/// DELETE /api/v1/posts/:id/like
pub async fn unlike(
    State(state): State<AppState>,
    CurrentProfile(me): CurrentProfile,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = build_post_service(&state).unlike(&id, &me.id).await?;
    tracing::debug!(post_id = %id, user_id = %me.id, removed, "Unlike");

    Ok(Json(json!({ "liked": false, "removed": removed })))
}

/// GET /api/v1/posts/:id/comments
pub async fn get_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let limit = state.config.pagination.list_limit(params.limit);
    let offset = params.offset.unwrap_or(0);

    let comments = build_post_service(&state)
        .comments(&id, limit, offset)
        .await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/posts/:id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentProfile(me): CurrentProfile,
    Path(id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let comment = build_post_service(&state)
        .comment(&id, &me.id, &req.content)
        .await?;
    tracing::debug!(comment_id = %comment.id, post_id = %id, "Comment added");

    Ok((StatusCode::CREATED, Json(new_comment_response(comment, &me))))
}

/// DELETE /api/v1/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentProfile(me): CurrentProfile,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    build_post_service(&state)
        .delete_comment(&id, &me.id)
        .await?;
    tracing::debug!(comment_id = %id, author_id = %me.id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
