//! Profile and follow endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::json;

use super::dto::{
    CreateProfileRequest, MeResponse, PaginationParams, PostResponse, ProfileResponse,
    ProfileViewResponse, UpdateProfileRequest,
};
use crate::AppState;
use crate::auth::{CurrentProfile, Identity, MaybeViewer};
use crate::data::ProfilePatch;
use crate::error::AppError;
use crate::service::{FeedService, ProfileService, SocialService};

fn build_profile_service(state: &AppState) -> ProfileService {
    ProfileService::new(state.db.clone())
}

fn build_social_service(state: &AppState) -> SocialService {
    SocialService::new(state.db.clone())
}

/// GET /api/v1/me
pub async fn me(identity: Identity) -> Json<MeResponse> {
    Json(MeResponse {
        account_id: identity.account_id,
        profile: identity.profile.map(Into::into),
    })
}

/// POST /api/v1/profiles
pub async fn create_profile(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    let profile = build_profile_service(&state)
        .register(
            &identity.account_id,
            req.username.trim(),
            req.display_name.as_deref(),
        )
        .await?;

    tracing::info!(
        profile_id = %profile.id,
        username = %profile.username,
        "Profile registered"
    );

    Ok((StatusCode::CREATED, Json(profile.into())))
}

/// PATCH /api/v1/profiles/me
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentProfile(me): CurrentProfile,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let patch = ProfilePatch {
        display_name: req.display_name,
        bio: req.bio,
        avatar_url: req.avatar_url,
    };

    let profile = build_profile_service(&state).update(&me.id, patch).await?;
    Ok(Json(profile.into()))
}

/// GET /api/v1/profiles/:username
pub async fn get_profile(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(username): Path<String>,
) -> Result<Json<ProfileViewResponse>, AppError> {
    let view = build_profile_service(&state)
        .get_view(&username, viewer.id())
        .await?;
    Ok(Json(view.into()))
}

/// GET /api/v1/profiles/:username/posts
pub async fn get_profile_posts(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(username): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let limit = state.config.pagination.feed_limit(params.limit);
    let offset = params.offset.unwrap_or(0);

    let posts = FeedService::new(state.db.clone())
        .user_posts(&username, viewer.id(), limit, offset)
        .await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/profiles/:username/followers
pub async fn get_followers(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let limit = state.config.pagination.list_limit(params.limit);
    let profiles = build_social_service(&state)
        .followers(&username, limit)
        .await?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/profiles/:username/following
pub async fn get_following(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let limit = state.config.pagination.list_limit(params.limit);
    let profiles = build_social_service(&state)
        .following(&username, limit)
        .await?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/profiles/:username/follow
pub async fn follow(
    State(state): State<AppState>,
    CurrentProfile(me): CurrentProfile,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let created = build_social_service(&state)
        .follow(&me.id, &username)
        .await?;
    tracing::debug!(follower_id = %me.id, %username, created, "Follow");

    Ok(Json(json!({ "following": true, "created": created })))
}

/// DELETE /api/v1/profiles/:username/follow
pub async fn unfollow(
    State(state): State<AppState>,
    CurrentProfile(me): CurrentProfile,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = build_social_service(&state)
        .unfollow(&me.id, &username)
        .await?;
    tracing::debug!(follower_id = %me.id, %username, removed, "Unfollow");

    Ok(Json(json!({ "following": false, "removed": removed })))
}
