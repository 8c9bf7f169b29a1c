//! API layer
//!
//! HTTP handlers for:
//! - `/api/v1` JSON endpoints
//! - Metrics (Prometheus)

mod converters;
mod dto;
mod feed;
pub mod metrics;
mod posts;
mod profiles;

pub use converters::*;
pub use dto::*;

pub use metrics::{metrics_router, track_http_metrics};

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::AppState;

/// Create the `/api/v1` router
///
/// Authentication is enforced per handler by the extractors in `crate::auth`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(profiles::me))
        .route("/profiles", post(profiles::create_profile))
        .route("/profiles/me", patch(profiles::update_profile))
        .route("/profiles/:username", get(profiles::get_profile))
        .route("/profiles/:username/posts", get(profiles::get_profile_posts))
        .route("/profiles/:username/followers", get(profiles::get_followers))
        .route("/profiles/:username/following", get(profiles::get_following))
        .route(
            "/profiles/:username/follow",
            post(profiles::follow).delete(profiles::unfollow),
        )
        .route("/posts", post(posts::create_post))
        .route("/posts/:id", get(posts::get_post).delete(posts::delete_post))
        .route("/posts/:id/like", post(posts::like).delete(posts::unlike))
        .route(
            "/posts/:id/comments",
            get(posts::get_comments).post(posts::create_comment),
        )
        .route("/comments/:id", delete(posts::delete_comment))
        .route("/feed", get(feed::get_feed))
}
