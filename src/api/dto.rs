//! API request and response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile with social counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileViewResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub follower_count: i64,
    pub following_count: i64,
    pub post_count: i64,
    /// Present only when the request carried a registered viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

/// GET /me response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub account_id: String,
    pub profile: Option<ProfileResponse>,
}

/// Author summary embedded in posts and comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Post response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub image_url: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorResponse,
    pub like_count: i64,
    pub comment_count: i64,
    /// Present only when the request carried a registered viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

/// Comment response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorResponse,
}

/// POST /profiles
#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub username: String,
    pub display_name: Option<String>,
}

/// PATCH /profiles/me
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// POST /posts
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub image_url: String,
    pub caption: Option<String>,
}

/// POST /posts/:id/comments
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// Query parameters for paginated listings
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}
