//! Data models
//!
//! Rust structs representing database entities and read projections.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Profile
// =============================================================================

/// A registered profile
///
/// Exactly one per external account. `username` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: String,
    /// Opaque identity from the external auth/payment provider
    pub external_account_id: String,
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for profile creation
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub external_account_id: String,
    pub username: String,
    pub display_name: String,
}

/// Partial profile update
///
/// `Some` fields are written, `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.bio.is_none() && self.avatar_url.is_none()
    }
}

/// Outcome of a profile insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileInsert {
    Created(Profile),
    /// Another profile already owns this username
    UsernameTaken,
    /// The external account already has a profile
    AccountTaken,
}

/// Profile with graph counters, computed at read time
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProfileView {
    #[sqlx(flatten)]
    pub profile: Profile,
    pub follower_count: i64,
    pub following_count: i64,
    pub post_count: i64,
    /// Whether the viewer follows this profile; `None` when no viewer
    pub is_following: Option<bool>,
}

/// Author fields joined onto posts and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AuthorSummary {
    pub author_username: String,
    pub author_display_name: String,
    pub author_avatar_url: Option<String>,
}

// =============================================================================
// Post
// =============================================================================

/// An image post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    /// Reference produced by the upload pipeline, stored opaquely
    pub image_url: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
}

/// Viewer-scoped projection of a post
///
/// Counts are aggregated from the like/comment tables on every read.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostView {
    #[sqlx(flatten)]
    pub post: Post,
    #[sqlx(flatten)]
    pub author: AuthorSummary,
    pub like_count: i64,
    pub comment_count: i64,
    /// `None` means the viewer is unknown, which is distinct from `Some(false)`
    pub is_liked: Option<bool>,
}

// =============================================================================
// Comment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentView {
    #[sqlx(flatten)]
    pub comment: Comment,
    #[sqlx(flatten)]
    pub author: AuthorSummary,
}

// =============================================================================
// Likes / Follows
// =============================================================================

/// Outcome of inserting a like or follow edge
///
/// The uniqueness constraint decides between `Created` and `AlreadyExists`,
/// so concurrent identical inserts settle on exactly one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    AlreadyExists,
    /// Follower and followee are the same profile
    SelfReference,
    /// The referenced post or profile does not exist
    MissingReference,
}

impl LinkOutcome {
    /// Whether a new row was written
    pub fn created(self) -> bool {
        matches!(self, Self::Created)
    }
}

// =============================================================================
// Session tokens
// =============================================================================

/// Session token row. `token_hash` is the digest, never the raw token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionToken {
    pub token_hash: String,
    pub external_account_id: String,
    pub created_at: DateTime<Utc>,
}
