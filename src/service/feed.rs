//! Feed service
//!
//! Reverse-chronological post listings. The feed is global; it is not
//! filtered by the follow graph.

use std::sync::Arc;

use crate::data::{Database, PostView};
use crate::error::AppError;

/// Feed service
pub struct FeedService {
    db: Arc<Database>,
}

impl FeedService {
    /// Create new feed service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the global feed
    ///
    /// # Arguments
    /// * `viewer_id` - Profile whose likes fill `is_liked`, if any
    /// * `limit` - Maximum results (already clamped by the caller)
    /// * `offset` - Number of newer posts to skip
    pub async fn feed(
        &self,
        viewer_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PostView>, AppError> {
        self.db.get_feed(viewer_id, limit, offset).await
    }

    /// Get posts by one user
    ///
    /// # Errors
    /// `NotFound` for an unknown username
    pub async fn user_posts(
        &self,
        username: &str,
        viewer_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PostView>, AppError> {
        let author = self
            .db
            .get_profile_by_username(username)
            .await?
            .ok_or(AppError::NotFound)?;

        self.db
            .get_posts_by_user(&author.id, viewer_id, limit, offset)
            .await
    }
}
