//! Post service
//!
//! Posts, likes and comments. Ownership-gated deletes report "missing" and
//! "not yours" the same way, as `AppError::NotFound`.

use std::sync::Arc;

use crate::data::{Comment, CommentView, Database, LinkOutcome, Post, PostView};
use crate::error::AppError;
use crate::metrics::record_mutation;

/// Maximum comment length in characters
pub const COMMENT_MAX_CHARS: usize = 500;

/// Trim a comment and check it is 1 to 500 characters long
pub fn validate_comment(content: &str) -> Result<&str, AppError> {
    let content = content.trim();
    let len = content.chars().count();
    if len == 0 || len > COMMENT_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "comment must be between 1 and {} characters",
            COMMENT_MAX_CHARS
        )));
    }
    Ok(content)
}

fn like_result(outcome: LinkOutcome) -> Result<bool, AppError> {
    match outcome {
        LinkOutcome::Created => {
            record_mutation("like", "created");
            Ok(true)
        }
        LinkOutcome::AlreadyExists => {
            record_mutation("like", "already_exists");
            Ok(false)
        }
        LinkOutcome::MissingReference => Err(AppError::NotFound),
        // Likes have no self-reference rule
        LinkOutcome::SelfReference => Err(AppError::Internal(anyhow::anyhow!(
            "like store reported a self-reference"
        ))),
    }
}

/// Post service
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    /// Create new post service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Publish a post
    ///
    /// `image_url` comes from the upload pipeline and is stored as-is.
    pub async fn create(
        &self,
        author_id: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<Post, AppError> {
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(AppError::Validation("image_url is required".to_string()));
        }

        let post = self
            .db
            .create_post(author_id, image_url, caption.unwrap_or_default())
            .await?;
        record_mutation("post", "created");
        Ok(post)
    }

    /// Get a post projected for `viewer_id`
    pub async fn get(&self, id: &str, viewer_id: Option<&str>) -> Result<PostView, AppError> {
        self.db
            .get_post(id, viewer_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Delete the caller's own post
    pub async fn delete(&self, id: &str, author_id: &str) -> Result<(), AppError> {
        if !self.db.delete_post(id, author_id).await? {
            return Err(AppError::NotFound);
        }
        record_mutation("post", "deleted");
        Ok(())
    }

    /// Like a post
    ///
    /// # Returns
    /// `true` if this call created the like, `false` if it already existed
    pub async fn like(&self, post_id: &str, user_id: &str) -> Result<bool, AppError> {
        let outcome = self.db.like_post(post_id, user_id).await?;
        like_result(outcome)
    }

    /// Remove a like
    ///
    /// # Returns
    /// `true` if a like was removed
    pub async fn unlike(&self, post_id: &str, user_id: &str) -> Result<bool, AppError> {
        let removed = self.db.unlike_post(post_id, user_id).await?;
        record_mutation("unlike", if removed { "removed" } else { "absent" });
        Ok(removed)
    }

    /// Comment on a post
    pub async fn comment(
        &self,
        post_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<Comment, AppError> {
        let content = validate_comment(content)?;
        let comment = self
            .db
            .add_comment(post_id, author_id, content)
            .await?
            .ok_or(AppError::NotFound)?;
        record_mutation("comment", "created");
        Ok(comment)
    }

    /// Comments on a post, oldest first
    pub async fn comments(
        &self,
        post_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CommentView>, AppError> {
        self.db.get_comments(post_id, limit, offset).await
    }

    /// Delete the caller's own comment
    pub async fn delete_comment(&self, id: &str, author_id: &str) -> Result<(), AppError> {
        if !self.db.delete_comment(id, author_id).await? {
            return Err(AppError::NotFound);
        }
        record_mutation("comment", "deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_length_bounds() {
        assert_eq!(validate_comment("  hi  ").unwrap(), "hi");
        assert!(validate_comment(&"x".repeat(500)).is_ok());
        // Counted in characters, not bytes
        assert!(validate_comment(&"é".repeat(500)).is_ok());

        assert!(validate_comment("").is_err());
        assert!(validate_comment("   ").is_err());
        assert!(validate_comment(&"x".repeat(501)).is_err());
    }

    #[test]
    fn like_outcomes_map_to_results() {
        assert!(like_result(LinkOutcome::Created).unwrap());
        assert!(!like_result(LinkOutcome::AlreadyExists).unwrap());
        assert!(matches!(
            like_result(LinkOutcome::MissingReference),
            Err(AppError::NotFound)
        ));
        // Never folded into the "already liked" path
        assert!(matches!(
            like_result(LinkOutcome::SelfReference),
            Err(AppError::Internal(_))
        ));
    }
}
