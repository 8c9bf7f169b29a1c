//! Social graph service
//!
//! Follow edges addressed by username.

use std::sync::Arc;

use crate::data::{Database, LinkOutcome, Profile};
use crate::error::AppError;
use crate::metrics::record_mutation;

/// Social graph service
pub struct SocialService {
    db: Arc<Database>,
}

impl SocialService {
    /// Create new social service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn target(&self, username: &str) -> Result<Profile, AppError> {
        self.db
            .get_profile_by_username(username)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Follow `username`
    ///
    /// # Returns
    /// `true` if this call created the edge, `false` if it already existed
    ///
    /// # Errors
    /// `Validation` on self-follow, `NotFound` for an unknown username
    pub async fn follow(&self, follower_id: &str, username: &str) -> Result<bool, AppError> {
        let target = self.target(username).await?;

        match self.db.follow_user(follower_id, &target.id).await? {
            LinkOutcome::Created => {
                record_mutation("follow", "created");
                Ok(true)
            }
            LinkOutcome::AlreadyExists => {
                record_mutation("follow", "already_exists");
                Ok(false)
            }
            LinkOutcome::SelfReference => {
                record_mutation("follow", "self_reference");
                Err(AppError::Validation("cannot follow yourself".to_string()))
            }
            LinkOutcome::MissingReference => Err(AppError::NotFound),
        }
    }

    /// Unfollow `username`
    ///
    /// # Returns
    /// `true` if an edge was removed
    pub async fn unfollow(&self, follower_id: &str, username: &str) -> Result<bool, AppError> {
        let target = self.target(username).await?;
        let removed = self.db.unfollow_user(follower_id, &target.id).await?;
        record_mutation("unfollow", if removed { "removed" } else { "absent" });
        Ok(removed)
    }

    /// Profiles following `username`, most recent first
    pub async fn followers(&self, username: &str, limit: usize) -> Result<Vec<Profile>, AppError> {
        let target = self.target(username).await?;
        self.db.get_followers(&target.id, limit).await
    }

    /// Profiles `username` follows, most recent first
    pub async fn following(&self, username: &str, limit: usize) -> Result<Vec<Profile>, AppError> {
        let target = self.target(username).await?;
        self.db.get_following(&target.id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NewProfile;
    use tempfile::TempDir;

    async fn setup() -> (SocialService, Arc<Database>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(
            Database::connect(&temp_dir.path().join("test.db"))
                .await
                .unwrap(),
        );
        for username in ["alice", "bob"] {
            db.create_profile(&NewProfile {
                external_account_id: format!("acct_{}", username),
                username: username.to_string(),
                display_name: username.to_string(),
            })
            .await
            .unwrap();
        }
        (SocialService::new(db.clone()), db, temp_dir)
    }

    #[tokio::test]
    async fn follow_settles_to_single_edge() {
        let (service, db, _temp_dir) = setup().await;
        let alice = db.get_profile_by_username("alice").await.unwrap().unwrap();

        assert!(service.follow(&alice.id, "bob").await.unwrap());
        assert!(!service.follow(&alice.id, "bob").await.unwrap());

        let followers = service.followers("bob", 100).await.unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].username, "alice");

        assert!(service.unfollow(&alice.id, "bob").await.unwrap());
        assert!(!service.unfollow(&alice.id, "bob").await.unwrap());
        assert!(service.following("alice", 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn self_follow_and_unknown_target_are_errors() {
        let (service, db, _temp_dir) = setup().await;
        let alice = db.get_profile_by_username("alice").await.unwrap().unwrap();

        let error = service.follow(&alice.id, "alice").await.unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));

        let error = service.follow(&alice.id, "nobody").await.unwrap_err();
        assert!(matches!(error, AppError::NotFound));
        assert!(matches!(
            service.followers("nobody", 10).await.unwrap_err(),
            AppError::NotFound
        ));
    }
}
