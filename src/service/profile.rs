//! Profile service
//!
//! Registration and profile edits. Username rules are enforced here, before
//! the store sees the value.

use std::sync::Arc;

use crate::data::{Database, NewProfile, Profile, ProfileInsert, ProfilePatch, ProfileView};
use crate::error::AppError;
use crate::metrics::record_mutation;

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 30;

/// Check a username against the allowed pattern: ASCII letters, digits and
/// underscore, 3 to 30 characters.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    let len = username.len();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "username must be between {} and {} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }

    if !username
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err(AppError::Validation(
            "username may only contain letters, digits and underscores".to_string(),
        ));
    }

    Ok(())
}

fn normalize_display_name(value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "display_name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Profile service
pub struct ProfileService {
    db: Arc<Database>,
}

impl ProfileService {
    /// Create new profile service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a profile for an external account
    ///
    /// # Errors
    /// - `Validation` if the username does not match the allowed pattern
    /// - `Conflict` if the account already has a profile or the username is taken
    pub async fn register(
        &self,
        external_account_id: &str,
        username: &str,
        display_name: Option<&str>,
    ) -> Result<Profile, AppError> {
        validate_username(username)?;
        let display_name = match display_name {
            Some(display_name) => normalize_display_name(display_name)?,
            None => username.to_string(),
        };

        // Fast-path checks; the unique constraints still settle races below.
        if self.db.resolve_profile(external_account_id).await?.is_some() {
            return Err(AppError::Conflict("profile already exists".to_string()));
        }
        if self.db.get_profile_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("username is already taken".to_string()));
        }

        let outcome = self
            .db
            .create_profile(&NewProfile {
                external_account_id: external_account_id.to_string(),
                username: username.to_string(),
                display_name,
            })
            .await?;

        match outcome {
            ProfileInsert::Created(profile) => {
                record_mutation("profile", "created");
                Ok(profile)
            }
            ProfileInsert::UsernameTaken => {
                record_mutation("profile", "username_taken");
                Err(AppError::Conflict("username is already taken".to_string()))
            }
            ProfileInsert::AccountTaken => {
                record_mutation("profile", "account_taken");
                Err(AppError::Conflict("profile already exists".to_string()))
            }
        }
    }

    /// Apply a partial update to the caller's own profile
    ///
    /// Absent fields keep their stored values.
    pub async fn update(&self, profile_id: &str, patch: ProfilePatch) -> Result<Profile, AppError> {
        let patch = ProfilePatch {
            display_name: patch
                .display_name
                .as_deref()
                .map(normalize_display_name)
                .transpose()?,
            bio: patch.bio.map(|bio| bio.trim().to_string()),
            avatar_url: patch.avatar_url.map(|url| url.trim().to_string()),
        };

        if !self.db.update_profile(profile_id, &patch).await? {
            return Err(AppError::NotFound);
        }

        self.db
            .get_profile(profile_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Get profile by username
    pub async fn get_by_username(&self, username: &str) -> Result<Profile, AppError> {
        self.db
            .get_profile_by_username(username)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Get profile with counts, scoped to an optional viewer
    pub async fn get_view(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> Result<ProfileView, AppError> {
        self.db
            .get_profile_view(username, viewer_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_service() -> (ProfileService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::connect(&temp_dir.path().join("test.db"))
            .await
            .unwrap();
        (ProfileService::new(Arc::new(db)), temp_dir)
    }

    #[test]
    fn username_pattern() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("Alice_01").is_ok());
        assert!(validate_username(&"a".repeat(30)).is_ok());

        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("dash-name").is_err());
        assert!(validate_username("ünïcode").is_err());
    }

    #[tokio::test]
    async fn register_rejects_second_profile_for_account() {
        let (service, _temp_dir) = create_service().await;

        let profile = service
            .register("acct_1", "alice", Some("  Alice  "))
            .await
            .unwrap();
        assert_eq!(profile.display_name, "Alice");

        let error = service
            .register("acct_1", "alice_again", None)
            .await
            .expect_err("one profile per account");
        assert!(matches!(error, AppError::Conflict(message) if message.contains("profile")));
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let (service, _temp_dir) = create_service().await;
        service.register("acct_1", "alice", None).await.unwrap();

        let error = service
            .register("acct_2", "alice", None)
            .await
            .expect_err("username must be unique");
        assert!(matches!(error, AppError::Conflict(message) if message.contains("username")));
    }

    #[tokio::test]
    async fn register_validates_before_writing() {
        let (service, _temp_dir) = create_service().await;

        let error = service.register("acct_1", "a!", None).await.unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
        let error = service
            .register("acct_1", "alice", Some("   "))
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));

        assert!(service.get_by_username("alice").await.is_err());
    }

    #[tokio::test]
    async fn update_writes_only_present_fields() {
        let (service, _temp_dir) = create_service().await;
        let profile = service
            .register("acct_1", "alice", Some("Alice"))
            .await
            .unwrap();

        let updated = service
            .update(
                &profile.id,
                ProfilePatch {
                    bio: Some(" hello ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio, "hello");
        assert_eq!(updated.display_name, "Alice");

        let error = service
            .update("missing", ProfilePatch {
                bio: Some("x".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::NotFound));
    }
}
