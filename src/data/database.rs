//! SQLite database operations
//!
//! All database access goes through this module. Every public operation is a
//! single SQL statement, so readers never observe a partially applied write.
//! Uniqueness and foreign-key constraints are the source of truth for
//! duplicate likes/follows/usernames; their violation signals are turned into
//! explicit outcome values here instead of leaking as errors.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::path::Path;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::models::*;
use crate::error::AppError;

const SESSION_TOKEN_HASH_PREFIX: &str = "sha256:";
const SESSION_TOKEN_BYTES: usize = 32;

/// Connection pool settings
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout: Duration::from_millis(5_000),
        }
    }
}

/// Database connection pool wrapper.
///
/// Opened once at startup and shared through `AppState`. Call
/// [`Database::close`] at shutdown to drain the pool.
pub struct Database {
    pool: Pool<Sqlite>,
}

/// Which constraint a failed write tripped
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConstraintViolation {
    Unique(String),
    ForeignKey,
    Check,
}

fn constraint_violation(error: &sqlx::Error) -> Option<ConstraintViolation> {
    let sqlx::Error::Database(db_error) = error else {
        return None;
    };

    if db_error.is_unique_violation() {
        Some(ConstraintViolation::Unique(db_error.message().to_string()))
    } else if db_error.is_foreign_key_violation() {
        Some(ConstraintViolation::ForeignKey)
    } else if db_error.is_check_violation() {
        Some(ConstraintViolation::Check)
    } else {
        None
    }
}

fn hash_session_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!(
        "{}{}",
        SESSION_TOKEN_HASH_PREFIX,
        URL_SAFE_NO_PAD.encode(digest)
    )
}

fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Convert a page size or offset for binding. Values beyond `i64::MAX`
/// saturate instead of wrapping negative, which SQLite would read as 0.
fn sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

const POST_VIEW_COLUMNS: &str = r#"
    SELECT p.id, p.author_id, p.image_url, p.caption, p.created_at,
           a.username AS author_username,
           a.display_name AS author_display_name,
           a.avatar_url AS author_avatar_url,
           (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
           CASE WHEN "#;

/// Start a `PostView` query. The caller appends the WHERE/ORDER clauses.
///
/// `is_liked` is NULL when no viewer is bound.
fn post_view_query<'args>(viewer_id: Option<&'args str>) -> QueryBuilder<'args, Sqlite> {
    let mut builder = QueryBuilder::<Sqlite>::new(POST_VIEW_COLUMNS);
    builder.push_bind(viewer_id);
    builder.push(" IS NULL THEN NULL ELSE EXISTS (SELECT 1 FROM likes v WHERE v.post_id = p.id AND v.user_id = ");
    builder.push_bind(viewer_id);
    builder.push(") END AS is_liked FROM posts p JOIN profiles a ON a.id = p.author_id");
    builder
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database with default pool settings
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        Self::connect_with(path, &PoolOptions::default()).await
    }

    /// Connect to SQLite database
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    /// * `options` - Pool size and busy timeout
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect_with(path: &Path, options: &PoolOptions) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(options.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .connect_with(connect_options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!(path = %path.display(), "Database connected and migrated successfully");

        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    // =========================================================================
    // Session tokens / identity
    // =========================================================================

    /// Issue a new session token for an external account.
    ///
    /// Only the digest is persisted; the returned token is the sole copy.
    pub async fn issue_session_token(&self, external_account_id: &str) -> Result<String, AppError> {
        let token = generate_session_token();

        sqlx::query(
            "INSERT INTO session_tokens (token_hash, external_account_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(hash_session_token(&token))
        .bind(external_account_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!(%external_account_id, "Session token issued");
        Ok(token)
    }

    /// Map a session token to its external account identifier.
    pub async fn resolve_account(&self, token: &str) -> Result<Option<String>, AppError> {
        let account_id = sqlx::query_scalar::<_, String>(
            "SELECT external_account_id FROM session_tokens WHERE token_hash = ?",
        )
        .bind(hash_session_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(account_id)
    }

    /// Map an external account identifier to its profile.
    pub async fn resolve_profile(
        &self,
        external_account_id: &str,
    ) -> Result<Option<Profile>, AppError> {
        let profile =
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE external_account_id = ?")
                .bind(external_account_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(profile)
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    /// Insert a new profile
    ///
    /// Username and account uniqueness are decided by the table constraints,
    /// so two concurrent registrations for the same username yield exactly one
    /// `Created` and one `UsernameTaken`.
    pub async fn create_profile(&self, new_profile: &NewProfile) -> Result<ProfileInsert, AppError> {
        let profile = Profile {
            id: EntityId::new().0,
            external_account_id: new_profile.external_account_id.clone(),
            username: new_profile.username.clone(),
            display_name: new_profile.display_name.clone(),
            bio: String::new(),
            avatar_url: None,
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO profiles (
                id, external_account_id, username, display_name, bio, avatar_url, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.external_account_id)
        .bind(&profile.username)
        .bind(&profile.display_name)
        .bind(&profile.bio)
        .bind(&profile.avatar_url)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(
                    profile_id = %profile.id,
                    username = %profile.username,
                    "Profile created"
                );
                Ok(ProfileInsert::Created(profile))
            }
            Err(error) => match constraint_violation(&error) {
                Some(ConstraintViolation::Unique(message)) => {
                    if message.contains("profiles.username") {
                        return Ok(ProfileInsert::UsernameTaken);
                    }
                    if message.contains("profiles.external_account_id") {
                        return Ok(ProfileInsert::AccountTaken);
                    }
                    // Unrecognised message format: settle it by lookup.
                    if self
                        .resolve_profile(&new_profile.external_account_id)
                        .await?
                        .is_some()
                    {
                        Ok(ProfileInsert::AccountTaken)
                    } else {
                        Ok(ProfileInsert::UsernameTaken)
                    }
                }
                _ => Err(error.into()),
            },
        }
    }

    /// Get profile by ID
    pub async fn get_profile(&self, id: &str) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    /// Get profile by username (case-sensitive)
    pub async fn get_profile_by_username(&self, username: &str) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    /// Get profile with follower/following/post counts
    ///
    /// `is_following` reports whether `viewer_id` follows the profile and is
    /// `None` when no viewer is given.
    pub async fn get_profile_view(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> Result<Option<ProfileView>, AppError> {
        let view = sqlx::query_as::<_, ProfileView>(
            r#"
            SELECT p.*,
                   (SELECT COUNT(*) FROM follows f WHERE f.following_id = p.id) AS follower_count,
                   (SELECT COUNT(*) FROM follows f WHERE f.follower_id = p.id) AS following_count,
                   (SELECT COUNT(*) FROM posts s WHERE s.author_id = p.id) AS post_count,
                   CASE WHEN ? IS NULL THEN NULL
                        ELSE EXISTS (
                            SELECT 1 FROM follows v
                            WHERE v.follower_id = ? AND v.following_id = p.id
                        )
                   END AS is_following
            FROM profiles p
            WHERE p.username = ?
            "#,
        )
        .bind(viewer_id)
        .bind(viewer_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(view)
    }

    /// Patch profile fields by profile ID.
    ///
    /// Only `Some` fields are written. An empty patch is a no-op.
    ///
    /// # Returns
    /// `true` if the profile exists (or the patch was empty), `false` otherwise.
    pub async fn update_profile(&self, id: &str, patch: &ProfilePatch) -> Result<bool, AppError> {
        if patch.is_empty() {
            return Ok(true);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE profiles SET ");
        {
            let mut assignments = query_builder.separated(", ");
            if let Some(display_name) = &patch.display_name {
                assignments.push("display_name = ");
                assignments.push_bind_unseparated(display_name);
            }
            if let Some(bio) = &patch.bio {
                assignments.push("bio = ");
                assignments.push_bind_unseparated(bio);
            }
            if let Some(avatar_url) = &patch.avatar_url {
                assignments.push("avatar_url = ");
                assignments.push_bind_unseparated(avatar_url);
            }
        }
        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        let result = query_builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected() == 1)
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Insert a new post. `image_url` is stored as given.
    pub async fn create_post(
        &self,
        author_id: &str,
        image_url: &str,
        caption: &str,
    ) -> Result<Post, AppError> {
        let post = Post {
            id: EntityId::new().0,
            author_id: author_id.to_string(),
            image_url: image_url.to_string(),
            caption: caption.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO posts (id, author_id, image_url, caption, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.image_url)
        .bind(&post.caption)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(post_id = %post.id, author_id = %post.author_id, "Post created");
        Ok(post)
    }

    /// Get a post with counts and optional viewer like flag
    pub async fn get_post(
        &self,
        id: &str,
        viewer_id: Option<&str>,
    ) -> Result<Option<PostView>, AppError> {
        let mut query_builder = post_view_query(viewer_id);
        query_builder.push(" WHERE p.id = ");
        query_builder.push_bind(id);

        let view = query_builder
            .build_query_as::<PostView>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(view)
    }

    /// Delete a post owned by `author_id`
    ///
    /// Likes and comments on the post are removed by cascade.
    ///
    /// # Returns
    /// `false` both when the post is missing and when it belongs to someone else.
    pub async fn delete_post(&self, id: &str, author_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ? AND author_id = ?")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(post_id = %id, "Post deleted");
        }
        Ok(deleted)
    }

    /// Count posts authored by a profile
    pub async fn get_post_count(&self, author_id: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[cfg(test)]
    pub async fn set_post_created_at_for_test(
        &self,
        post_id: &str,
        created_at: chrono::DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE posts SET created_at = ? WHERE id = ?")
            .bind(created_at)
            .bind(post_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Likes
    // =========================================================================

    /// Like a post
    ///
    /// A second like by the same user is reported as `AlreadyExists`.
    pub async fn like_post(&self, post_id: &str, user_id: &str) -> Result<LinkOutcome, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO likes (id, post_id, user_id, created_at) VALUES (?, ?, ?, ?)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(EntityId::new().0)
        .bind(post_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => {
                tracing::debug!(%post_id, %user_id, "Post liked");
                Ok(LinkOutcome::Created)
            }
            Ok(_) => Ok(LinkOutcome::AlreadyExists),
            Err(error) => match constraint_violation(&error) {
                Some(ConstraintViolation::Unique(_)) => Ok(LinkOutcome::AlreadyExists),
                Some(ConstraintViolation::ForeignKey) => Ok(LinkOutcome::MissingReference),
                _ => Err(error.into()),
            },
        }
    }

    /// Remove a like
    ///
    /// # Returns
    /// `true` if a like was removed
    pub async fn unlike_post(&self, post_id: &str, user_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Add a comment to a post
    ///
    /// # Returns
    /// `None` if the post does not exist
    pub async fn add_comment(
        &self,
        post_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<Option<Comment>, AppError> {
        let comment = Comment {
            id: EntityId::new().0,
            post_id: post_id.to_string(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            "INSERT INTO comments (id, post_id, author_id, content, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(&comment.author_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(comment_id = %comment.id, %post_id, "Comment added");
                Ok(Some(comment))
            }
            Err(error) if constraint_violation(&error) == Some(ConstraintViolation::ForeignKey) => {
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Get comment by ID
    pub async fn get_comment(&self, id: &str) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    /// Get comments on a post, oldest first
    pub async fn get_comments(
        &self,
        post_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CommentView>, AppError> {
        let comments = sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.id, c.post_id, c.author_id, c.content, c.created_at,
                   a.username AS author_username,
                   a.display_name AS author_display_name,
                   a.avatar_url AS author_avatar_url
            FROM comments c
            JOIN profiles a ON a.id = c.author_id
            WHERE c.post_id = ?
            ORDER BY c.created_at ASC, c.rowid ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(post_id)
        .bind(sql_count(limit))
        .bind(sql_count(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Delete a comment written by `author_id`
    ///
    /// # Returns
    /// `false` both when the comment is missing and when it belongs to someone else.
    pub async fn delete_comment(&self, id: &str, author_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ? AND author_id = ?")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Follow relationships
    // =========================================================================

    /// Create a follow edge
    ///
    /// Self-follows are rejected without touching the table. The CHECK
    /// constraint backs this up for any other writer.
    pub async fn follow_user(
        &self,
        follower_id: &str,
        following_id: &str,
    ) -> Result<LinkOutcome, AppError> {
        if follower_id == following_id {
            return Ok(LinkOutcome::SelfReference);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO follows (id, follower_id, following_id, created_at) VALUES (?, ?, ?, ?)
            ON CONFLICT (follower_id, following_id) DO NOTHING
            "#,
        )
        .bind(EntityId::new().0)
        .bind(follower_id)
        .bind(following_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => {
                tracing::debug!(%follower_id, %following_id, "Follow created");
                Ok(LinkOutcome::Created)
            }
            Ok(_) => Ok(LinkOutcome::AlreadyExists),
            Err(error) => match constraint_violation(&error) {
                Some(ConstraintViolation::Unique(_)) => Ok(LinkOutcome::AlreadyExists),
                Some(ConstraintViolation::ForeignKey) => Ok(LinkOutcome::MissingReference),
                Some(ConstraintViolation::Check) => Ok(LinkOutcome::SelfReference),
                None => Err(error.into()),
            },
        }
    }

    /// Remove a follow edge
    ///
    /// # Returns
    /// `true` if an edge was removed
    pub async fn unfollow_user(
        &self,
        follower_id: &str,
        following_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
            .bind(follower_id)
            .bind(following_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether `follower_id` follows `following_id`
    pub async fn is_following(
        &self,
        follower_id: &str,
        following_id: &str,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = ? AND following_id = ?)",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Profiles following `user_id`, most recent follow first
    pub async fn get_followers(&self, user_id: &str, limit: usize) -> Result<Vec<Profile>, AppError> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT p.* FROM follows f
            JOIN profiles p ON p.id = f.follower_id
            WHERE f.following_id = ?
            ORDER BY f.created_at DESC, f.rowid DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(sql_count(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Profiles `user_id` follows, most recent follow first
    pub async fn get_following(&self, user_id: &str, limit: usize) -> Result<Vec<Profile>, AppError> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT p.* FROM follows f
            JOIN profiles p ON p.id = f.following_id
            WHERE f.follower_id = ?
            ORDER BY f.created_at DESC, f.rowid DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(sql_count(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Count followers.
    pub async fn get_follower_count(&self, user_id: &str) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count follows.
    pub async fn get_following_count(&self, user_id: &str) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // =========================================================================
    // Feed
    // =========================================================================

    /// Global feed, newest first
    pub async fn get_feed(
        &self,
        viewer_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PostView>, AppError> {
        self.fetch_post_views(None, viewer_id, limit, offset).await
    }

    /// Posts by one author, newest first
    pub async fn get_posts_by_user(
        &self,
        author_id: &str,
        viewer_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PostView>, AppError> {
        self.fetch_post_views(Some(author_id), viewer_id, limit, offset)
            .await
    }

    async fn fetch_post_views(
        &self,
        author_id: Option<&str>,
        viewer_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PostView>, AppError> {
        let mut query_builder = post_view_query(viewer_id);
        if let Some(author_id) = author_id {
            query_builder.push(" WHERE p.author_id = ");
            query_builder.push_bind(author_id);
        }
        query_builder.push(" ORDER BY p.created_at DESC, p.rowid DESC LIMIT ");
        query_builder.push_bind(sql_count(limit));
        query_builder.push(" OFFSET ");
        query_builder.push_bind(sql_count(offset));

        let posts = query_builder
            .build_query_as::<PostView>()
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }
}
