//! Conversions from store models to API responses

use super::dto::{
    AuthorResponse, CommentResponse, PostResponse, ProfileResponse, ProfileViewResponse,
};
use crate::data::{AuthorSummary, Comment, CommentView, Post, PostView, Profile, ProfileView};

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            display_name: profile.display_name,
            bio: profile.bio,
            avatar_url: profile.avatar_url,
            created_at: profile.created_at,
        }
    }
}

impl From<ProfileView> for ProfileViewResponse {
    fn from(view: ProfileView) -> Self {
        Self {
            profile: view.profile.into(),
            follower_count: view.follower_count,
            following_count: view.following_count,
            post_count: view.post_count,
            is_following: view.is_following,
        }
    }
}

fn author_response(author_id: String, author: AuthorSummary) -> AuthorResponse {
    AuthorResponse {
        id: author_id,
        username: author.author_username,
        display_name: author.author_display_name,
        avatar_url: author.author_avatar_url,
    }
}

impl From<&Profile> for AuthorResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            avatar_url: profile.avatar_url.clone(),
        }
    }
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        let Post {
            id,
            author_id,
            image_url,
            caption,
            created_at,
        } = view.post;

        Self {
            id,
            image_url,
            caption,
            created_at,
            author: author_response(author_id, view.author),
            like_count: view.like_count,
            comment_count: view.comment_count,
            is_liked: view.is_liked,
        }
    }
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        let Comment {
            id,
            post_id,
            author_id,
            content,
            created_at,
        } = view.comment;

        Self {
            id,
            post_id,
            content,
            created_at,
            author: author_response(author_id, view.author),
        }
    }
}

/// Response for a post the caller just created
///
/// Counts start at zero and the caller has not liked it yet.
pub fn new_post_response(post: Post, author: &Profile) -> PostResponse {
    PostResponse {
        id: post.id,
        image_url: post.image_url,
        caption: post.caption,
        created_at: post.created_at,
        author: author.into(),
        like_count: 0,
        comment_count: 0,
        is_liked: Some(false),
    }
}

/// Response for a comment the caller just wrote
pub fn new_comment_response(comment: Comment, author: &Profile) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        content: comment.content,
        created_at: comment.created_at,
        author: author.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_view(is_liked: Option<bool>) -> PostView {
        PostView {
            post: Post {
                id: "post_1".to_string(),
                author_id: "profile_1".to_string(),
                image_url: "https://cdn.example/1.jpg".to_string(),
                caption: "sunset".to_string(),
                created_at: Utc::now(),
            },
            author: AuthorSummary {
                author_username: "alice".to_string(),
                author_display_name: "Alice".to_string(),
                author_avatar_url: None,
            },
            like_count: 2,
            comment_count: 1,
            is_liked,
        }
    }

    #[test]
    fn post_response_omits_is_liked_for_anonymous_viewer() {
        let value = serde_json::to_value(PostResponse::from(post_view(None))).unwrap();
        assert!(value.get("is_liked").is_none());
        assert_eq!(value["author"]["username"], "alice");
        assert_eq!(value["author"]["id"], "profile_1");

        let value = serde_json::to_value(PostResponse::from(post_view(Some(true)))).unwrap();
        assert_eq!(value["is_liked"], true);
    }
}
