//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services validate input and map store outcomes to `AppError`s.

mod feed;
mod post;
mod profile;
mod social;

pub use feed::FeedService;
pub use post::{COMMENT_MAX_CHARS, PostService, validate_comment};
pub use profile::{ProfileService, validate_username};
pub use social::SocialService;
