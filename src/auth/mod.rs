//! Session authentication
//!
//! Session tokens are minted by the identity provider integration and stored
//! hashed in the database. Handlers take one of the extractors below.

mod middleware;

pub use middleware::{CurrentProfile, Identity, MaybeViewer, SESSION_COOKIE};
