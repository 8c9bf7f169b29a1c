//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite schema and migrations
//! - Identity resolution (session token → account → profile)
//! - Content store (profiles, posts, likes, comments)
//! - Social graph store (follows)
//! - Feed assembly

mod database;
mod models;

pub use database::{Database, PoolOptions};
pub use models::*;
