//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration files (config/default.toml, config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Hard cap on feed and per-user post page sizes
pub const FEED_LIMIT_CAP: usize = 50;
/// Hard cap on comment, follower and following page sizes
pub const LIST_LIMIT_CAP: usize = 100;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
    /// Single origin allowed for CORS; permissive when unset
    #[serde(default)]
    pub allowed_origin: Option<String>,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// How long a writer waits on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn pool_options(&self) -> crate::data::PoolOptions {
        crate::data::PoolOptions {
            max_connections: self.max_connections,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}

/// Page size limits applied before the store is called
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Page size when the request gives none (default: 20)
    pub default_limit: usize,
    /// Maximum page size for feed and user posts (default: 50)
    pub feed_max_limit: usize,
    /// Maximum page size for comments, followers and following (default: 100)
    pub list_max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            feed_max_limit: FEED_LIMIT_CAP,
            list_max_limit: LIST_LIMIT_CAP,
        }
    }
}

impl PaginationConfig {
    /// Clamp a requested feed page size
    pub fn feed_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.feed_max_limit)
    }

    /// Clamp a requested list page size
    pub fn list_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.list_max_limit)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` still takes precedence
    pub fn default_filter(&self) -> String {
        format!("picfeed={},tower_http=debug", self.level.to_ascii_lowercase())
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (PICFEED__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "data/picfeed.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.busy_timeout_ms", 5000)?
            .set_default("pagination.default_limit", 20)?
            .set_default("pagination.feed_max_limit", FEED_LIMIT_CAP as i64)?
            .set_default("pagination.list_max_limit", LIST_LIMIT_CAP as i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (PICFEED__*)
            .add_source(
                Environment::with_prefix("PICFEED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.database.max_connections == 0 {
            return Err(crate::error::AppError::Config(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }

        let pagination = &self.pagination;
        if pagination.default_limit == 0 {
            return Err(crate::error::AppError::Config(
                "pagination.default_limit must be greater than 0".to_string(),
            ));
        }

        if pagination.feed_max_limit == 0 || pagination.feed_max_limit > FEED_LIMIT_CAP {
            return Err(crate::error::AppError::Config(format!(
                "pagination.feed_max_limit must be between 1 and {}",
                FEED_LIMIT_CAP
            )));
        }

        if pagination.list_max_limit == 0 || pagination.list_max_limit > LIST_LIMIT_CAP {
            return Err(crate::error::AppError::Config(format!(
                "pagination.list_max_limit must be between 1 and {}",
                LIST_LIMIT_CAP
            )));
        }

        let logging = &self.logging;
        if !LOG_LEVELS.contains(&logging.level.to_ascii_lowercase().as_str()) {
            return Err(crate::error::AppError::Config(format!(
                "logging.level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }

        if !logging.format.eq_ignore_ascii_case("pretty") && !logging.is_json() {
            return Err(crate::error::AppError::Config(
                "logging.format must be \"pretty\" or \"json\"".to_string(),
            ));
        }

        if pagination.default_limit > pagination.feed_max_limit {
            return Err(crate::error::AppError::Config(
                "pagination.default_limit must not exceed pagination.feed_max_limit".to_string(),
            ));
        }

        Ok(())
    }
}
