//! Common test utilities for E2E tests

#![allow(dead_code)]

use picfeed::{AppState, config};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                allowed_origin: None,
            },
            database: config::DatabaseConfig {
                path: db_path,
                max_connections: 5,
                busy_timeout_ms: 5000,
            },
            pagination: config::PaginationConfig::default(),
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        let state = AppState::new(config).await.unwrap();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = picfeed::build_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: format!("http://{}", addr),
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Issue a session token for an external account
    pub async fn create_session(&self, account_id: &str) -> String {
        self.state.db.issue_session_token(account_id).await.unwrap()
    }

    /// Issue a session and register a profile for it
    ///
    /// Returns the token and the created profile JSON.
    pub async fn register(&self, username: &str) -> (String, Value) {
        let token = self.create_session(&format!("acct_{}", username)).await;

        let response = self
            .client
            .post(self.url("/api/v1/profiles"))
            .bearer_auth(&token)
            .json(&json!({ "username": username }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201, "registering {}", username);

        (token, response.json().await.unwrap())
    }

    /// Publish a post as the token's profile and return its JSON
    pub async fn create_post(&self, token: &str, caption: &str) -> Value {
        let response = self
            .client
            .post(self.url("/api/v1/posts"))
            .bearer_auth(token)
            .json(&json!({
                "image_url": "https://cdn.example.com/photo.jpg",
                "caption": caption,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);

        response.json().await.unwrap()
    }

    /// GET a JSON endpoint, optionally authenticated
    pub async fn get_json(&self, path: &str, token: Option<&str>) -> (u16, Value) {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}
