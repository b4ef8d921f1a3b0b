#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use invitation_service::inbound::http::router::create_router;
use invitation_service::inbound::http::router::AppState;
use invitation_service::outbound::notifications::LoggingNotifier;
use invitation_service::outbound::repositories::InMemoryStore;
use invitation_service::outbound::repositories::PostgresCredentialStore;
use invitation_service::outbound::repositories::PostgresEventRepository;
use invitation_service::outbound::repositories::PostgresGuestRepository;
use invitation_service::outbound::repositories::PostgresSessionStore;
use invitation_service::outbound::repositories::StoragePolicy;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

/// Generate a `#[tokio::test]` per scenario for in-memory storage and for
/// Postgres. The Postgres variants return early when `DATABASE_URL` is unset.
macro_rules! on_both_backends {
    ($($scenario:ident),+ $(,)?) => {
        mod in_memory {
            $(
                #[tokio::test]
                async fn $scenario() {
                    super::$scenario(&crate::common::TestApp::spawn().await).await;
                }
            )+
        }

        mod postgres {
            $(
                #[tokio::test]
                async fn $scenario() {
                    let Some(app) = crate::common::TestApp::spawn_postgres().await else {
                        return;
                    };
                    super::$scenario(&app).await;
                }
            )+
        }
    };
}

pub const PUBLIC_BASE_URL: &str = "http://invite.test";
pub const PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    /// Set when the app runs on a throwaway Postgres database.
    pub db: Option<TestDb>,
    pub api_client: reqwest::Client,
}

/// Test database helper
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    server_url: String,
}

/// Guest as returned to the owner when invited
pub struct InvitedGuest {
    pub id: String,
    pub token: String,
}

impl TestApp {
    /// Spawn the application over in-memory storage
    pub async fn spawn() -> Self {
        Self::spawn_with_session_ttl(chrono::Duration::hours(24)).await
    }

    pub async fn spawn_with_session_ttl(session_ttl: chrono::Duration) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            store,
            Arc::new(LoggingNotifier::new(PUBLIC_BASE_URL)),
            session_ttl,
            PUBLIC_BASE_URL,
        );

        Self::serve(state, None).await
    }

    /// Spawn the application over the Postgres adapters on a fresh database.
    ///
    /// Returns `None` when `DATABASE_URL` is not set.
    pub async fn spawn_postgres() -> Option<Self> {
        let db = TestDb::new().await?;
        let policy = StoragePolicy::new(Duration::from_secs(5), Duration::from_millis(50));

        let state = AppState::new(
            Arc::new(PostgresCredentialStore::new(db.pool.clone(), policy)),
            Arc::new(PostgresSessionStore::new(db.pool.clone(), policy)),
            Arc::new(PostgresEventRepository::new(db.pool.clone(), policy)),
            Arc::new(PostgresGuestRepository::new(db.pool.clone(), policy)),
            Arc::new(LoggingNotifier::new(PUBLIC_BASE_URL)),
            chrono::Duration::hours(24),
            PUBLIC_BASE_URL,
        );

        Some(Self::serve(state, Some(db)).await)
    }

    async fn serve(state: AppState, db: Option<TestDb>) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            db,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub async fn register(&self, username: &str) -> reqwest::Response {
        self.post("/api/users")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "full_name": "Test Owner",
                "password": PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an owner and return a fresh session token
    pub async fn owner_token(&self, username: &str) -> String {
        let response = self.register(username).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let response = self.login(username, PASSWORD).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Create an event and return its id
    pub async fn create_event(&self, token: &str, body: Value) -> String {
        let response = self
            .post_authenticated("/api/events", token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn add_guest(&self, token: &str, event_id: &str, name: &str) -> InvitedGuest {
        let response = self
            .post_authenticated(&format!("/api/events/{}/guests", event_id), token)
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        InvitedGuest {
            id: body["data"]["id"].as_str().unwrap().to_string(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn respond(&self, invitation_token: &str, body: Value) -> reqwest::Response {
        self.post(&format!("/api/confirm/{}", invitation_token))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn dashboard(&self, token: &str) -> Value {
        let response = self
            .get_authenticated("/api/dashboard", token)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}

/// A minimal valid event body starting a week from now
pub fn event_body(title: &str) -> Value {
    json!({
        "title": title,
        "starts_at": (chrono::Utc::now() + chrono::Duration::days(7)).to_rfc3339(),
        "location": "Community hall"
    })
}

impl TestDb {
    /// Create a new test database with a unique name, or `None` when
    /// `DATABASE_URL` is unset
    pub async fn new() -> Option<Self> {
        let server_url = std::env::var("DATABASE_URL").ok()?;
        let db_name = format!(
            "test_invitation_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");

        // Create test database
        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        // Connect to the new test database
        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            server_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let server_url = self.server_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&server_url).await {
                // Terminate existing connections
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                // Drop database
                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
