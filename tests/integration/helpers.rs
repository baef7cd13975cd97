//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use groundwork_api::{AppState, build_router};
use groundwork_auth::provider::CreateUser;
use groundwork_auth::session::SessionManager;
use groundwork_core::config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig};
use groundwork_database::repositories::{ProjectRepository, RoleRepository};
use groundwork_entity::project::Project;
use groundwork_entity::user::User;

/// Password given to every user created through [`TestApp::create_user`].
pub const TEST_PASSWORD: &str = "password123";

/// Configuration used by every test.
pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/groundwork_test".to_string(),
            max_connections: 10,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 60,
        },
        auth: AuthConfig::with_secret("integration-test-signing-secret"),
        logging: LoggingConfig::default(),
    }
}

/// A pool that never connects; fine for requests rejected before any query.
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://groundwork@127.0.0.1:1/unreachable")
        .expect("Failed to build lazy pool")
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Shared state, for calling the core directly
    pub state: AppState,
}

impl TestApp {
    /// Builds the app on a migrated pool and seeds default roles.
    pub async fn new(db_pool: PgPool) -> Self {
        groundwork_database::seed::seed_defaults(&db_pool)
            .await
            .expect("Failed to seed defaults");

        Self::without_seed(db_pool)
    }

    /// Builds the app without touching the database.
    pub fn without_seed(db_pool: PgPool) -> Self {
        let state = AppState::new(Arc::new(test_config()), db_pool.clone());
        Self {
            router: build_router(state.clone()),
            db_pool,
            state,
        }
    }

    /// The session manager under test.
    pub fn sessions(&self) -> &SessionManager {
        &self.state.session_manager
    }

    /// Create a user with [`TEST_PASSWORD`] in the named seeded role.
    pub async fn create_user(&self, email: &str, role: &str) -> User {
        let mut conn = self.db_pool.acquire().await.expect("Failed to acquire");

        let role = RoleRepository::find_by_name(&mut conn, role)
            .await
            .expect("Failed to load role")
            .expect("Role is not seeded");

        self.sessions()
            .provider()
            .create_user(
                &mut conn,
                CreateUser {
                    email: email.to_string(),
                    password: TEST_PASSWORD.to_string(),
                    first_name: "Test".to_string(),
                    last_name: "User".to_string(),
                    role_id: role.id,
                },
            )
            .await
            .expect("Failed to create test user")
    }

    /// Create a project owned by `owner`.
    pub async fn create_project(&self, key: &str, owner: Uuid) -> Project {
        let mut conn = self.db_pool.acquire().await.expect("Failed to acquire");
        ProjectRepository::create(&mut conn, key, &format!("{key} project"), owner)
            .await
            .expect("Failed to create project")
    }

    /// Login over HTTP and return the response `data` object.
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .request("POST", "/api/auth/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"].clone()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        send(&self.router, method, path, body, token).await
    }
}

/// Send one request through a router.
pub async fn send(
    router: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> TestResponse {
    let body_str = body
        .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
        .unwrap_or_default();

    let mut req = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json");

    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {token}"));
    }

    let req = req
        .body(Body::from(body_str))
        .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse { status, body }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
