/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Registration/login helpers that go through the real API
/// - Request helpers that drive the router via `tower::Service`

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use sqlx::PgPool;
use ticklist_api::app::{build_router, AppState, AUTH_HEADER};
use ticklist_api::config::Config;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    run_id: Uuid,
    user_count: u32,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        // Tests only need DATABASE_URL from the environment; the secret
        // can be fixed
        if std::env::var("JWT_SECRET").is_err() {
            std::env::set_var("JWT_SECRET", "integration-test-secret-0123456789ab");
        }

        let mut config = Config::from_env()?;

        // Keep password hashing fast in tests
        config.auth.hash_cost = ticklist_shared::auth::password::HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            run_id: Uuid::new_v4(),
            user_count: 0,
        })
    }

    /// Returns a fresh unique email for this test run
    pub fn next_email(&mut self) -> String {
        self.user_count += 1;
        format!("test-{}-{}@example.com", self.run_id, self.user_count)
    }

    /// Registers a user through the API, returning (user id, email, token)
    pub async fn register_user(&mut self) -> anyhow::Result<(Uuid, String, String)> {
        let email = self.next_email();
        let (status, headers, body) = self
            .request(
                Method::POST,
                "/users",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": "Sup3rSecret!",
                })),
            )
            .await?;

        anyhow::ensure!(status == StatusCode::OK, "register failed: {}", body);

        let token = headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| anyhow::anyhow!("missing auth header on register"))?
            .to_string();
        let id = Uuid::parse_str(body["id"].as_str().unwrap())?;

        Ok((id, email, token))
    }

    /// Logs a user in through the API, returning the new token
    pub async fn login_user(&mut self, email: &str, password: &str) -> anyhow::Result<String> {
        let (status, headers, body) = self
            .request(
                Method::POST,
                "/users/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await?;

        anyhow::ensure!(status == StatusCode::OK, "login failed: {}", body);

        Ok(headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| anyhow::anyhow!("missing auth header on login"))?
            .to_string())
    }

    /// Creates a todo through the API, returning its body
    pub async fn create_todo(
        &mut self,
        token: &str,
        text: &str,
    ) -> anyhow::Result<serde_json::Value> {
        let (status, _, body) = self
            .request(
                Method::POST,
                "/todos",
                Some(token),
                Some(serde_json::json!({ "text": text })),
            )
            .await?;

        anyhow::ensure!(status == StatusCode::OK, "create todo failed: {}", body);
        Ok(body)
    }

    /// Sends a request through the router and decodes the JSON body
    ///
    /// Returns `Value::Null` for empty bodies.
    pub async fn request(
        &mut self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, serde_json::Value)> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(AUTH_HEADER, token);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.call(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, headers, json))
    }

    /// Cleans up all users (and their todos, via cascade) created by this run
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE email LIKE $1")
            .bind(format!("test-{}-%", self.run_id))
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
