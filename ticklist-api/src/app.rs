/// Application state and router builder
///
/// This module defines the shared application state, the router with all
/// routes and middleware, and the token-auth layer that guards the
/// protected routes.
///
/// # Authentication
///
/// Clients send their raw token in the `x-auth` request header. The auth
/// layer verifies the signature and checks the server-side ledger, then
/// inserts an [`AuthSession`] extension for handlers to consume. A missing
/// or failed token short-circuits with 401 before any handler runs.

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use ticklist_shared::auth::session;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::ApiError;
use crate::routes;

/// Header carrying the raw auth token on requests and responses
pub const AUTH_HEADER: &str = "x-auth";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Returns the token signing secret
    pub fn token_secret(&self) -> &str {
        &self.config.auth.secret
    }
}

/// Builds the application router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/users", post(routes::users::register))
        .route("/users/login", post(routes::users::login));

    let protected = Router::new()
        .route("/users/me", get(routes::users::me))
        .route("/users/me/token", delete(routes::users::logout))
        .route(
            "/todos",
            post(routes::todos::create_todo).get(routes::todos::list_todos),
        )
        .route(
            "/todos/:id",
            get(routes::todos::get_todo)
                .patch(routes::todos::update_todo)
                .delete(routes::todos::delete_todo),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            token_auth_layer,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config))
        .with_state(state)
}

/// Middleware that authenticates requests via the `x-auth` header
///
/// Verifies the token signature and its presence in the user's active-token
/// ledger, then attaches the resolved [`session::AuthSession`] as a request
/// extension.
async fn token_auth_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .ok_or_else(|| ApiError::Unauthorized("Unauthenticated".to_string()))?;

    let auth_session = session::verify_token(&state.db, &token, state.token_secret()).await?;

    tracing::debug!(user_id = %auth_session.user.id, "Request authenticated");

    request.extensions_mut().insert(auth_session);
    Ok(next.run(request).await)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive().expose_headers([HeaderName::from_static(AUTH_HEADER)])
    } else {
        let origins: Vec<HeaderValue> = config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(AUTH_HEADER)])
            .expose_headers([HeaderName::from_static(AUTH_HEADER)])
            .max_age(std::time::Duration::from_secs(3600))
    }
}
