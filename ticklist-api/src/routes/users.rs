/// User account and session route handlers
///
/// Registration and login both succeed with a freshly issued token in the
/// `x-auth` response header alongside a whitelisted user body. The handlers
/// never serialize the full user row; only `id` and `email` leave the
/// server.

use axum::{
    extract::State,
    http::header::HeaderName,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use ticklist_shared::auth::session::{self, AuthSession};
use uuid::Uuid;
use validator::Validate;

use crate::app::{AppState, AUTH_HEADER};
use crate::error::{ApiError, ApiJson, ApiResult};

/// Request body for registration
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address, used as the login identifier
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Plaintext password, checked against the configured policy
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of a user
///
/// Deliberately a whitelist: password hashes and the token ledger never
/// appear in a response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserBody {
    pub id: Uuid,
    pub email: String,
}

/// Register a new user
///
/// `POST /users`
///
/// Creates the account, issues an initial token, and returns it in the
/// `x-auth` response header.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate().map_err(ApiError::from_validation)?;

    let user = session::register(
        &state.db,
        &state.config.auth.password_policy,
        &state.config.auth.hash_cost,
        &request.email,
        &request.password,
    )
    .await?;

    let token = session::issue_token(&state.db, &user, state.token_secret()).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        [(HeaderName::from_static(AUTH_HEADER), token)],
        Json(UserBody {
            id: user.id,
            email: user.email,
        }),
    ))
}

/// Log in with email and password
///
/// `POST /users/login`
///
/// Issues a new token on success; the token is appended to the user's
/// ledger, so earlier tokens stay valid until revoked.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate().map_err(ApiError::from_validation)?;

    let user = session::authenticate(&state.db, &request.email, &request.password).await?;
    let token = session::issue_token(&state.db, &user, state.token_secret()).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        [(HeaderName::from_static(AUTH_HEADER), token)],
        Json(UserBody {
            id: user.id,
            email: user.email,
        }),
    ))
}

/// Return the authenticated user
///
/// `GET /users/me`
pub async fn me(Extension(auth): Extension<AuthSession>) -> Json<UserBody> {
    Json(UserBody {
        id: auth.user.id,
        email: auth.user.email,
    })
}

/// Revoke the presented token
///
/// `DELETE /users/me/token`
///
/// Removes only the token used on this request from the ledger; other
/// sessions for the same user keep working. Revoking a token twice is a
/// no-op.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> ApiResult<impl IntoResponse> {
    session::revoke_token(&state.db, auth.user.id, &auth.token).await?;

    tracing::info!(user_id = %auth.user.id, "Token revoked");

    Ok(axum::http::StatusCode::OK)
}
