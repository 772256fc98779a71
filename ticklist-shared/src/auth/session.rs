/// Session management: registration, login, and the token lifecycle
///
/// This module ties the password and token primitives to the persistent
/// store. Token validity is the conjunction of two checks:
///
/// 1. the HS256 signature verifies (stateless, no store access), and
/// 2. the `(scope, token)` pair is present in the user's `active_tokens`
///    ledger (one store read).
///
/// The hybrid avoids both unrevokable pure-stateless tokens and unbounded
/// server-side session growth: logout deletes the ledger entry and the token
/// dies immediately, while verification still needs only a single user read.
///
/// # Operations
///
/// - [`register`]: validate credentials, hash, persist a new identity
/// - [`authenticate`]: enumeration-safe email + password login
/// - [`issue_token`]: sign a token and append it to the ledger
/// - [`verify_token`]: signature + ledger check, resolving an [`AuthSession`]
/// - [`revoke_token`]: idempotent ledger removal

use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::auth::password::{self, HashCost, PasswordError, PasswordPolicy};
use crate::auth::token::{self, Claims, TokenError, AUTH_SCOPE};
use crate::models::user::{CreateUser, TokenEntry, User};

/// Error type for session operations
///
/// The first five variants are the client-visible taxonomy; `Hash`, `Sign`,
/// and `Store` are internal failures that the API layer maps to 500 without
/// echoing detail.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email unknown or password mismatch; deliberately a single variant so
    /// clients cannot enumerate registered addresses
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Email is already registered
    #[error("Email is already registered")]
    DuplicateIdentity,

    /// Email shape or password policy check failed
    #[error("Invalid credential format: {0}")]
    InvalidCredentialFormat(String),

    /// Signature invalid, payload malformed, or token absent from the ledger
    #[error("Invalid token")]
    InvalidToken,

    /// Token decoded but its subject no longer resolves to a stored identity
    #[error("Identity not found")]
    IdentityNotFound,

    /// Password hashing or verification failed
    #[error("Password operation failed: {0}")]
    Hash(#[from] PasswordError),

    /// Token signing failed
    #[error("Token operation failed: {0}")]
    Sign(#[from] TokenError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// A verified request identity
///
/// Produced by [`verify_token`] and inserted into request extensions by the
/// API's auth middleware. Carries the raw token string so the session can
/// later be targeted for revocation (logout revokes exactly the token that
/// authenticated the request).
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The resolved identity
    pub user: User,

    /// The raw token that authenticated this request
    pub token: String,
}

/// Registers a new identity
///
/// Validates the email shape and the password against the configured policy,
/// hashes the password synchronously, and persists the identity with an
/// empty token ledger. Duplicate emails are detected via the store's unique
/// constraint rather than a racy pre-check.
///
/// # Errors
///
/// - `InvalidCredentialFormat` when the email or password fails validation
/// - `DuplicateIdentity` when the email is already registered
pub async fn register(
    pool: &PgPool,
    policy: &PasswordPolicy,
    cost: &HashCost,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    if !email.validate_email() {
        return Err(AuthError::InvalidCredentialFormat(
            "Invalid email format".to_string(),
        ));
    }

    policy
        .check(password)
        .map_err(AuthError::InvalidCredentialFormat)?;

    let password_hash = password::hash_password(password, cost)?;

    match User::create(
        pool,
        CreateUser {
            email: email.to_string(),
            password_hash,
        },
    )
    .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Registered new user");
            Ok(user)
        }
        Err(sqlx::Error::Database(db_err))
            if db_err.constraint().is_some_and(|c| c.contains("email")) =>
        {
            // Logged distinctly; the client response is the same 400 as a
            // malformed credential to resist enumeration
            tracing::debug!("Registration rejected: email already exists");
            Err(AuthError::DuplicateIdentity)
        }
        Err(e) => Err(e.into()),
    }
}

/// Authenticates an identity by email and password
///
/// Unknown email and wrong password collapse into the same
/// `InvalidCredentials` error. The hash comparison itself is constant-time
/// (Argon2 verification).
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<User, AuthError> {
    let Some(user) = User::find_by_email(pool, email).await? else {
        return Err(AuthError::InvalidCredentials);
    };

    if password::verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Issues a new session token for a user
///
/// Signs `{sub: user.id, scope: "auth"}` and appends the `(scope, token)`
/// pair to the user's ledger. The ledger write completes before the token
/// is returned; a token the caller holds is always revocable.
pub async fn issue_token(pool: &PgPool, user: &User, secret: &str) -> Result<String, AuthError> {
    let signed = token::sign(&Claims::new(user.id), secret)?;

    let entry = TokenEntry {
        scope: AUTH_SCOPE.to_string(),
        token: signed.clone(),
    };

    let updated = User::push_token(pool, user.id, &entry).await?;
    if !updated {
        // User row vanished between authentication and issuance
        return Err(AuthError::IdentityNotFound);
    }

    tracing::debug!(user_id = %user.id, "Issued session token");
    Ok(signed)
}

/// Verifies a bearer token and resolves the identity behind it
///
/// # Errors
///
/// - `InvalidToken` when the signature fails, the payload is malformed, the
///   scope is wrong, or the pair is absent from the ledger (revoked)
/// - `IdentityNotFound` when the decoded subject no longer exists
pub async fn verify_token(
    pool: &PgPool,
    raw_token: &str,
    secret: &str,
) -> Result<AuthSession, AuthError> {
    let claims = token::decode(raw_token, secret).map_err(|_| AuthError::InvalidToken)?;

    if claims.scope != AUTH_SCOPE {
        return Err(AuthError::InvalidToken);
    }

    let user = User::find_by_id(pool, claims.sub)
        .await?
        .ok_or(AuthError::IdentityNotFound)?;

    // Signature validity alone is insufficient: the ledger decides whether
    // this token is still live
    if !user.has_token(AUTH_SCOPE, raw_token) {
        return Err(AuthError::InvalidToken);
    }

    Ok(AuthSession {
        user,
        token: raw_token.to_string(),
    })
}

/// Revokes one session token
///
/// Removes the exact `(scope, token)` entry from the ledger in a single
/// store write, so a token issued concurrently (a login on another device
/// mid-logout) is never lost. Idempotent: revoking an absent token, or a
/// token of a user that no longer exists, succeeds without error and leaves
/// the ledger unchanged.
pub async fn revoke_token(pool: &PgPool, user_id: Uuid, raw_token: &str) -> Result<(), AuthError> {
    let entry = TokenEntry {
        scope: AUTH_SCOPE.to_string(),
        token: raw_token.to_string(),
    };

    let updated = User::pull_token(pool, user_id, &entry).await?;
    if updated {
        tracing::debug!(user_id = %user_id, "Revoked session token");
    }

    Ok(())
}
