/// Authentication utilities
///
/// This module provides the credential and token subsystem for Ticklist:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength policy
/// - [`token`]: Signed bearer-token encoding and decoding (HS256)
/// - [`session`]: Registration, login, token issuance, verification, and
///   revocation against the per-user ledger
///
/// # Security Model
///
/// Tokens are self-describing (signature verification needs no store access)
/// but a token is only accepted if its `(scope, token)` pair is still present
/// in the owning user's `active_tokens` ledger. Logout removes the ledger
/// entry, which invalidates the token immediately even though its signature
/// remains structurally valid.
///
/// # Example
///
/// ```no_run
/// use ticklist_shared::auth::{password::PasswordPolicy, password::HashCost, session};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let policy = PasswordPolicy::default();
/// let cost = HashCost::default();
/// let secret = "server-held-secret-at-least-32-bytes!!";
///
/// let user = session::register(&pool, &policy, &cost, "user@example.com", "MyP@ssw0rd!").await?;
/// let token = session::issue_token(&pool, &user, secret).await?;
/// let auth = session::verify_token(&pool, &token, secret).await?;
/// assert_eq!(auth.user.id, user.id);
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod session;
pub mod token;
