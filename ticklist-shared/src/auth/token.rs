/// Bearer token encoding and decoding
///
/// Tokens are JWTs signed with HS256 (HMAC-SHA256) binding a user id and a
/// scope. They are deliberately issued without an expiration claim: a token
/// stays valid until it is revoked, and revocation is decided by membership
/// in the user's `active_tokens` ledger (see [`crate::auth::session`]), not
/// by anything inside the token itself.
///
/// # Security
///
/// - **Algorithm**: HS256 only; decoding rejects any other algorithm
/// - **Issuer**: always "ticklist", checked on decode
/// - **Secret Management**: the signing secret should be at least 32 bytes
///   (256 bits) and come from the environment
///
/// # Example
///
/// ```
/// use ticklist_shared::auth::token::{sign, decode, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes!!!";
///
/// let token = sign(&Claims::new(user_id), secret)?;
/// let claims = decode(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// assert_eq!(claims.scope, "auth");
/// # Ok(())
/// # }
/// ```

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scope claim carried by session tokens
pub const AUTH_SCOPE: &str = "auth";

/// Issuer claim; checked during validation
const ISSUER: &str = "ticklist";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token signature or payload is invalid
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Claims carried by a signed session token
///
/// # Claims
///
/// - `sub`: Subject (user ID)
/// - `scope`: Always "auth" for session tokens
/// - `iss`: Issuer (always "ticklist")
/// - `iat`: Issued at (Unix timestamp)
///
/// There is intentionally no `exp`: token lifetime is governed by the
/// server-side revocation ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Token scope
    pub scope: String,

    /// Issuer - Always "ticklist"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Creates session-token claims for a user
    pub fn new(user_id: Uuid) -> Self {
        Self {
            sub: user_id,
            scope: AUTH_SCOPE.to_string(),
            iss: ISSUER.to_string(),
            iat: Utc::now().timestamp(),
        }
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails
pub fn sign(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    jsonwebtoken::encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Decodes and validates a token string
///
/// Verifies the HS256 signature and the issuer claim. Expiration is not
/// checked because session tokens carry none; revocation happens via the
/// ledger instead.
///
/// # Errors
///
/// Returns `TokenError::Invalid` if the signature is invalid, the payload
/// is malformed, or the issuer doesn't match.
pub fn decode(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    // Session tokens have no exp claim
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map_err(|e| TokenError::Invalid(format!("Token validation failed: {}", e)))?;

    Ok(token_data.claims)
}
