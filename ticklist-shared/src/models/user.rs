/// User model and database operations
///
/// This module provides the User model and the persistence side of the
/// token revocation ledger.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     active_tokens JSONB NOT NULL DEFAULT '[]'::jsonb,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `active_tokens` holds `{scope, token}` entries for every currently valid
/// session. Insertion order is irrelevant; the entries form a set. The
/// struct deliberately does not implement `Serialize`: anything that leaves
/// the server goes through the API crate's response types, which expose only
/// `id` and `email`.
///
/// # Example
///
/// ```no_run
/// use ticklist_shared::models::user::{User, CreateUser};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "user@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

/// One entry in a user's revocation ledger
///
/// A token is valid iff it verifies cryptographically AND its
/// `(scope, token)` pair is present in the owning user's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    /// Token scope (currently always "auth")
    pub scope: String,

    /// The full signed token string
    pub token: String,
}

/// User model representing a registered identity
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4, generated by the store)
    pub id: Uuid,

    /// Email address (case-preserving, unique)
    pub email: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,

    /// Revocation ledger: the set of currently valid session tokens
    pub active_tokens: Json<Vec<TokenEntry>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated (ledger writes bump this)
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,
}

impl User {
    /// Creates a new user with an empty token ledger
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, active_tokens, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// Returns the user if found, `None` otherwise.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, active_tokens, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Returns the user if found, `None` otherwise.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, active_tokens, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Appends one entry to a user's token ledger
    ///
    /// Uses a single `jsonb` concatenation so the append does not race with
    /// other ledger appends for the same user.
    ///
    /// # Returns
    ///
    /// `true` if the user was found and updated, `false` otherwise.
    pub async fn push_token(
        pool: &PgPool,
        id: Uuid,
        entry: &TokenEntry,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET active_tokens = active_tokens || $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(entry))
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes one entry from a user's token ledger
    ///
    /// The array is rebuilt inside a single UPDATE, so the removal cannot
    /// drop an entry appended concurrently by [`User::push_token`]. Entries
    /// are compared by jsonb equality, which ignores key order.
    ///
    /// # Returns
    ///
    /// `true` if the user was found, `false` otherwise (regardless of
    /// whether the entry was present).
    pub async fn pull_token(
        pool: &PgPool,
        id: Uuid,
        entry: &TokenEntry,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET active_tokens = COALESCE(
                    (SELECT jsonb_agg(remaining)
                     FROM jsonb_array_elements(active_tokens) AS remaining
                     WHERE remaining <> $2),
                    '[]'::jsonb),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(entry))
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a `(scope, token)` pair is present in the ledger
    pub fn has_token(&self, scope: &str, token: &str) -> bool {
        self.active_tokens
            .0
            .iter()
            .any(|entry| entry.scope == scope && entry.token == token)
    }

    /// The current ledger entries
    pub fn tokens(&self) -> &[TokenEntry] {
        &self.active_tokens.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_tokens(entries: Vec<TokenEntry>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            active_tokens: Json(entries),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_token_matches_scope_and_value() {
        let user = user_with_tokens(vec![TokenEntry {
            scope: "auth".to_string(),
            token: "abc".to_string(),
        }]);

        assert!(user.has_token("auth", "abc"));
        assert!(!user.has_token("auth", "xyz"));
        assert!(!user.has_token("other", "abc"));
    }

    #[test]
    fn test_has_token_empty_ledger() {
        let user = user_with_tokens(vec![]);
        assert!(!user.has_token("auth", "abc"));
        assert!(user.tokens().is_empty());
    }

    #[test]
    fn test_token_entry_equality() {
        let a = TokenEntry {
            scope: "auth".to_string(),
            token: "t1".to_string(),
        };
        let b = TokenEntry {
            scope: "auth".to_string(),
            token: "t1".to_string(),
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_entry_json_shape() {
        let entry = TokenEntry {
            scope: "auth".to_string(),
            token: "signed-token".to_string(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["scope"], "auth");
        assert_eq!(value["token"], "signed-token");
    }

    // Integration tests for database operations live in
    // ticklist-api/tests/integration_test.rs
}
