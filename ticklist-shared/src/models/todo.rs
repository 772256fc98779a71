/// Todo model and owner-scoped database operations
///
/// Every accessor in this module takes the owner's id and filters on it, so
/// a caller can never observe or mutate a todo it does not own. A lookup
/// that misses because the row belongs to someone else is indistinguishable
/// from a lookup that misses because the row doesn't exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     text TEXT NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     completed_at BIGINT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `completed_at` is milliseconds since epoch and is non-null iff
/// `completed` is true.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Todo model representing one task item
///
/// Serializes camelCase (`completedAt`, `ownerId`) to match the wire format.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique todo ID (UUID v4, generated by the store)
    pub id: Uuid,

    /// Task text; non-empty, stored trimmed
    pub text: String,

    /// Whether the task is completed
    pub completed: bool,

    /// Completion timestamp in milliseconds since epoch; set when
    /// `completed` flips to true, cleared when it flips back
    pub completed_at: Option<i64>,

    /// Owning user; immutable after creation
    pub owner_id: Uuid,

    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new todo
#[derive(Debug, Clone)]
pub struct CreateTodo {
    /// Task text (already trimmed and validated by the caller)
    pub text: String,

    /// Owning user
    pub owner_id: Uuid,
}

/// A partial update to a todo
///
/// `owner_id` is deliberately absent: ownership is immutable and never
/// accepted from a request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    /// New task text
    pub text: Option<String>,

    /// New completion state
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Resolves the completion fields this patch produces
    ///
    /// Completing sets the timestamp to `now_ms`; any other patch (including
    /// a text-only patch, or `completed: false`) forces the pair back to
    /// `(false, None)`. A partially-completed state is not representable,
    /// and re-completing resets the timestamp rather than preserving it.
    ///
    /// # Example
    ///
    /// ```
    /// use ticklist_shared::models::todo::TodoPatch;
    ///
    /// let patch = TodoPatch { text: None, completed: Some(true) };
    /// assert_eq!(patch.completion(1700000000000), (true, Some(1700000000000)));
    ///
    /// let patch = TodoPatch { text: Some("milk".into()), completed: None };
    /// assert_eq!(patch.completion(1700000000000), (false, None));
    /// ```
    pub fn completion(&self, now_ms: i64) -> (bool, Option<i64>) {
        if self.completed == Some(true) {
            (true, Some(now_ms))
        } else {
            (false, None)
        }
    }
}

impl Todo {
    /// Creates a new todo for its owner
    ///
    /// The todo starts incomplete with no completion timestamp.
    pub async fn create(pool: &PgPool, data: CreateTodo) -> Result<Self, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (text, owner_id)
            VALUES ($1, $2)
            RETURNING id, text, completed, completed_at, owner_id, created_at
            "#,
        )
        .bind(data.text)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// Lists all todos belonging to an owner
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, completed, completed_at, owner_id, created_at
            FROM todos
            WHERE owner_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Finds one todo by id, scoped to its owner
    ///
    /// Returns `None` both when the row doesn't exist and when it belongs to
    /// a different owner.
    pub async fn find_by_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, completed, completed_at, owner_id, created_at
            FROM todos
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Updates one todo, scoped to its owner
    ///
    /// `text` is applied only when present; the completion pair is always
    /// written (callers compute it with [`TodoPatch::completion`]).
    /// Last-writer-wins under concurrency; there is no version column.
    ///
    /// Returns the updated row, or `None` when the id doesn't exist or
    /// belongs to a different owner.
    pub async fn update_by_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        text: Option<String>,
        completed: bool,
        completed_at: Option<i64>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET text = COALESCE($3, text), completed = $4, completed_at = $5
            WHERE id = $1 AND owner_id = $2
            RETURNING id, text, completed, completed_at, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(text)
        .bind(completed)
        .bind(completed_at)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Deletes one todo, scoped to its owner
    ///
    /// Returns the deleted row's prior state, or `None` when the id doesn't
    /// exist or belongs to a different owner.
    pub async fn delete_by_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            DELETE FROM todos
            WHERE id = $1 AND owner_id = $2
            RETURNING id, text, completed, completed_at, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_completing_sets_timestamp() {
        let patch = TodoPatch {
            text: None,
            completed: Some(true),
        };
        assert_eq!(patch.completion(42), (true, Some(42)));
    }

    #[test]
    fn test_patch_uncompleting_clears_timestamp() {
        let patch = TodoPatch {
            text: None,
            completed: Some(false),
        };
        assert_eq!(patch.completion(42), (false, None));
    }

    #[test]
    fn test_patch_without_completed_forces_incomplete() {
        // A text-only patch resets completion state
        let patch = TodoPatch {
            text: Some("new text".to_string()),
            completed: None,
        };
        assert_eq!(patch.completion(42), (false, None));
    }

    #[test]
    fn test_patch_deserializes_partial_bodies() {
        let patch: TodoPatch = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert_eq!(patch.completed, Some(true));
        assert!(patch.text.is_none());

        let patch: TodoPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert!(patch.completed.is_none());
        assert!(patch.text.is_none());
    }

    #[test]
    fn test_todo_serializes_camel_case() {
        let todo = Todo {
            id: Uuid::new_v4(),
            text: "buy milk".to_string(),
            completed: true,
            completed_at: Some(1700000000000),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value["text"], "buy milk");
        assert_eq!(value["completedAt"], 1700000000000i64);
        assert!(value["ownerId"].is_string());
        assert!(value.get("completed_at").is_none());
    }

    #[test]
    fn test_incomplete_todo_has_null_completed_at() {
        let todo = Todo {
            id: Uuid::new_v4(),
            text: "buy milk".to_string(),
            completed: false,
            completed_at: None,
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value["completed"], false);
        assert!(value["completedAt"].is_null());
    }
}
