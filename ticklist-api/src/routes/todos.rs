/// Todo route handlers
///
/// Every operation here is scoped to the authenticated owner: lookups,
/// updates, and deletes all filter by `owner_id` in the same query that
/// matches the id. A todo that doesn't exist, belongs to someone else, or
/// whose id isn't a valid UUID all produce the same 404, so the API never
/// reveals whether another user's todo exists.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use ticklist_shared::auth::session::AuthSession;
use ticklist_shared::models::todo::{CreateTodo, Todo, TodoPatch};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::{ApiError, ApiJson, ApiResult};

/// Request body for creating a todo
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
}

/// Envelope for list responses
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

/// Envelope for single-todo responses
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoResponse {
    pub todo: Todo,
}

/// Parses a path segment as a todo id
///
/// An unparseable id is indistinguishable from a missing row, so both map
/// to 404.
fn parse_todo_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Todo not found".to_string()))
}

/// Create a todo for the authenticated user
///
/// `POST /todos`
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    ApiJson(request): ApiJson<CreateTodoRequest>,
) -> ApiResult<Json<Todo>> {
    let text = request.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Todo text must not be empty".to_string()));
    }

    let todo = Todo::create(
        &state.db,
        CreateTodo {
            text,
            owner_id: auth.user.id,
        },
    )
    .await?;

    tracing::debug!(todo_id = %todo.id, owner_id = %todo.owner_id, "Todo created");

    Ok(Json(todo))
}

/// List the authenticated user's todos
///
/// `GET /todos`
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> ApiResult<Json<TodoListResponse>> {
    let todos = Todo::list_by_owner(&state.db, auth.user.id).await?;
    Ok(Json(TodoListResponse { todos }))
}

/// Fetch a single todo by id
///
/// `GET /todos/:id`
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<String>,
) -> ApiResult<Json<TodoResponse>> {
    let id = parse_todo_id(&id)?;

    let todo = Todo::find_by_owner(&state.db, id, auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    Ok(Json(TodoResponse { todo }))
}

/// Update a todo's text and/or completion state
///
/// `PATCH /todos/:id`
///
/// Completion is recomputed from the patch as a whole: a patch with
/// `completed: true` stamps `completedAt` with the current time, any other
/// patch clears both. Text-only edits therefore reset completion.
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<TodoPatch>,
) -> ApiResult<Json<TodoResponse>> {
    let id = parse_todo_id(&id)?;

    let text = match patch.text.as_deref() {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ApiError::BadRequest("Todo text must not be empty".to_string()));
            }
            Some(trimmed.to_string())
        }
        None => None,
    };

    let (completed, completed_at) = patch.completion(Utc::now().timestamp_millis());

    let todo = Todo::update_by_owner(&state.db, id, auth.user.id, text, completed, completed_at)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    tracing::debug!(todo_id = %todo.id, "Todo updated");

    Ok(Json(TodoResponse { todo }))
}

/// Delete a todo
///
/// `DELETE /todos/:id`
///
/// Returns the deleted todo so clients can offer undo.
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<String>,
) -> ApiResult<Json<TodoResponse>> {
    let id = parse_todo_id(&id)?;

    let todo = Todo::delete_by_owner(&state.db, id, auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    tracing::debug!(todo_id = %todo.id, "Todo deleted");

    Ok(Json(TodoResponse { todo }))
}
