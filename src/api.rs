//! JSON endpoints over the todo collection. Each handler performs exactly one
//! store operation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::error::{AppError, AppJson};
use crate::models::{NewTodo, Todo, TodoPatch};
use crate::repository::TodoStore;

pub const DELETED: &str = "Todo deleted";

#[derive(Clone)]
pub struct ApiState {
    store: Arc<dyn TodoStore>,
}
impl ApiState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub message: String,
}

pub fn routes(state: ApiState) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", put(update_todo).delete(delete_todo))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// === Routes ===
async fn list_todos(State(state): State<ApiState>) -> Result<AppJson<Vec<Todo>>, AppError> {
    let todos = state.store.find_all()?;
    Ok(AppJson(todos))
}

async fn create_todo(
    State(state): State<ApiState>,
    AppJson(body): AppJson<NewTodo>,
) -> Result<AppJson<Todo>, AppError> {
    let todo = state.store.insert(body)?;
    tracing::info!(id = %todo.id, "created todo");
    Ok(AppJson(todo))
}

// `null` when no todo has this id
async fn update_todo(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<TodoPatch>,
) -> Result<AppJson<Option<Todo>>, AppError> {
    let todo = state.store.find_one_and_update(&id, &patch)?;
    tracing::info!(%id, found = todo.is_some(), "updated todo");
    Ok(AppJson(todo))
}

async fn delete_todo(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<AppJson<Deleted>, AppError> {
    let removed = state.store.find_one_and_delete(&id)?;
    tracing::info!(%id, found = removed.is_some(), "deleted todo");
    Ok(AppJson(Deleted {
        message: DELETED.to_string(),
    }))
}
