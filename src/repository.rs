//! The document store behind the API: find-all, insert, find-one-and-update
//! and find-one-and-delete, all keyed by the client supplied `id`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::Db;
use crate::models::{NewTodo, Todo, TodoPatch};

const PREFIX: &str = "todo:";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Todo validation failed: {0}")]
    Validation(String),
    #[error("Todo with id `{0}` already exists")]
    Duplicate(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub trait TodoStore: Send + Sync {
    /// Every record, in insertion order.
    fn find_all(&self) -> Result<Vec<Todo>, StoreError>;
    fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;
    /// Merges `patch` into the record with `id`. `None` when nothing matched.
    fn find_one_and_update(&self, id: &str, patch: &TodoPatch)
        -> Result<Option<Todo>, StoreError>;
    /// Removes the record with `id`, returning it if it existed.
    fn find_one_and_delete(&self, id: &str) -> Result<Option<Todo>, StoreError>;
}

// what actually lives in sled; `seq` is internal and never leaves the store
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    seq: u64,
    todo: Todo,
}

#[derive(Debug)]
pub struct SledTodoStore {
    db: Db,
}
impl SledTodoStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn flush(&self) -> Result<()> {
        self.db.flush().await
    }
}

fn key(id: &str) -> String {
    format!("{PREFIX}{id}")
}

fn required(field: &str, value: Option<String>) -> Result<String, StoreError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(StoreError::Validation(format!("`{field}` is required"))),
    }
}

impl TodoStore for SledTodoStore {
    fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let mut documents = Vec::new();
        for item in self.db.iter_prefix::<Document>(PREFIX)? {
            let (_, document) = item?;
            documents.push(document);
        }
        documents.sort_by_key(|document| document.seq);
        Ok(documents.into_iter().map(|document| document.todo).collect())
    }

    fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let id = required("id", todo.id)?;
        let text = required("todo", todo.todo)?;
        let todo = Todo {
            id,
            todo: text,
            is_completed: todo.is_completed.unwrap_or(false),
        };
        let document = Document {
            seq: self.db.next_id()?,
            todo,
        };
        if !self.db.insert_new(key(&document.todo.id), &document)? {
            return Err(StoreError::Duplicate(document.todo.id));
        }
        tracing::debug!(id = %document.todo.id, seq = document.seq, "inserted todo");
        Ok(document.todo)
    }

    fn find_one_and_update(
        &self,
        id: &str,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, StoreError> {
        if matches!(&patch.todo, Some(text) if text.is_empty()) {
            return Err(StoreError::Validation("`todo` is required".to_string()));
        }
        let document = self
            .db
            .modify::<Document, _, _>(key(id), |document| patch.apply(&mut document.todo))?;
        if document.is_none() {
            tracing::debug!(id, "update matched no todo");
        }
        Ok(document.map(|document| document.todo))
    }

    fn find_one_and_delete(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        let document = self.db.remove::<Document, _>(key(id))?;
        if document.is_none() {
            tracing::debug!(id, "delete matched no todo");
        }
        Ok(document.map(|document| document.todo))
    }
}
