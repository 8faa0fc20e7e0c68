use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub todo: String,
    pub is_completed: bool,
}
impl Todo {
    pub fn new(id: impl Into<String>, todo: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            todo: todo.into(),
            is_completed: false,
        }
    }

    // client side ids are random v4 uuids
    pub fn with_random_id(todo: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), todo)
    }
}

/// Body of `POST /todos`. Every field is optional here so that missing
/// fields are reported by the store's validation instead of the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub id: Option<String>,
    pub todo: Option<String>,
    pub is_completed: Option<bool>,
}
impl From<Todo> for NewTodo {
    fn from(todo: Todo) -> Self {
        Self {
            id: Some(todo.id),
            todo: Some(todo.todo),
            is_completed: Some(todo.is_completed),
        }
    }
}

/// Body of `PUT /todos/:id`: only the fields present are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}
impl TodoPatch {
    pub fn text(todo: impl Into<String>) -> Self {
        Self {
            todo: Some(todo.into()),
            is_completed: None,
        }
    }
    pub fn completed(is_completed: bool) -> Self {
        Self {
            todo: None,
            is_completed: Some(is_completed),
        }
    }

    pub fn apply(&self, target: &mut Todo) {
        if let Some(todo) = &self.todo {
            target.todo.clone_from(todo);
        }
        if let Some(is_completed) = self.is_completed {
            target.is_completed = is_completed;
        }
    }
}
