//! Everything the page knows, and the pure transitions between states.
//! Network calls happen in [`super::controller`]; nothing here does I/O.

use crate::models::Todo;

// inputs this short never reach the server
pub const MIN_INPUT_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub input: String,
    pub todos: Vec<Todo>,
    pub edit_id: Option<String>,
    pub show_finished: bool,
    pub deleting_id: Option<String>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            input: String::new(),
            todos: Vec::new(),
            edit_id: None,
            show_finished: true,
            deleting_id: None,
        }
    }
}

impl ClientState {
    pub fn can_submit(&self) -> bool {
        self.input.trim().chars().count() > MIN_INPUT_LEN
    }

    pub fn is_editing(&self) -> bool {
        self.edit_id.is_some()
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting_id.as_deref() == Some(id)
    }

    /// The todos that should be rendered, in list order.
    pub fn visible(&self) -> impl Iterator<Item = &Todo> + '_ {
        self.todos
            .iter()
            .filter(move |todo| self.show_finished || !todo.is_completed)
    }

    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn apply_created(&mut self, todo: Todo) {
        self.todos.push(todo);
        self.input.clear();
    }

    /// Loads the todo's text into the input box. Returns `false` when the id
    /// is not in the list, in which case nothing changes.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        match self.todos.iter().find(|todo| todo.id == id) {
            Some(todo) => {
                self.input.clone_from(&todo.todo);
                self.edit_id = Some(todo.id.clone());
                true
            }
            None => false,
        }
    }

    /// Reconciles the list with what the server returned for an update of
    /// `id`. A `None` means the server no longer has the record, so the local
    /// copy is dropped.
    pub fn apply_updated(&mut self, id: &str, updated: Option<Todo>) {
        match updated {
            Some(updated) => {
                if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) {
                    *todo = updated;
                }
            }
            None => self.todos.retain(|todo| todo.id != id),
        }
        self.input.clear();
        self.edit_id = None;
    }

    /// Flips completion locally and returns the new value.
    pub fn toggle_completed(&mut self, id: &str) -> Option<bool> {
        let todo = self.todos.iter_mut().find(|todo| todo.id == id)?;
        todo.is_completed = !todo.is_completed;
        Some(todo.is_completed)
    }

    pub fn mark_deleting(&mut self, id: &str) {
        self.deleting_id = Some(id.to_string());
    }

    pub fn finish_delete(&mut self, id: &str, removed: bool) {
        if removed {
            self.todos.retain(|todo| todo.id != id);
        }
        self.deleting_id = None;
    }

    pub fn toggle_filter(&mut self) {
        self.show_finished = !self.show_finished;
    }
}
