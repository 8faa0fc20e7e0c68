use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{Todo, TodoPatch};

use super::http::TodoApi;
use super::state::ClientState;

/// Drives [`ClientState`] through user actions, talking to the API in
/// between. Failed calls are logged and otherwise swallowed.
///
/// The state lock is only held to read or reconcile; it is always released
/// before a network call, so a slow request never stalls other gestures.
#[derive(Debug)]
pub struct Controller<A> {
    api: A,
    state: RwLock<ClientState>,
}

impl<A: TodoApi> Controller<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: RwLock::new(ClientState::default()),
        }
    }

    // borrow immutable state
    pub async fn state(&self) -> RwLockReadGuard<'_, ClientState> {
        self.state.read().await
    }
    // borrow mutable state
    async fn write(&self) -> RwLockWriteGuard<'_, ClientState> {
        self.state.write().await
    }

    /// Refetches the whole list, as on page mount.
    pub async fn load(&self) {
        match self.api.list().await {
            Ok(todos) => self.write().await.replace_all(todos),
            Err(err) => tracing::error!(error = %err, "error fetching todos"),
        }
    }

    pub async fn set_input(&self, input: impl Into<String>) {
        self.write().await.set_input(input);
    }

    /// The single form button: updates while an edit is active, adds
    /// otherwise. A disabled button does nothing.
    pub async fn submit(&self) {
        let (can_submit, editing) = {
            let state = self.state().await;
            (state.can_submit(), state.is_editing())
        };
        if !can_submit {
            return;
        }
        if editing {
            self.update().await;
        } else {
            self.add().await;
        }
    }

    pub async fn add(&self) {
        let todo = {
            let state = self.state().await;
            if !state.can_submit() {
                return;
            }
            Todo::with_random_id(state.input.clone())
        };
        match self.api.create(&todo).await {
            Ok(created) => self.write().await.apply_created(created),
            Err(err) => tracing::error!(error = %err, "error adding todo"),
        }
    }

    pub async fn begin_edit(&self, id: &str) {
        if !self.write().await.begin_edit(id) {
            tracing::warn!(id, "edit requested for unknown todo");
        }
    }

    pub async fn update(&self) {
        let (id, patch) = {
            let state = self.state().await;
            let Some(id) = state.edit_id.clone() else {
                return;
            };
            if state.input.trim().is_empty() {
                return;
            }
            (id, TodoPatch::text(state.input.clone()))
        };
        match self.api.update(&id, &patch).await {
            Ok(updated) => {
                if updated.is_none() {
                    tracing::warn!(%id, "updated todo no longer exists");
                }
                self.write().await.apply_updated(&id, updated);
            }
            Err(err) => tracing::error!(error = %err, "error updating todo"),
        }
    }

    /// Flips the local flag first; a failed save is not rolled back.
    pub async fn toggle(&self, id: &str) {
        let Some(is_completed) = self.write().await.toggle_completed(id) else {
            return;
        };
        let patch = TodoPatch::completed(is_completed);
        if let Err(err) = self.api.update(id, &patch).await {
            tracing::error!(error = %err, id, "error updating checkbox");
        }
    }

    /// First half of a delete: only marks the todo so the page can play
    /// its exit transition.
    pub async fn mark_deleting(&self, id: &str) {
        self.write().await.mark_deleting(id);
    }

    /// Marks, deletes, then drops the todo locally once the server has
    /// answered, whatever the answer. Only a request that never got an
    /// answer leaves the todo in place. The marker is cleared either way.
    pub async fn delete(&self, id: &str) {
        self.mark_deleting(id).await;
        let removed = match self.api.delete(id).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, id, "error deleting todo");
                err.server_answered()
            }
        };
        self.write().await.finish_delete(id, removed);
    }

    pub async fn toggle_filter(&self) {
        self.write().await.toggle_filter();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio::sync::Notify;

    use super::*;
    use crate::client::http::ClientError;
    use crate::client::view;

    /// In-memory stand-in for the server that can be told to fail, or to
    /// hold deletes until released.
    #[derive(Debug, Default)]
    pub(crate) struct FakeApi {
        pub todos: Mutex<Vec<Todo>>,
        pub fail: AtomicBool,
        pub unreachable: AtomicBool,
        pub hold_deletes: AtomicBool,
        pub release: Notify,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        pub fn with(todos: Vec<Todo>) -> Self {
            Self {
                todos: Mutex::new(todos),
                ..Default::default()
            }
        }
        pub fn failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }
        fn call(&self, name: impl Into<String>) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(name.into());
            if self.unreachable.load(Ordering::SeqCst) {
                return Err(ClientError::Url("http://unreachable".to_string()));
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(ClientError::Server {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }
        pub fn stored(&self) -> Vec<Todo> {
            self.todos.lock().unwrap().clone()
        }
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TodoApi for FakeApi {
        async fn list(&self) -> Result<Vec<Todo>, ClientError> {
            self.call("list")?;
            Ok(self.stored())
        }
        async fn create(&self, todo: &Todo) -> Result<Todo, ClientError> {
            self.call("create")?;
            self.todos.lock().unwrap().push(todo.clone());
            Ok(todo.clone())
        }
        async fn update(&self, id: &str, patch: &TodoPatch) -> Result<Option<Todo>, ClientError> {
            self.call(format!("update {id}"))?;
            let mut todos = self.todos.lock().unwrap();
            let todo = todos.iter_mut().find(|todo| todo.id == id);
            Ok(todo.map(|todo| {
                patch.apply(todo);
                todo.clone()
            }))
        }
        async fn delete(&self, id: &str) -> Result<(), ClientError> {
            if self.hold_deletes.load(Ordering::SeqCst) {
                self.release.notified().await;
            }
            self.call(format!("delete {id}"))?;
            self.todos.lock().unwrap().retain(|todo| todo.id != id);
            Ok(())
        }
    }

    async fn loaded(todos: Vec<Todo>) -> Controller<FakeApi> {
        let controller = Controller::new(FakeApi::with(todos));
        controller.load().await;
        controller
    }

    #[tokio::test]
    async fn test_load() {
        let controller = loaded(vec![Todo::new("a", "buy milk")]).await;
        assert_eq!(controller.state().await.todos, vec![Todo::new("a", "buy milk")]);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_list() {
        let controller = loaded(vec![Todo::new("a", "buy milk")]).await;
        controller.api.failing(true);
        controller.load().await;
        assert_eq!(controller.state().await.todos.len(), 1);
    }

    #[tokio::test]
    async fn test_add_short_input_is_noop() {
        let controller = loaded(vec![]).await;
        let calls = controller.api.call_count();
        controller.set_input("hi").await;
        controller.submit().await;
        let state = controller.state().await;
        assert!(state.todos.is_empty());
        assert_eq!(state.input, "hi");
        assert_eq!(controller.api.call_count(), calls);
    }

    #[tokio::test]
    async fn test_add() {
        let controller = loaded(vec![]).await;
        controller.set_input("buy milk").await;
        controller.submit().await;

        let state = controller.state().await;
        assert_eq!(state.todos.len(), 1);
        assert_eq!(state.todos[0].todo, "buy milk");
        assert!(!state.todos[0].is_completed);
        assert!(!state.todos[0].id.is_empty());
        assert_eq!(controller.api.stored(), state.todos);
        assert!(state.input.is_empty());
    }

    #[tokio::test]
    async fn test_add_failure_keeps_input() {
        let controller = loaded(vec![]).await;
        controller.api.failing(true);
        controller.set_input("buy milk").await;
        controller.submit().await;
        let state = controller.state().await;
        assert!(state.todos.is_empty());
        assert_eq!(state.input, "buy milk");
    }

    #[tokio::test]
    async fn test_edit_and_update_sends_text_only() {
        let mut done = Todo::new("a", "buy milk");
        done.is_completed = true;
        let controller = loaded(vec![done]).await;

        controller.begin_edit("a").await;
        assert!(controller.state().await.is_editing());
        controller.set_input("buy oat milk").await;
        controller.submit().await;

        let expected = Todo {
            id: "a".into(),
            todo: "buy oat milk".into(),
            is_completed: true,
        };
        let state = controller.state().await;
        assert_eq!(state.todos, vec![expected.clone()]);
        assert_eq!(controller.api.stored(), vec![expected]);
        assert!(!state.is_editing());
        assert!(state.input.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_without_rollback() {
        let controller = loaded(vec![Todo::new("a", "buy milk")]).await;
        controller.toggle("a").await;
        assert!(controller.state().await.todos[0].is_completed);
        assert!(controller.api.stored()[0].is_completed);

        controller.api.failing(true);
        controller.toggle("a").await;
        // local state moved on, server did not
        assert!(!controller.state().await.todos[0].is_completed);
        assert!(controller.api.stored()[0].is_completed);
    }

    #[tokio::test]
    async fn test_delete() {
        let controller =
            loaded(vec![Todo::new("a", "buy milk"), Todo::new("b", "walk dog")]).await;
        controller.delete("a").await;
        let state = controller.state().await;
        assert_eq!(state.todos, vec![Todo::new("b", "walk dog")]);
        assert!(state.deleting_id.is_none());
    }

    #[tokio::test]
    async fn test_delete_drops_todo_when_server_errors() {
        let controller =
            loaded(vec![Todo::new("a", "buy milk"), Todo::new("b", "walk dog")]).await;
        controller.api.failing(true);
        controller.delete("a").await;
        let state = controller.state().await;
        assert_eq!(state.todos, vec![Todo::new("b", "walk dog")]);
        assert!(state.deleting_id.is_none());
    }

    #[tokio::test]
    async fn test_delete_keeps_todo_without_answer() {
        let controller = loaded(vec![Todo::new("a", "buy milk")]).await;
        controller.api.unreachable.store(true, Ordering::SeqCst);
        controller.delete("a").await;
        let state = controller.state().await;
        assert_eq!(state.todos.len(), 1);
        assert!(state.deleting_id.is_none());
    }

    #[tokio::test]
    async fn test_pending_delete_does_not_block_other_gestures() {
        let controller = Arc::new(
            loaded(vec![Todo::new("a", "buy milk"), Todo::new("b", "walk dog")]).await,
        );
        controller.api.hold_deletes.store(true, Ordering::SeqCst);

        let pending = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.delete("a").await }
        });
        while !controller.state().await.is_deleting("a") {
            tokio::task::yield_now().await;
        }

        // the delete is still waiting on the server
        controller.toggle_filter().await;
        controller.toggle("b").await;
        let html = view::app(&*controller.state().await).into_string();
        assert!(html.contains("slide-out"));

        controller.api.release.notify_one();
        pending.await.unwrap();
        let state = controller.state().await;
        assert!(state.deleting_id.is_none());
        assert!(!state.show_finished);
        assert_eq!(state.todos.len(), 1);
        assert!(state.todos[0].is_completed);
    }

    #[tokio::test]
    async fn test_filter_does_not_touch_server() {
        let controller = loaded(vec![Todo::new("a", "buy milk")]).await;
        let calls = controller.api.call_count();
        controller.toggle_filter().await;
        assert!(!controller.state().await.show_finished);
        assert_eq!(controller.api.call_count(), calls);
    }
}
