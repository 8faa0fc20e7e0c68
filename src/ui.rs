//! htmx routes for the single page. Each gesture drives the shared
//! [`Controller`] and answers with freshly rendered markup.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Form, Router,
};
use maud::Markup;
use serde::Deserialize;

use crate::client::{view, Controller, TodoApi};

// === App State ===
#[derive(Debug)]
struct UiState<A> {
    controller: Arc<Controller<A>>,
}
// derive(Clone) would demand `A: Clone`
impl<A> Clone for UiState<A> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
        }
    }
}
impl<A: TodoApi> UiState<A> {
    fn new(controller: Controller<A>) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }

    async fn render_app(&self) -> Markup {
        view::app(&*self.controller.state().await)
    }
}

pub fn routes<A: TodoApi + 'static>(controller: Controller<A>) -> Router {
    Router::new()
        .route("/", get(root::<A>))
        .route("/ui/input", post(input::<A>))
        .route("/ui/submit", post(submit::<A>))
        .route("/ui/edit", post(edit::<A>))
        .route("/ui/toggle", post(toggle::<A>))
        .route("/ui/delete", post(delete::<A>))
        .route("/ui/delete/confirm", post(confirm_delete::<A>))
        .route("/ui/filter", post(filter::<A>))
        .with_state(UiState::new(controller))
}

#[derive(Deserialize)]
struct TodoForm {
    #[serde(default)]
    todo: String,
}

#[derive(Deserialize)]
struct IdForm {
    id: String,
}

// === Routes ===
// mounting the page refetches the list
async fn root<A: TodoApi>(State(state): State<UiState<A>>) -> Markup {
    state.controller.load().await;
    view::page(&*state.controller.state().await)
}

async fn input<A: TodoApi>(
    State(state): State<UiState<A>>,
    Form(TodoForm { todo }): Form<TodoForm>,
) -> Markup {
    state.controller.set_input(todo).await;
    view::submit_button(&*state.controller.state().await)
}

async fn submit<A: TodoApi>(
    State(state): State<UiState<A>>,
    Form(TodoForm { todo }): Form<TodoForm>,
) -> Markup {
    state.controller.set_input(todo).await;
    state.controller.submit().await;
    state.render_app().await
}

async fn edit<A: TodoApi>(
    State(state): State<UiState<A>>,
    Form(IdForm { id }): Form<IdForm>,
) -> Markup {
    state.controller.begin_edit(&id).await;
    state.render_app().await
}

async fn toggle<A: TodoApi>(
    State(state): State<UiState<A>>,
    Form(IdForm { id }): Form<IdForm>,
) -> Markup {
    state.controller.toggle(&id).await;
    state.render_app().await
}

// renders the item on its way out; the page then posts the confirm
async fn delete<A: TodoApi>(
    State(state): State<UiState<A>>,
    Form(IdForm { id }): Form<IdForm>,
) -> Markup {
    state.controller.mark_deleting(&id).await;
    state.render_app().await
}

async fn confirm_delete<A: TodoApi>(
    State(state): State<UiState<A>>,
    Form(IdForm { id }): Form<IdForm>,
) -> Markup {
    state.controller.delete(&id).await;
    state.render_app().await
}

async fn filter<A: TodoApi>(State(state): State<UiState<A>>) -> Markup {
    state.controller.toggle_filter().await;
    state.render_app().await
}
