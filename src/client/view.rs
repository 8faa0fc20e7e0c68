use maud::{html, Markup, DOCTYPE};

use crate::models::Todo;

use super::state::ClientState;

// every mutation re-renders the whole app fragment
const TARGET: &str = "#app";
const SWAP: &str = "outerHTML";

pub fn page(state: &ClientState) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "morTodo" }
                script src="https://unpkg.com/htmx.org@1.9.10" {}
                script src="https://cdn.tailwindcss.com" {}
            }
            body class="bg-gray-100 font-sans leading-normal tracking-normal" {
                div class="container mx-auto p-8" {
                    h1 class="text-4xl text-center text-gray-700 mb-6" { "morTodo" }
                    (app(state))
                }
            }
        }
    }
}

pub fn app(state: &ClientState) -> Markup {
    html! {
        div #app {
            (form_html(state))
            (filter_html(state))
            hr;
            h2 { "Your Todos" }
            (todos_html(state))
        }
    }
}

// === Components ===
fn form_html(state: &ClientState) -> Markup {
    html! {
        div.add-section {
            h2 { @if state.is_editing() { "Edit a Todo" } @else { "Add a Todo" } }
            form.input-group hx-post="/ui/submit" hx-target=(TARGET) hx-swap=(SWAP) {
                input type="text" name="todo" value=(state.input) placeholder="Enter your todo"
                    hx-post="/ui/input" hx-trigger="keyup changed delay:150ms"
                    hx-target="#submit" hx-swap=(SWAP);
                (submit_button(state))
            }
        }
    }
}

/// The form button alone, re-rendered as the input changes.
pub fn submit_button(state: &ClientState) -> Markup {
    html! {
        button #submit type="submit" disabled[!state.can_submit()] {
            @if state.is_editing() { "Update" } @else { "Add" }
        }
    }
}

fn filter_html(state: &ClientState) -> Markup {
    html! {
        div.filter-section {
            input #show type="checkbox" checked[state.show_finished]
                hx-post="/ui/filter" hx-target=(TARGET) hx-swap=(SWAP);
            label for="show" { "Show Finished" }
        }
    }
}

fn todo_html(todo: &Todo, deleting: bool) -> Markup {
    // ids travel in the form body, never in the path
    let vals = serde_json::json!({ "id": todo.id });
    html! {
        div.todo-item.slide-out[deleting] {
            div.todo-text {
                input type="checkbox" checked[todo.is_completed]
                    hx-post="/ui/toggle" hx-vals=(vals) hx-target=(TARGET) hx-swap=(SWAP);
                span.completed[todo.is_completed] { (todo.todo) }
            }
            div.todo-buttons {
                button hx-post="/ui/edit" hx-vals=(vals) hx-target=(TARGET) hx-swap=(SWAP) { "Edit" }
                button hx-post="/ui/delete" hx-vals=(vals) hx-target=(TARGET) hx-swap=(SWAP) { "Delete" }
            }
            // once the exit transition has played, ask for the real delete
            @if deleting {
                div.hidden hx-post="/ui/delete/confirm" hx-trigger="load delay:300ms"
                    hx-vals=(vals) hx-target=(TARGET) hx-swap=(SWAP) {}
            }
        }
    }
}

fn todos_html(state: &ClientState) -> Markup {
    html! {
        div.todo-list {
            @if state.todos.is_empty() {
                div.no-todo { "No Todos to display" }
            }
            @for todo in state.visible() {
                (todo_html(todo, state.is_deleting(&todo.id)))
            }
        }
    }
}
