//! The page side of the app: local list state, the calls it makes against
//! the API and how it renders.

pub mod controller;
pub mod http;
pub mod state;
pub mod view;

pub use controller::Controller;
pub use http::{ClientError, HttpTodoApi, TodoApi};
pub use state::ClientState;
