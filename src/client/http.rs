use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{NewTodo, Todo, TodoPatch};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("invalid api url `{0}`")]
    Url(String),
}

impl ClientError {
    /// True when the server received the request and answered, even if
    /// the answer was an error.
    pub fn server_answered(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

/// The four calls the page makes against the todo API.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ClientError>;
    async fn create(&self, todo: &Todo) -> Result<Todo, ClientError>;
    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<Option<Todo>, ClientError>;
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    http: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpTodoApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|_| ClientError::Url(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Url(base_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    // each segment is percent-encoded, so ids may contain `/`, `?` or `#`
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // turns `500 {"error": ...}` into a typed error
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(ClientError::Server { status, message })
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.http.get(self.url(&["todos"])?).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create(&self, todo: &Todo) -> Result<Todo, ClientError> {
        let body = NewTodo::from(todo.clone());
        let response = self.http.post(self.url(&["todos"])?).json(&body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<Option<Todo>, ClientError> {
        let response = self
            .http
            .put(self.url(&["todos", id])?)
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&["todos", id])?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
