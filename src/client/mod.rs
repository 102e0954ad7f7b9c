//! HTTP client for the todo API plus the client-side query cache and the
//! headless list/form/button components built on top of it.

pub mod cache;
pub mod components;
pub mod query;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::{NewTodoRequest, Todo, UpdateTodoRequest};

pub use cache::{QueryCache, QueryState, TODOS_KEY};
pub use components::{CreateTodoForm, DeleteButton, ListView, TodoActions, TodoCard, ToggleButton};
pub use query::TodosQuery;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(StatusCode),
}

#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list_todos(&self) -> Result<Vec<Todo>, ClientError>;
    async fn get_todo(&self, id: i64) -> Result<Option<Todo>, ClientError>;
    async fn create_todo(&self, req: &NewTodoRequest) -> Result<Todo, ClientError>;
    async fn update_todo(&self, id: i64, req: &UpdateTodoRequest) -> Result<(), ClientError>;
    async fn delete_todo(&self, id: i64) -> Result<(), ClientError>;
}

pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn todos_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn todo_url(&self, id: i64) -> String {
        format!("{}/api/todos/{}", self.base_url, id)
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(status))
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.client.get(self.todos_url()).send().await?;
        Ok(ensure_success(response)?.json().await?)
    }

    async fn get_todo(&self, id: i64) -> Result<Option<Todo>, ClientError> {
        let response = self.client.get(self.todo_url(id)).send().await?;
        Ok(ensure_success(response)?.json().await?)
    }

    async fn create_todo(&self, req: &NewTodoRequest) -> Result<Todo, ClientError> {
        let response = self.client.post(self.todos_url()).json(req).send().await?;
        Ok(ensure_success(response)?.json().await?)
    }

    async fn update_todo(&self, id: i64, req: &UpdateTodoRequest) -> Result<(), ClientError> {
        let response = self.client.put(self.todo_url(id)).json(req).send().await?;
        ensure_success(response)?;
        Ok(())
    }

    async fn delete_todo(&self, id: i64) -> Result<(), ClientError> {
        let response = self.client.delete(self.todo_url(id)).send().await?;
        ensure_success(response)?;
        Ok(())
    }
}
