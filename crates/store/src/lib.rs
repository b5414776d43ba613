//! Remote task store collaborator: the `TaskStore` seam plus an HTTP
//! client speaking a PostgREST-style row API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::json;
use shared::{
    domain::{NewTask, Task, TaskId},
    error::StoreError,
};
use tracing::{debug, warn};
use url::Url;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All task rows, most recently created first.
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;
    /// Inserts a draft and returns the stored row with its assigned id and
    /// creation timestamp.
    async fn insert_task(&self, draft: NewTask) -> Result<Task, StoreError>;
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<(), StoreError>;
    async fn set_text(&self, id: TaskId, text: &str) -> Result<(), StoreError>;
    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct HttpTaskStoreConfig {
    pub base_url: String,
    pub table: String,
    pub api_key: Option<String>,
}

pub struct HttpTaskStore {
    http: Client,
    table_url: Url,
    api_key: Option<String>,
}

impl HttpTaskStore {
    pub fn new(config: HttpTaskStoreConfig) -> Result<Self> {
        let raw = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.table
        );
        let table_url =
            Url::parse(&raw).with_context(|| format!("invalid store url '{raw}'"))?;
        Ok(Self {
            http: Client::new(),
            table_url,
            api_key: config.api_key,
        })
    }

    fn row_url(&self, id: TaskId) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id.0));
        url
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("apikey", key).bearer_auth(key),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = builder.send().await.map_err(transport_error)?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(error_from_response(response).await)
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");
        debug!(%url, "listing task rows");
        let response = self.send(self.authorized(self.http.get(url))).await?;
        response.json::<Vec<Task>>().await.map_err(decode_error)
    }

    async fn insert_task(&self, draft: NewTask) -> Result<Task, StoreError> {
        let response = self
            .send(
                self.authorized(self.http.post(self.table_url.clone()))
                    .header("Prefer", "return=representation")
                    .json(&draft),
            )
            .await?;
        let mut rows = response.json::<Vec<Task>>().await.map_err(decode_error)?;
        if rows.is_empty() {
            return Err(StoreError::new(
                "decode",
                "insert returned no representation",
            ));
        }
        Ok(rows.remove(0))
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<(), StoreError> {
        self.send(
            self.authorized(self.http.patch(self.row_url(id)))
                .json(&json!({ "completed": completed })),
        )
        .await?;
        Ok(())
    }

    async fn set_text(&self, id: TaskId, text: &str) -> Result<(), StoreError> {
        self.send(
            self.authorized(self.http.patch(self.row_url(id)))
                .json(&json!({ "text": text })),
        )
        .await?;
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        self.send(self.authorized(self.http.delete(self.row_url(id))))
            .await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::new("transport", err.to_string())
}

fn decode_error(err: reqwest::Error) -> StoreError {
    StoreError::new("decode", err.to_string())
}

async fn error_from_response(response: Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<StoreError>(&body) {
        Ok(err) => err,
        Err(_) => {
            warn!(%status, "store returned an undecodable error body");
            let message = if body.trim().is_empty() {
                status_message(status)
            } else {
                body
            };
            StoreError::new(status.as_str(), message)
        }
    }
}

fn status_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
