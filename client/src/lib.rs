//! Typed HTTP facade over the task API, for consumption by presentation
//! layers. No retries, no caching, no circuit breaking.

use reqwest::StatusCode;
use todolist_shared::{CreateTaskRequest, TaskInfo, UpdateTaskRequest};

pub struct TodoListClient {
    http: reqwest::Client,
    base_url: String,
}

impl TodoListClient {
    /// The base URL is normalized to end with exactly one `/`, so request
    /// paths can be appended directly.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = normalize_base_url(base_url.into());
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn tasks(&self) -> Result<Vec<TaskInfo>, reqwest::Error> {
        self.http
            .get(self.url("tasks"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Fetches one task; `Ok(None)` when the id is unknown.
    pub async fn task(&self, id: i64) -> Result<Option<TaskInfo>, reqwest::Error> {
        let resp = self
            .http
            .get(self.url(&format!("tasks/{id}")))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(resp.error_for_status()?.json().await?))
    }

    /// Creates a task and returns its assigned id.
    pub async fn create(&self, body: &CreateTaskRequest) -> Result<i64, reqwest::Error> {
        self.http
            .post(self.url("tasks"))
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Applies a partial update; `Ok(None)` when the id is unknown.
    pub async fn update(
        &self,
        id: i64,
        body: &UpdateTaskRequest,
    ) -> Result<Option<i64>, reqwest::Error> {
        let resp = self
            .http
            .put(self.url(&format!("tasks/{id}")))
            .json(body)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(resp.error_for_status()?.json().await?))
    }

    /// Deletes a task; `Ok(false)` when the id is unknown.
    pub async fn delete(&self, id: i64) -> Result<bool, reqwest::Error> {
        let resp = self
            .http
            .delete(self.url(&format!("tasks/{id}")))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        resp.error_for_status()?;
        Ok(true)
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    if !base_url.is_empty() && !base_url.ends_with('/') {
        base_url.push('/');
    }
    base_url
}
