//! Stateless HTTP request builder and response parser for the task API.
//!
//! # Design
//! `TodoistClient` holds only its `Config` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller (or a `Transport`) executes the round-trip in
//! between.

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{QueryParam, Task};

/// Synchronous, stateless client for the task API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. Every request carries the configured bearer token.
#[derive(Debug, Clone)]
pub struct TodoistClient {
    base_url: String,
    token: String,
    due_lang: String,
}

impl TodoistClient {
    pub fn new(config: Config) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
            due_lang: config.due_lang,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    pub fn build_list_tasks(&self, filter: &QueryParam) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("tasks{filter}"), None)
    }

    pub fn build_get_task(&self, id: &str) -> Result<HttpRequest> {
        Ok(self.request(HttpMethod::Get, &task_path(id, "")?, None))
    }

    pub fn build_create_task(&self, task: &Task) -> Result<HttpRequest> {
        let body = task.payload(&self.due_lang)?.to_json()?;
        Ok(self.request(HttpMethod::Post, "tasks", Some(body)))
    }

    /// Fails with `MissingId` for a task that was never created, so an update
    /// can never land on the create endpoint.
    pub fn build_update_task(&self, task: &Task) -> Result<HttpRequest> {
        let path = task_path(&task.id, "")?;
        let body = task.payload(&self.due_lang)?.to_json()?;
        Ok(self.request(HttpMethod::Post, &path, Some(body)))
    }

    pub fn build_delete_task(&self, id: &str) -> Result<HttpRequest> {
        Ok(self.request(HttpMethod::Delete, &task_path(id, "")?, None))
    }

    pub fn build_close_task(&self, id: &str) -> Result<HttpRequest> {
        Ok(self.request(HttpMethod::Post, &task_path(id, "/close")?, None))
    }

    pub fn build_reopen_task(&self, id: &str) -> Result<HttpRequest> {
        Ok(self.request(HttpMethod::Post, &task_path(id, "/reopen")?, None))
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![(
            "authorization".to_string(),
            format!("Bearer {}", self.token),
        )];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url: format!("{}/{path}", self.base_url),
            headers,
            body,
        }
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_get_task(&self, response: HttpResponse) -> Result<Task> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task> {
        check_status(&response)?;
        decode(&response.body)
    }

    /// Update, delete, close and reopen only report success; any body the
    /// server sends back is ignored.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<()> {
        check_status(&response)
    }
}

/// `tasks/{id}{suffix}` with the id percent-encoded as a single segment.
fn task_path(id: &str, suffix: &str) -> Result<String> {
    if id.is_empty() {
        return Err(ApiError::MissingId);
    }
    Ok(format!("tasks/{}{suffix}", urlencoding::encode(id)))
}

/// Any status below 400 is a success.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.status < 400 {
        return Ok(());
    }
    tracing::warn!(status = response.status, body = %response.body, "request rejected");
    if response.status == 404 {
        return Err(ApiError::NotFound(response.body.clone()));
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::debug!(error = %e, "failed to decode response body");
        ApiError::Deserialization(e.to_string())
    })
}
