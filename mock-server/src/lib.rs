use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Due {
    pub string: String,
    pub date: String,
    pub datetime: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub content: String,
    pub project_id: String,
    pub order: i64,
    pub priority: i64,
    pub label_ids: Vec<i64>,
    pub completed: bool,
    pub comment_count: u32,
    pub indent: u32,
    pub due: Option<Due>,
}

/// Body accepted by create and update. Absent fields leave the task as is.
#[derive(Debug, Default, Deserialize)]
pub struct TaskInput {
    pub content: Option<String>,
    pub project_id: Option<String>,
    pub order: Option<i64>,
    pub label_ids: Option<Vec<i64>>,
    pub priority: Option<i64>,
    pub due_string: Option<String>,
    pub due_datetime: Option<String>,
    pub due_lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    pub project_id: Option<String>,
    pub label_id: Option<i64>,
    /// Comma separated task ids.
    pub ids: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, Task>>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub token: Arc<str>,
}

pub const DEFAULT_PROJECT_ID: &str = "inbox";

pub fn app(token: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(HashMap::new())),
        token: Arc::from(token),
    };
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).post(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/close", post(close_task))
        .route("/tasks/{id}/reopen", post(reopen_task))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    tracing::info!(addr = ?listener.local_addr().ok(), "mock server listening");
    axum::serve(listener, app(token)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|t| t == &*state.token);
    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected unauthenticated request");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(request).await
}

fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Task not found")
}

fn apply(task: &mut Task, input: TaskInput) {
    if let Some(content) = input.content {
        task.content = content;
    }
    if let Some(project_id) = input.project_id {
        task.project_id = project_id;
    }
    if let Some(order) = input.order {
        task.order = order;
    }
    if let Some(label_ids) = input.label_ids {
        task.label_ids = label_ids;
    }
    if let Some(priority) = input.priority {
        task.priority = priority;
    }
    if input.due_string.is_some() || input.due_datetime.is_some() {
        let due = task.due.get_or_insert_with(Due::default);
        if let Some(string) = input.due_string {
            due.string = string;
        }
        if let Some(datetime) = input.due_datetime {
            due.date = datetime.get(..10).unwrap_or_default().to_string();
            due.datetime = Some(datetime);
        }
    }
}

async fn list_tasks(State(state): State<AppState>, Query(filter): Query<ListFilter>) -> Json<Vec<Task>> {
    let ids: Option<Vec<&str>> = filter.ids.as_deref().map(|s| s.split(',').collect());
    let tasks = state.db.read().await;
    let mut matched: Vec<Task> = tasks
        .values()
        .filter(|t| !t.completed)
        .filter(|t| filter.project_id.as_ref().map_or(true, |p| &t.project_id == p))
        .filter(|t| filter.label_id.map_or(true, |l| t.label_ids.contains(&l)))
        .filter(|t| ids.as_ref().map_or(true, |ids| ids.contains(&t.id.as_str())))
        .cloned()
        .collect();
    matched.sort_by_key(|t| t.order);
    Json(matched)
}

async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>, (StatusCode, &'static str)> {
    if input.content.as_deref().unwrap_or_default().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "content is required"));
    }
    let mut tasks = state.db.write().await;
    let mut task = Task {
        id: Uuid::new_v4().simple().to_string(),
        project_id: DEFAULT_PROJECT_ID.to_string(),
        order: tasks.len() as i64 + 1,
        priority: 1,
        ..Task::default()
    };
    apply(&mut task, input);
    tasks.insert(task.id.clone(), task.clone());
    Ok(Json(task))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, (StatusCode, &'static str)> {
    let tasks = state.db.read().await;
    tasks.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TaskInput>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    if input.content.as_deref() == Some("") {
        return Err((StatusCode::BAD_REQUEST, "content must not be empty"));
    }
    let mut tasks = state.db.write().await;
    let task = tasks.get_mut(&id).ok_or_else(not_found)?;
    apply(task, input);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    let mut tasks = state.db.write().await;
    tasks.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or_else(not_found)
}

async fn set_completed(state: &AppState, id: &str, completed: bool) -> Result<StatusCode, (StatusCode, &'static str)> {
    let mut tasks = state.db.write().await;
    let task = tasks.get_mut(id).ok_or_else(not_found)?;
    task.completed = completed;
    Ok(StatusCode::NO_CONTENT)
}

async fn close_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    set_completed(&state, &id, true).await
}

async fn reopen_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    set_completed(&state, &id, false).await
}
