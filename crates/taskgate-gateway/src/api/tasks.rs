use std::collections::BTreeSet;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use taskgate_core::error::TaskGateError;
use taskgate_core::{Action, Instance, ResourceKind, Subject, Task};

use super::{json_body, load, required_text, ApiResult};
use crate::app_state::AppState;
use crate::policy::Capabilities;
use crate::store::NewTask;

/// A task as rendered to a particular subject.
#[derive(Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub can: Capabilities,
}

impl TaskView {
    fn new(state: &AppState, subject: &Subject, task: Task) -> Self {
        let can = state.guard().task_capabilities(subject, &task);
        Self { task, can }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub invited_users: BTreeSet<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Editable fields. The invite list is fixed at creation.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

pub(crate) async fn load_task(state: &AppState, id: &str) -> Result<Task, TaskGateError> {
    load(state, ResourceKind::Task, id)
        .await?
        .into_task()
        .ok_or_else(|| TaskGateError::NotFound(format!("task {id}")))
}

pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Vec<TaskView>>> {
    let subject = state.subject(&headers)?;
    let guard = state.guard();
    guard.authorize(&subject, ResourceKind::Task, Action::View, None)?;

    let tasks = state.store().list_tasks().await?;
    let views = tasks
        .into_iter()
        .filter(|t| guard.allows(&subject, ResourceKind::Task, Action::View, Some(Instance::Task(t))))
        .map(|t| TaskView::new(&state, &subject, t))
        .collect();
    Ok(Json(views))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    let subject = state.subject(&headers)?;
    state.guard().authorize(&subject, ResourceKind::Task, Action::Create, None)?;

    let req = json_body(payload)?;
    let title = required_text("title", &req.title)?;
    let mut invited_users = req.invited_users;
    invited_users.remove(&subject.id);

    let task = state
        .store()
        .insert_task(NewTask {
            title,
            owner_id: subject.id.clone(),
            invited_users,
            completed: req.completed,
        })
        .await?;
    tracing::info!(subject = %subject.id, task = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(TaskView::new(&state, &subject, task))))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<TaskView>> {
    let subject = state.subject(&headers)?;
    let task = load_task(&state, &id).await?;
    state
        .guard()
        .authorize(&subject, ResourceKind::Task, Action::View, Some(Instance::Task(&task)))?;
    Ok(Json(TaskView::new(&state, &subject, task)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<PatchTask>, JsonRejection>,
) -> ApiResult<Json<TaskView>> {
    let subject = state.subject(&headers)?;
    let current = load_task(&state, &id).await?;
    // decided against the stored task, not the requested change
    state
        .guard()
        .authorize(&subject, ResourceKind::Task, Action::Update, Some(Instance::Task(&current)))?;

    let patch = json_body(payload)?;
    let mut next = current.clone();
    if let Some(title) = patch.title {
        next.title = required_text("title", &title)?;
    }
    if let Some(completed) = patch.completed {
        next.completed = completed;
    }

    let task = state.store().update_task(&current, next).await?;
    tracing::info!(subject = %subject.id, task = %task.id, completed = task.completed, "task updated");
    Ok(Json(TaskView::new(&state, &subject, task)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let subject = state.subject(&headers)?;
    let task = load_task(&state, &id).await?;
    state
        .guard()
        .authorize(&subject, ResourceKind::Task, Action::Delete, Some(Instance::Task(&task)))?;

    // only removed if it still matches what was authorized
    state.store().delete_task(&task).await?;
    tracing::info!(subject = %subject.id, task = %task.id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}
