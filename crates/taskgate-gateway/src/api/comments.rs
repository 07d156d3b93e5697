use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use taskgate_core::error::TaskGateError;
use taskgate_core::{Action, Comment, Instance, ResourceKind, Subject};

use super::tasks::load_task;
use super::{json_body, load, required_text, ApiResult};
use crate::app_state::AppState;
use crate::policy::Capabilities;
use crate::store::NewComment;

#[derive(Debug, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub can: Capabilities,
}

impl CommentView {
    fn new(state: &AppState, subject: &Subject, comment: Comment) -> Self {
        let can = state.guard().comment_capabilities(subject, &comment);
        Self { comment, can }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentBody {
    pub body: String,
}

async fn load_comment(state: &AppState, id: &str) -> Result<Comment, TaskGateError> {
    load(state, ResourceKind::Comment, id)
        .await?
        .into_comment()
        .ok_or_else(|| TaskGateError::NotFound(format!("comment {id}")))
}

/// Comments on a task the subject can see, minus those hidden by blocking.
pub async fn list(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<CommentView>>> {
    let subject = state.subject(&headers)?;
    let guard = state.guard();
    let task = load_task(&state, &task_id).await?;
    guard.authorize(&subject, ResourceKind::Task, Action::View, Some(Instance::Task(&task)))?;
    guard.authorize(&subject, ResourceKind::Comment, Action::View, None)?;

    let comments = state.store().list_comments(&task.id).await?;
    let views = comments
        .into_iter()
        .filter(|c| {
            guard.allows(&subject, ResourceKind::Comment, Action::View, Some(Instance::Comment(c)))
        })
        .map(|c| CommentView::new(&state, &subject, c))
        .collect();
    Ok(Json(views))
}

pub async fn create(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<CommentBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    let subject = state.subject(&headers)?;
    let guard = state.guard();
    let task = load_task(&state, &task_id).await?;
    guard.authorize(&subject, ResourceKind::Task, Action::View, Some(Instance::Task(&task)))?;
    guard.authorize(&subject, ResourceKind::Comment, Action::Create, None)?;

    let req = json_body(payload)?;
    let comment = state
        .store()
        .insert_comment(NewComment {
            body: required_text("body", &req.body)?,
            author_id: subject.id.clone(),
            task_id: task.id,
        })
        .await?;
    tracing::info!(subject = %subject.id, comment = %comment.id, task = %comment.task_id, "comment created");
    Ok((StatusCode::CREATED, Json(CommentView::new(&state, &subject, comment))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<CommentBody>, JsonRejection>,
) -> ApiResult<Json<CommentView>> {
    let subject = state.subject(&headers)?;
    let current = load_comment(&state, &id).await?;
    state.guard().authorize(
        &subject,
        ResourceKind::Comment,
        Action::Update,
        Some(Instance::Comment(&current)),
    )?;

    let req = json_body(payload)?;
    let next = Comment { body: required_text("body", &req.body)?, ..current.clone() };
    let comment = state.store().update_comment(&current, next).await?;
    tracing::info!(subject = %subject.id, comment = %comment.id, "comment updated");
    Ok(Json(CommentView::new(&state, &subject, comment)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let subject = state.subject(&headers)?;
    let current = load_comment(&state, &id).await?;
    state.guard().authorize(
        &subject,
        ResourceKind::Comment,
        Action::Delete,
        Some(Instance::Comment(&current)),
    )?;

    state.store().delete_comment(&current).await?;
    tracing::info!(subject = %subject.id, comment = %current.id, task = %current.task_id, "comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
