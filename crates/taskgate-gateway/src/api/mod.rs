//! JSON HTTP API.
//!
//! Every handler resolves the subject, loads the target instance (if any),
//! and asks the guard before touching the store. Errors render as
//! `{"error": {"code", "msg"}}` with a status derived from `ClientCode`.

pub mod admin;
pub mod comments;
pub mod tasks;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use taskgate_core::error::{ClientCode, TaskGateError};
use taskgate_core::ResourceKind;

use crate::app_state::AppState;
use crate::store::Resource;

/// Handler error wrapper so core errors can become responses.
#[derive(Debug)]
pub struct ApiError(pub TaskGateError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<TaskGateError> for ApiError {
    fn from(e: TaskGateError) -> Self {
        Self(e)
    }
}

pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ClientCode::AuthFailed => StatusCode::UNAUTHORIZED,
        ClientCode::NotAllowed => StatusCode::FORBIDDEN,
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::Conflict => StatusCode::CONFLICT,
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        if code == ClientCode::Internal {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }
        let body = json!({ "error": { "code": code.as_str(), "msg": self.0.to_string() } });
        (status_for(code), Json(body)).into_response()
    }
}

/// Unwrap a JSON body, turning extractor rejections into `BadRequest`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, TaskGateError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| TaskGateError::BadRequest(e.body_text()))
}

/// Stored instance a request targets; `NotFound` if there is none.
pub(crate) async fn load(
    state: &AppState,
    kind: ResourceKind,
    id: &str,
) -> Result<Resource, TaskGateError> {
    state
        .store()
        .fetch_instance(kind, id)
        .await?
        .ok_or_else(|| TaskGateError::NotFound(format!("{kind} {id}")))
}

/// Trimmed, non-empty text field.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, TaskGateError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(TaskGateError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(v.to_string())
}
