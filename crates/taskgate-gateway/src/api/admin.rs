//! Subject and permission introspection.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use taskgate_core::policy::{permission_matrix, MatrixEntry};
use taskgate_core::{Action, ResourceKind, Subject};

use super::ApiResult;
use crate::app_state::AppState;

/// The permission matrix derived from the rule table. Public.
pub async fn permissions() -> Json<Vec<MatrixEntry>> {
    Json(permission_matrix())
}

/// The caller's own resolved subject.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Subject>> {
    Ok(Json(state.subject(&headers)?))
}

/// All known subjects. Admin UI only.
pub async fn subjects(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Vec<Subject>>> {
    let subject = state.subject(&headers)?;
    state
        .guard()
        .authorize(&subject, ResourceKind::Task, Action::ManagePermissions, None)?;
    Ok(Json(state.resolver().subjects()))
}
