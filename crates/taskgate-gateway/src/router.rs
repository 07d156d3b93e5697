//! Axum router wiring.

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch};
use axum::Router;

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/tasks", get(api::tasks::list).post(api::tasks::create))
        .route(
            "/v1/tasks/:id",
            get(api::tasks::get).patch(api::tasks::update).delete(api::tasks::delete),
        )
        .route(
            "/v1/tasks/:id/comments",
            get(api::comments::list).post(api::comments::create),
        )
        .route(
            "/v1/comments/:id",
            patch(api::comments::update).delete(api::comments::delete),
        )
        .route("/v1/permissions", get(api::admin::permissions))
        .route("/v1/admin/subjects", get(api::admin::subjects))
        .route("/v1/me", get(api::admin::me))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
}

/// Count requests by matched route and status.
async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = req.method().to_string();
    let res = next.run(req).await;
    state.metrics().http_requests.inc(&[
        ("route", route.as_str()),
        ("method", method.as_str()),
        ("status", res.status().as_str()),
    ]);
    res
}
