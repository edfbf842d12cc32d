//! Route table and handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pm_core::responses::{
    CreateIssueResponse, GetIssuesResponse, PatchIssuesResponse, ProjectMembersResponse,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::caller::Caller;
use crate::error::ApiResult;
use crate::state::AppState;

/// The full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/issues",
            get(list_issues).patch(patch_issues).post(create_issue),
        )
        .route("/projects/{project_id}/members", get(project_members))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Without a caller this reads the configured anonymous creator's issues.
async fn list_issues(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<GetIssuesResponse>> {
    let creator_id = caller
        .identity()
        .map_or(&*state.anonymous_creator_id, |identity| {
            identity.user_id.as_str()
        });
    let response = state.board.reader.list_for_creator(creator_id).await?;
    Ok(Json(response))
}

async fn patch_issues(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> ApiResult<Json<PatchIssuesResponse>> {
    let response = state
        .board
        .patcher
        .patch(caller.identity(), &body)
        .await?;
    Ok(Json(response))
}

async fn create_issue(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CreateIssueResponse>)> {
    let response = state
        .board
        .creator
        .create(caller.identity(), &body)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn project_members(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<ProjectMembersResponse>> {
    let response = state.board.members.list(&project_id).await?;
    Ok(Json(response))
}
