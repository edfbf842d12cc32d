//! The router end to end over in-memory adapters.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::Utc;
use pm_auth::{AuthError, SessionClaims, TokenVerifier};
use pm_board::memory::{
    InMemoryIssueStore, InMemorySprintSource, SlidingWindowLimiter, StaticDirectory,
    StaticMembers,
};
use pm_board::{Board, Ports};
use pm_config::GeneralConfig;
use pm_core::entities::{Issue, UserProjection};
use pm_core::enums::{IssueStatus, IssueType};
use pm_core::position::Position;
use pm_server::{AppState, router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Accepts tokens of the form `token-<user id>`.
struct PrefixVerifier;

#[async_trait]
impl TokenVerifier for PrefixVerifier {
    async fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let user_id = token
            .strip_prefix("token-")
            .ok_or_else(|| AuthError::JwksValidation("bad signature".into()))?;
        Ok(SessionClaims {
            user_id: user_id.to_string(),
            session_id: Some("sess_1".into()),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        })
    }
}

fn issue(id: &str, creator: &str, parent: Option<&str>) -> Issue {
    let now = Utc::now();
    Issue {
        id: id.into(),
        key: format!("ISSUE-{id}"),
        name: format!("Issue {id}"),
        description: None,
        issue_type: IssueType::Task,
        status: IssueStatus::Open,
        position: Position::origin(),
        creator_id: creator.into(),
        assignee_id: None,
        reporter_id: None,
        parent_id: parent.map(String::from),
        sprint_id: None,
        project_id: None,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

fn user(id: &str) -> UserProjection {
    UserProjection {
        id: id.into(),
        name: format!("User {id}"),
        email: None,
        avatar: None,
    }
}

fn app_with_limit(max_requests: u32) -> Router {
    let issues = vec![
        issue("1", "user_1", None),
        issue("2", "user_1", Some("1")),
        issue("3", "user_1", None),
        issue("9", "init", None),
    ];
    let ports = Ports {
        issues: Arc::new(InMemoryIssueStore::new(issues)),
        sprints: Arc::new(InMemorySprintSource::new(Vec::new())),
        directory: Arc::new(StaticDirectory::new(vec![user("user_1"), user("user_a")])),
        members: Arc::new(StaticMembers::new(HashMap::from([(
            "prj-1".to_string(),
            vec!["user_a".to_string()],
        )]))),
        limiter: Arc::new(SlidingWindowLimiter::new(
            max_requests,
            Duration::from_secs(10),
        )),
    };
    let board = Board::new(&ports, &GeneralConfig::default());
    router(AppState::new(board, Arc::new(PrefixVerifier), "init"))
}

fn app() -> Router {
    app_with_limit(100)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn ids(issues: &Value) -> Vec<&str> {
    issues
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(app(), request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn get_issues_returns_callers_tree() {
    let (status, body) = send(
        app(),
        request(Method::GET, "/issues", Some("token-user_1"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["issues"]), vec!["1", "2", "3"]);
    assert_eq!(ids(&body["issues"][0]["children"]), vec!["2"]);
    assert_eq!(body["issues"][1]["parent"]["id"], "1");
}

#[tokio::test]
async fn anonymous_get_reads_fallback_creator() {
    let (status, body) = send(app(), request(Method::GET, "/issues", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["issues"]), vec!["9"]);

    let (_, body) = send(
        app(),
        request(Method::GET, "/issues", Some("forged"), None),
    )
    .await;
    assert_eq!(ids(&body["issues"]), vec!["9"]);
}

#[tokio::test]
async fn session_cookie_identifies_caller() {
    let req = Request::builder()
        .method(Method::GET)
        .uri("/issues")
        .header(header::COOKIE, "theme=dark; __session=token-user_1")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(app(), req).await;
    assert_eq!(ids(&body["issues"]), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn patch_without_caller_is_forbidden() {
    let (status, body) = send(
        app(),
        request(
            Method::PATCH,
            "/issues",
            None,
            Some(json!({"ids": ["1"], "status": "DONE"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["type"], "unauthenticated");
}

#[tokio::test]
async fn patch_updates_listed_issues() {
    let (status, body) = send(
        app(),
        request(
            Method::PATCH,
            "/issues",
            Some("token-user_1"),
            Some(json!({"ids": ["1", "2"], "status": "DONE"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["issues"]), vec!["1", "2"]);
    assert!(body["issues"].as_array().unwrap().iter().all(|i| i["status"] == "DONE"));
    assert!(body.get("failed").is_none());
}

#[tokio::test]
async fn patch_rejects_invalid_body() {
    let (status, body) = send(
        app(),
        request(
            Method::PATCH,
            "/issues",
            Some("token-user_1"),
            Some(json!({"ids": ["1"], "status": "SHIPPED"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "bad_request");
}

#[tokio::test]
async fn patch_with_unknown_assignee_is_not_found() {
    let (status, body) = send(
        app(),
        request(
            Method::PATCH,
            "/issues",
            Some("token-user_1"),
            Some(json!({"ids": ["1"], "assigneeId": "user_ghost"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("user_ghost")
    );
}

#[tokio::test]
async fn writes_beyond_budget_are_rate_limited() {
    let app = app_with_limit(1);
    let patch = || {
        request(
            Method::PATCH,
            "/issues",
            Some("token-user_1"),
            Some(json!({"ids": ["1"], "type": "BUG"})),
        )
    };

    let first = app.clone().oneshot(patch()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(patch()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key(header::RETRY_AFTER));
}

#[tokio::test]
async fn post_creates_issue() {
    let (status, body) = send(
        app(),
        request(
            Method::POST,
            "/issues",
            Some("token-user_1"),
            Some(json!({
                "name": "Write release notes",
                "type": "STORY",
                "sprintId": null,
                "reporterId": "user_1",
                "parentId": null
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["issue"]["name"], "Write release notes");
    assert_eq!(body["issue"]["type"], "STORY");
    assert_eq!(body["issue"]["status"], "OPEN");
    assert_eq!(body["issue"]["creatorId"], "user_1");
}

#[tokio::test]
async fn project_members_are_listed() {
    let (status, body) = send(
        app(),
        request(Method::GET, "/projects/prj-1/members", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"][0]["id"], "user_a");
    assert_eq!(body["members"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        app(),
        request(Method::GET, "/projects/prj-none/members", None, None),
    )
    .await;
    assert_eq!(body, json!({"members": []}));
}
