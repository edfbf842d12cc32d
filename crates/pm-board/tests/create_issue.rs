//! Creating issues at the end of their list.

mod common;

use std::sync::Arc;

use common::{DenyAll, FixtureBuilder, caller, issue};
use pm_board::{BoardError, IssueCreator};
use pm_core::enums::{IssueStatus, IssueType};
use pm_core::position::{MAX_POSITION_LEN, Position};
use pretty_assertions::assert_eq;

const BACKLOG_BUG: &[u8] =
    br#"{"name":"  Login fails  ","type":"BUG","sprintId":null,"reporterId":"user_r","parentId":null}"#;

#[tokio::test]
async fn first_issue_gets_origin_position() {
    let fx = FixtureBuilder::default().build();
    let creator = IssueCreator::new(fx.ports.clone());

    let created = creator
        .create(Some(&caller("user_1")), BACKLOG_BUG)
        .await
        .unwrap()
        .issue;

    assert_eq!(created.name, "Login fails");
    assert_eq!(created.issue_type, IssueType::Bug);
    assert_eq!(created.status, IssueStatus::Open);
    assert_eq!(created.creator_id, "user_1");
    assert_eq!(created.reporter_id.as_deref(), Some("user_r"));
    assert_eq!(created.position, Position::origin());
    assert!(created.project_id.is_none());
    assert!(!created.is_deleted);
}

#[tokio::test]
async fn new_issue_sorts_after_its_siblings() {
    let mut in_sprint = issue("a", "user_1");
    in_sprint.sprint_id = Some("spr-1".into());
    in_sprint.position = Position::parse("t").unwrap();
    let mut backlog = issue("b", "user_1");
    backlog.position = Position::parse("y").unwrap();

    let fx = FixtureBuilder::default()
        .issues(vec![in_sprint, backlog])
        .build();
    let creator = IssueCreator::new(fx.ports.clone());

    let created = creator
        .create(
            Some(&caller("user_1")),
            br#"{"name":"Next","type":"TASK","sprintId":"spr-1","reporterId":null,"parentId":null}"#,
        )
        .await
        .unwrap()
        .issue;

    assert_eq!(created.sprint_id.as_deref(), Some("spr-1"));
    assert!(created.position > Position::parse("t").unwrap());
    assert!(created.position < Position::parse("y").unwrap());
}

#[tokio::test]
async fn exhausted_list_is_rebalanced_before_insert() {
    let mut first = issue("a", "user_1");
    first.position = Position::parse("i").unwrap();
    let mut crowded = issue("b", "user_1");
    crowded.position = Position::parse("z".repeat(MAX_POSITION_LEN)).unwrap();

    let fx = FixtureBuilder::default()
        .issues(vec![first, crowded])
        .build();
    let creator = IssueCreator::new(fx.ports.clone());

    let created = creator
        .create(Some(&caller("user_1")), BACKLOG_BUG)
        .await
        .unwrap()
        .issue;

    let mut rows = fx.store.inner.snapshot().await;
    rows.sort_by(|a, b| a.position.cmp(&b.position));
    let order: Vec<_> = rows.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(order, vec!["a", "b", created.id.as_str()]);
    assert!(rows.iter().all(|i| i.position.as_str().len() < MAX_POSITION_LEN));
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let fx = FixtureBuilder::default().build();
    let creator = IssueCreator::new(fx.ports.clone());

    let err = creator
        .create(
            Some(&caller("user_1")),
            br#"{"name":" ","type":"TASK","sprintId":null,"reporterId":null,"parentId":null}"#,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::InvalidBody(_)));
    assert_eq!(fx.store.write_count(), 0);
}

#[tokio::test]
async fn create_requires_caller_and_budget() {
    let fx = FixtureBuilder::default().build();
    let creator = IssueCreator::new(fx.ports.clone());
    assert!(matches!(
        creator.create(None, BACKLOG_BUG).await,
        Err(BoardError::Unauthenticated)
    ));

    let fx = FixtureBuilder::default().limiter(Arc::new(DenyAll)).build();
    let creator = IssueCreator::new(fx.ports.clone());
    assert!(matches!(
        creator.create(Some(&caller("user_1")), BACKLOG_BUG).await,
        Err(BoardError::RateLimited { .. })
    ));
    assert_eq!(fx.store.write_count(), 0);
}
