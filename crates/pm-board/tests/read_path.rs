//! Reading a creator's issues as nested views.

mod common;

use common::{CountingDirectory, FixtureBuilder, issue, sprint, user};
use pm_board::IssueReader;
use pm_core::enums::SprintStatus;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn deleted_child_is_excluded_from_parent_view() {
    let root = issue("1", "user_1");
    let mut child = issue("2", "user_1");
    child.parent_id = Some("1".into());
    let mut deleted = issue("3", "user_1");
    deleted.parent_id = Some("1".into());
    deleted.is_deleted = true;

    let fx = FixtureBuilder::default()
        .issues(vec![root, child, deleted])
        .build();
    let response = IssueReader::new(fx.ports.clone())
        .list_for_creator("user_1")
        .await
        .unwrap();

    let ids: Vec<_> = response.issues.iter().map(|v| v.issue.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    let children: Vec<_> = response.issues[0]
        .children
        .iter()
        .map(|v| v.issue.id.as_str())
        .collect();
    assert_eq!(children, vec!["2"]);
    assert_eq!(
        response.issues[1].parent.as_ref().map(|p| p.issue.id.as_str()),
        Some("1")
    );
}

#[tokio::test]
async fn only_callers_issues_are_returned() {
    let fx = FixtureBuilder::default()
        .issues(vec![issue("1", "user_1"), issue("2", "user_2")])
        .build();
    let response = IssueReader::new(fx.ports.clone())
        .list_for_creator("user_2")
        .await
        .unwrap();
    assert_eq!(response.issues.len(), 1);
    assert_eq!(response.issues[0].issue.id, "2");
}

#[tokio::test]
async fn no_issues_short_circuits_before_directory() {
    let fx = FixtureBuilder::default()
        .issues(vec![issue("1", "user_1")])
        .users(vec![user("user_a")])
        .build();
    let response = IssueReader::new(fx.ports.clone())
        .list_for_creator("user_nobody")
        .await
        .unwrap();
    assert!(response.issues.is_empty());
    assert_eq!(fx.directory.call_count(), 0);
}

#[tokio::test]
async fn issues_without_people_skip_directory() {
    let fx = FixtureBuilder::default()
        .issues(vec![issue("1", "user_1")])
        .build();
    IssueReader::new(fx.ports.clone())
        .list_for_creator("user_1")
        .await
        .unwrap();
    assert_eq!(fx.directory.call_count(), 0);
}

#[tokio::test]
async fn sprint_activity_and_users_are_resolved() {
    let mut active = issue("1", "user_1");
    active.sprint_id = Some("spr-a".into());
    active.assignee_id = Some("user_a".into());
    active.reporter_id = Some("user_gone".into());
    let mut closed = issue("2", "user_1");
    closed.sprint_id = Some("spr-c".into());

    let fx = FixtureBuilder::default()
        .issues(vec![active, closed])
        .sprints(vec![
            sprint("spr-a", SprintStatus::Active),
            sprint("spr-c", SprintStatus::Closed),
        ])
        .users(vec![user("user_a")])
        .build();
    let response = IssueReader::new(fx.ports.clone())
        .list_for_creator("user_1")
        .await
        .unwrap();

    assert!(response.issues[0].sprint_is_active);
    assert!(!response.issues[1].sprint_is_active);
    assert_eq!(
        response.issues[0].assignee.as_ref().map(|u| u.id.as_str()),
        Some("user_a")
    );
    assert!(response.issues[0].reporter.is_none());
    assert_eq!(fx.directory.call_count(), 1);
}

#[tokio::test]
async fn directory_failure_leaves_users_unresolved() {
    let mut assigned = issue("1", "user_1");
    assigned.assignee_id = Some("user_a".into());

    let fx = FixtureBuilder::default()
        .issues(vec![assigned])
        .directory(CountingDirectory::failing())
        .build();
    let response = IssueReader::new(fx.ports.clone())
        .list_for_creator("user_1")
        .await
        .unwrap();

    assert_eq!(response.issues.len(), 1);
    assert!(response.issues[0].assignee.is_none());
}

#[tokio::test]
async fn response_serializes_with_wire_names() {
    let mut child = issue("2", "user_1");
    child.parent_id = Some("1".into());
    let fx = FixtureBuilder::default()
        .issues(vec![issue("1", "user_1"), child])
        .build();
    let response = IssueReader::new(fx.ports.clone())
        .list_for_creator("user_1")
        .await
        .unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["issues"][0]["children"][0]["id"], "2");
    assert_eq!(json["issues"][1]["parent"]["id"], "1");
    assert_eq!(json["issues"][1]["parent"]["parent"], serde_json::Value::Null);
    assert_eq!(json["issues"][0]["sprintIsActive"], false);
    assert_eq!(json["issues"][0]["isDeleted"], false);
}
