//! Deletion and update rules for block content. Documents are the one type
//! with a creator override; messages, events, and goals are author-only.

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use super::common::*;
use crate::error::ApiError;
use podspace_storage::{
    BlockType, CreateEventParams, CreateGoalParams, GoalStatus, PodRole, UpdateGoalParams, UserId,
};

struct ContentFixture {
    creator: UserId,
    member: UserId,
    block_id: podspace_storage::BlockId,
}

async fn content_fixture(
    server: &crate::server::PodspaceServer,
    block_type: BlockType,
) -> ContentFixture {
    let (creator, _) = create_test_user(server, "creator@example.com", "Creator").await;
    let (member, _) = create_test_user(server, "member@example.com", "Member").await;
    let pod = create_test_pod(server, &creator.id, "Team").await;
    server
        .store
        .add_pod_member(&pod.id, &member.id, PodRole::Member)
        .await
        .unwrap();
    let block = create_test_block(server, &creator.id, &pod.id, block_type, "shared").await;
    server
        .add_block_member(&creator.id, &block.id, &member.id)
        .await
        .unwrap();
    ContentFixture {
        creator: creator.id,
        member: member.id,
        block_id: block.id,
    }
}

#[tokio::test]
async fn document_delete_allows_uploader_or_block_creator() {
    let server = create_test_server().await;
    let fx = content_fixture(&server, BlockType::Docs).await;

    // Block creator may delete a member's upload.
    let doc = server
        .create_document(&fx.member, &fx.block_id, "roadmap.pdf", "application/pdf", 2048)
        .await
        .unwrap();
    server.delete_document(&fx.creator, &doc.id).await.unwrap();

    // A third member may not.
    let (third, _) = create_test_user(&server, "third@example.com", "Third").await;
    let block = server.store.get_block(&fx.block_id).await.unwrap();
    server
        .store
        .add_pod_member(&block.pod_id, &third.id, PodRole::Member)
        .await
        .unwrap();
    server
        .add_block_member(&fx.creator, &fx.block_id, &third.id)
        .await
        .unwrap();
    let doc = server
        .create_document(&fx.member, &fx.block_id, "notes.txt", "text/plain", 64)
        .await
        .unwrap();
    let err = server.delete_document(&third.id, &doc.id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    // The uploader always may.
    server.delete_document(&fx.member, &doc.id).await.unwrap();
}

#[tokio::test]
async fn event_delete_is_author_only_with_no_creator_override() {
    let server = create_test_server().await;
    let fx = content_fixture(&server, BlockType::Calendar).await;

    let event = server
        .create_event(
            &fx.member,
            &CreateEventParams {
                block_id: fx.block_id.clone(),
                title: "Planning".to_string(),
                date: Utc::now() + Duration::days(3),
                time: Some("10:00".to_string()),
                description: None,
                created_by: fx.member.clone(),
            },
        )
        .await
        .unwrap();

    let err = server.delete_event(&fx.creator, &event.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(msg) if msg == "only the author can delete this event"));

    server.delete_event(&fx.member, &event.id).await.unwrap();
}

#[tokio::test]
async fn goal_updates_are_collaborative_but_deletion_is_author_only() {
    let server = create_test_server().await;
    let fx = content_fixture(&server, BlockType::Goals).await;

    let goal = server
        .create_goal(
            &fx.member,
            &CreateGoalParams {
                block_id: fx.block_id.clone(),
                title: "Ship v1".to_string(),
                status: GoalStatus::NotStarted,
                due_date: None,
                created_by: fx.member.clone(),
            },
        )
        .await
        .unwrap();

    // Any block member may move the status.
    let updated = server
        .update_goal(
            &fx.creator,
            &goal.id,
            &UpdateGoalParams {
                title: None,
                status: Some(GoalStatus::InProgress),
                due_date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, GoalStatus::InProgress);
    assert_eq!(updated.title, "Ship v1");

    // Some(None) clears the due date.
    let due = Utc::now() + Duration::days(30);
    server
        .update_goal(
            &fx.member,
            &goal.id,
            &UpdateGoalParams {
                title: None,
                status: None,
                due_date: Some(Some(due)),
            },
        )
        .await
        .unwrap();
    let cleared = server
        .update_goal(
            &fx.member,
            &goal.id,
            &UpdateGoalParams {
                title: None,
                status: None,
                due_date: Some(None),
            },
        )
        .await
        .unwrap();
    assert!(cleared.due_date.is_none());

    let err = server.delete_goal(&fx.creator, &goal.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(msg) if msg == "only the author can delete this goal"));
    server.delete_goal(&fx.member, &goal.id).await.unwrap();
}

#[tokio::test]
async fn message_delete_is_author_only_and_scoped_to_its_block() {
    let server = create_test_server().await;
    let fx = content_fixture(&server, BlockType::Chat).await;

    let message = server
        .send_message(&fx.member, &fx.block_id, "mine")
        .await
        .unwrap();

    // Block creator cannot delete someone else's message.
    let err = server
        .delete_message(&fx.creator, &fx.block_id, &message.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    // A mismatched block id reads as absence, not denial.
    let block = server.store.get_block(&fx.block_id).await.unwrap();
    let other_block =
        create_test_block(&server, &fx.creator, &block.pod_id, BlockType::Chat, "other").await;
    let err = server
        .delete_message(&fx.member, &other_block.id, &message.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    server
        .delete_message(&fx.member, &fx.block_id, &message.id)
        .await
        .unwrap();
}
