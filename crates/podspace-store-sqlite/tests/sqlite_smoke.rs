use chrono::{Duration, Utc};
use podspace_storage::{
    BlockId, BlockType, CreateBlockParams, CreateDocumentParams, CreateEventParams,
    CreateGoalParams, CreateInvitationParams, CreatePodParams, CreateUserParams, DocumentId,
    GoalStatus, InvitationStatus, MessageId, PodId, PodRole, Store, StoreError, UpdateGoalParams,
    UserId,
};
use podspace_store_sqlite::SqliteStore;

async fn seed_user(s: &SqliteStore, email: &str, name: &str) -> UserId {
    s.create_user(&CreateUserParams {
        email: email.to_string(),
        password_hash: "argon2-hash".to_string(),
        name: name.to_string(),
        profile_picture: None,
    })
    .await
    .unwrap()
}

async fn seed_pod(s: &SqliteStore, creator: &UserId, name: &str) -> PodId {
    s.create_pod(&CreatePodParams {
        name: name.to_string(),
        tagline: None,
        logo_url: None,
        creator_id: creator.clone(),
    })
    .await
    .unwrap()
}

async fn seed_block(s: &SqliteStore, pod: &PodId, creator: &UserId, kind: BlockType) -> BlockId {
    s.create_block(&CreateBlockParams {
        pod_id: pod.clone(),
        block_type: kind,
        label: "block".to_string(),
        description: None,
        x: 0.0,
        y: 0.0,
        creator_id: creator.clone(),
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn user_and_session_round_trip() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let user_id = seed_user(&s, "ada@example.com", "Ada").await;

    let by_email = s.get_user_by_email("ada@example.com").await.unwrap();
    assert_eq!(by_email.id, user_id);
    assert_eq!(by_email.name, "Ada");

    let by_id = s.get_user_by_id(&user_id).await.unwrap();
    assert_eq!(by_id.email, "ada@example.com");

    // Duplicate email → AlreadyExists
    let err = s
        .create_user(&CreateUserParams {
            email: "ada@example.com".to_string(),
            password_hash: "other".to_string(),
            name: "Other".to_string(),
            profile_picture: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists));

    // Sessions resolve to the user they were issued for
    s.create_session(&user_id, "tok-1").await.unwrap();
    let resolved = s.get_session_user("tok-1").await.unwrap();
    assert_eq!(resolved, user_id);

    let err = s.get_session_user("tok-unknown").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn pod_creation_includes_creator_membership() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let creator = seed_user(&s, "owner@example.com", "Owner").await;
    let pod_id = seed_pod(&s, &creator, "Team Rocket").await;

    let pod = s.get_pod(&pod_id).await.unwrap();
    assert_eq!(pod.name, "Team Rocket");
    assert_eq!(pod.creator_id, creator);

    // creator membership row exists with role = creator
    let member = s.get_pod_member(&pod_id, &creator).await.unwrap();
    assert_eq!(member.role, PodRole::Creator);
    assert_eq!(s.count_pod_members(&pod_id).await.unwrap(), 1);

    // visible via the user's pod listing, with the role joined in
    let pods = s.list_pods_for_user(&creator).await.unwrap();
    assert_eq!(pods.len(), 1);
    assert_eq!(pods[0].pod.id, pod_id);
    assert_eq!(pods[0].role, PodRole::Creator);
}

#[tokio::test]
async fn pod_update_leaves_unset_fields_alone() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let creator = seed_user(&s, "owner@example.com", "Owner").await;
    let pod_id = s
        .create_pod(&CreatePodParams {
            name: "Original".to_string(),
            tagline: Some("hello".to_string()),
            logo_url: None,
            creator_id: creator.clone(),
        })
        .await
        .unwrap();

    s.update_pod(&pod_id, Some("Renamed".to_string()), None, None)
        .await
        .unwrap();

    let pod = s.get_pod(&pod_id).await.unwrap();
    assert_eq!(pod.name, "Renamed");
    assert_eq!(pod.tagline, Some("hello".to_string()));

    let fake = PodId(uuid::Uuid::now_v7());
    let err = s
        .update_pod(&fake, Some("x".to_string()), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn pod_membership_operations() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let creator = seed_user(&s, "owner@example.com", "Owner").await;
    let joiner = seed_user(&s, "joiner@example.com", "Joiner").await;
    let pod_id = seed_pod(&s, &creator, "pod").await;

    s.add_pod_member(&pod_id, &joiner, PodRole::Member)
        .await
        .unwrap();

    let member = s.get_pod_member(&pod_id, &joiner).await.unwrap();
    assert_eq!(member.role, PodRole::Member);
    assert_eq!(s.count_pod_members(&pod_id).await.unwrap(), 2);

    // profile fields are joined into the member listing
    let members = s.list_pod_members(&pod_id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(members
        .iter()
        .any(|m| m.user_id == joiner && m.email == "joiner@example.com"));

    // double-add → AlreadyExists
    let err = s
        .add_pod_member(&pod_id, &joiner, PodRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists));

    // non-member lookup → NotFound
    let outsider = seed_user(&s, "outsider@example.com", "Outsider").await;
    let err = s.get_pod_member(&pod_id, &outsider).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn invitation_lifecycle() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let creator = seed_user(&s, "owner@example.com", "Owner").await;
    let invitee = seed_user(&s, "invitee@example.com", "Invitee").await;
    let pod_id = seed_pod(&s, &creator, "pod").await;

    let inv = s
        .create_invitation(&CreateInvitationParams {
            pod_id: pod_id.clone(),
            email: "invitee@example.com".to_string(),
            token: "invite-token-abc".to_string(),
            invited_by: creator.clone(),
            expires_at: Utc::now() + Duration::days(7),
        })
        .await
        .unwrap();
    assert_eq!(inv.status, InvitationStatus::Pending);

    // lookup by token
    let fetched = s.get_invitation_by_token("invite-token-abc").await.unwrap();
    assert_eq!(fetched.id, inv.id);
    assert!(!fetched.is_expired(Utc::now()));

    // pending lookup is keyed on (pod, email)
    let pending = s
        .find_pending_invitation(&pod_id, "invitee@example.com")
        .await
        .unwrap();
    assert!(pending.is_some());
    let none = s
        .find_pending_invitation(&pod_id, "someone-else@example.com")
        .await
        .unwrap();
    assert!(none.is_none());

    // redeem: member row + accepted status, atomically
    s.redeem_invitation(&inv.id, &pod_id, &invitee)
        .await
        .unwrap();
    let member = s.get_pod_member(&pod_id, &invitee).await.unwrap();
    assert_eq!(member.role, PodRole::Member);
    let after = s.get_invitation_by_token("invite-token-abc").await.unwrap();
    assert_eq!(after.status, InvitationStatus::Accepted);

    // accepted invitations no longer count as pending
    let pending = s
        .find_pending_invitation(&pod_id, "invitee@example.com")
        .await
        .unwrap();
    assert!(pending.is_none());

    // duplicate token → AlreadyExists
    let err = s
        .create_invitation(&CreateInvitationParams {
            pod_id: pod_id.clone(),
            email: "another@example.com".to_string(),
            token: "invite-token-abc".to_string(),
            invited_by: creator.clone(),
            expires_at: Utc::now() + Duration::days(7),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists));
}

#[tokio::test]
async fn expired_invitation_is_reported_lazily() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let creator = seed_user(&s, "owner@example.com", "Owner").await;
    let pod_id = seed_pod(&s, &creator, "pod").await;

    let inv = s
        .create_invitation(&CreateInvitationParams {
            pod_id: pod_id.clone(),
            email: "late@example.com".to_string(),
            token: "stale-token".to_string(),
            invited_by: creator.clone(),
            expires_at: Utc::now() - Duration::hours(1),
        })
        .await
        .unwrap();

    // stored status stays pending; expiry is computed from expires_at
    let fetched = s.get_invitation_by_token("stale-token").await.unwrap();
    assert_eq!(fetched.status, InvitationStatus::Pending);
    assert!(fetched.is_expired(Utc::now()));
    assert_eq!(fetched.id, inv.id);
}

#[tokio::test]
async fn mark_invitation_accepted_without_membership() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let creator = seed_user(&s, "owner@example.com", "Owner").await;
    let pod_id = seed_pod(&s, &creator, "pod").await;

    let inv = s
        .create_invitation(&CreateInvitationParams {
            pod_id: pod_id.clone(),
            email: "member@example.com".to_string(),
            token: "tok-already".to_string(),
            invited_by: creator.clone(),
            expires_at: Utc::now() + Duration::days(7),
        })
        .await
        .unwrap();

    s.mark_invitation_accepted(&inv.id).await.unwrap();

    let after = s.get_invitation_by_token("tok-already").await.unwrap();
    assert_eq!(after.status, InvitationStatus::Accepted);
    // no member row was written
    assert_eq!(s.count_pod_members(&pod_id).await.unwrap(), 1);
}

#[tokio::test]
async fn block_crud_and_creator_membership() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let creator = seed_user(&s, "owner@example.com", "Owner").await;
    let pod_id = seed_pod(&s, &creator, "pod").await;

    let block_id = s
        .create_block(&CreateBlockParams {
            pod_id: pod_id.clone(),
            block_type: BlockType::Chat,
            label: "general".to_string(),
            description: Some("team chat".to_string()),
            x: 12.5,
            y: -3.0,
            creator_id: creator.clone(),
        })
        .await
        .unwrap();

    let block = s.get_block(&block_id).await.unwrap();
    assert_eq!(block.block_type, BlockType::Chat);
    assert_eq!(block.label, "general");
    assert_eq!(block.x, 12.5);

    // creator gets a block membership row at creation
    let member = s.get_block_member(&block_id, &creator).await.unwrap();
    assert_eq!(member.user_id, creator);

    let blocks = s.list_blocks(&pod_id).await.unwrap();
    assert_eq!(blocks.len(), 1);

    // membership add / list
    let other = seed_user(&s, "other@example.com", "Other").await;
    s.add_block_member(&block_id, &other).await.unwrap();
    let members = s.list_block_members(&block_id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.iter().any(|m| m.user_id == other));

    let err = s.add_block_member(&block_id, &other).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists));
}

#[tokio::test]
async fn chat_blocks_across_pods() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let creator = seed_user(&s, "owner@example.com", "Owner").await;
    let pod1 = seed_pod(&s, &creator, "pod-1").await;
    let pod2 = seed_pod(&s, &creator, "pod-2").await;
    let pod3 = seed_pod(&s, &creator, "pod-3").await;

    let chat1 = seed_block(&s, &pod1, &creator, BlockType::Chat).await;
    let _docs1 = seed_block(&s, &pod1, &creator, BlockType::Docs).await;
    let chat2 = seed_block(&s, &pod2, &creator, BlockType::Chat).await;
    let chat3 = seed_block(&s, &pod3, &creator, BlockType::Chat).await;

    // only chat-type blocks, only from the requested pods
    let blocks = s
        .list_chat_blocks_for_pods(&[pod1.clone(), pod2.clone()])
        .await
        .unwrap();
    let ids: Vec<_> = blocks.iter().map(|b| b.id.clone()).collect();
    assert_eq!(blocks.len(), 2);
    assert!(ids.contains(&chat1));
    assert!(ids.contains(&chat2));
    assert!(!ids.contains(&chat3));

    // empty pod set short-circuits to empty
    let blocks = s.list_chat_blocks_for_pods(&[]).await.unwrap();
    assert!(blocks.is_empty());
}

#[tokio::test]
async fn message_ids_are_monotonic_in_creation_order() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let creator = seed_user(&s, "owner@example.com", "Owner").await;
    let pod_id = seed_pod(&s, &creator, "pod").await;
    let block_id = seed_block(&s, &pod_id, &creator, BlockType::Chat).await;

    let m1 = s.create_message(&block_id, &creator, "one").await.unwrap();
    let m2 = s.create_message(&block_id, &creator, "two").await.unwrap();
    let m3 = s
        .create_message(&block_id, &creator, "three")
        .await
        .unwrap();
    assert!(m1.id < m2.id);
    assert!(m2.id < m3.id);

    assert_eq!(s.latest_message_id(&block_id).await.unwrap(), Some(m3.id));

    // listing is oldest-first with author profile joined
    let msgs = s.list_messages(&block_id).await.unwrap();
    assert_eq!(msgs.len(), 3);
    assert_eq!(msgs[0].body, "one");
    assert_eq!(msgs[2].body, "three");
    assert_eq!(msgs[0].user_name, "Owner");

    s.delete_message(&m2.id).await.unwrap();
    let msgs = s.list_messages(&block_id).await.unwrap();
    assert_eq!(msgs.len(), 2);

    let err = s.get_message(&m2.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));

    // empty block has no latest id
    let empty = seed_block(&s, &pod_id, &creator, BlockType::Chat).await;
    assert_eq!(s.latest_message_id(&empty).await.unwrap(), None);
}

#[tokio::test]
async fn count_messages_after_excludes_author_and_respects_cursor() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let alice = seed_user(&s, "alice@example.com", "Alice").await;
    let bob = seed_user(&s, "bob@example.com", "Bob").await;
    let pod_id = seed_pod(&s, &alice, "pod").await;
    let block_id = seed_block(&s, &pod_id, &alice, BlockType::Chat).await;

    let a1 = s.create_message(&block_id, &alice, "a1").await.unwrap();
    let _b1 = s.create_message(&block_id, &bob, "b1").await.unwrap();
    let b2 = s.create_message(&block_id, &bob, "b2").await.unwrap();
    let _a2 = s.create_message(&block_id, &alice, "a2").await.unwrap();

    // no cursor: everything not authored by the reader counts
    let n = s
        .count_messages_after(&block_id, None, &alice)
        .await
        .unwrap();
    assert_eq!(n, 2);

    // cursor at a1: b1 and b2 are after it
    let n = s
        .count_messages_after(&block_id, Some(a1.id), &alice)
        .await
        .unwrap();
    assert_eq!(n, 2);

    // cursor at b2: nothing from others remains
    let n = s
        .count_messages_after(&block_id, Some(b2.id), &alice)
        .await
        .unwrap();
    assert_eq!(n, 0);

    // bob sees alice's two messages
    let n = s.count_messages_after(&block_id, None, &bob).await.unwrap();
    assert_eq!(n, 2);
}

#[tokio::test]
async fn read_cursor_upsert_is_last_write_wins() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let alice = seed_user(&s, "alice@example.com", "Alice").await;
    let pod_id = seed_pod(&s, &alice, "pod").await;
    let block_id = seed_block(&s, &pod_id, &alice, BlockType::Chat).await;

    assert!(s
        .get_read_cursor(&alice, &block_id)
        .await
        .unwrap()
        .is_none());

    let now = Utc::now();
    s.upsert_read_cursor(&alice, &block_id, MessageId(10), now)
        .await
        .unwrap();
    let cur = s
        .get_read_cursor(&alice, &block_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cur.last_read_message_id, MessageId(10));

    // a second write replaces the row, even if it moves backwards
    s.upsert_read_cursor(&alice, &block_id, MessageId(4), now)
        .await
        .unwrap();
    let cur = s
        .get_read_cursor(&alice, &block_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cur.last_read_message_id, MessageId(4));
}

#[tokio::test]
async fn document_metadata_round_trip() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let alice = seed_user(&s, "alice@example.com", "Alice").await;
    let pod_id = seed_pod(&s, &alice, "pod").await;
    let block_id = seed_block(&s, &pod_id, &alice, BlockType::Docs).await;

    let doc = s
        .create_document(&CreateDocumentParams {
            block_id: block_id.clone(),
            file_name: "roadmap.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 4096,
            uploaded_by: alice.clone(),
        })
        .await
        .unwrap();

    let fetched = s.get_document(&doc.id).await.unwrap();
    assert_eq!(fetched.file_name, "roadmap.pdf");
    assert_eq!(fetched.file_size, 4096);

    let docs = s.list_documents(&block_id).await.unwrap();
    assert_eq!(docs.len(), 1);

    s.delete_document(&doc.id).await.unwrap();
    let err = s.get_document(&doc.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));

    let fake = DocumentId(uuid::Uuid::now_v7());
    let err = s.delete_document(&fake).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn calendar_events_sorted_by_date() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let alice = seed_user(&s, "alice@example.com", "Alice").await;
    let pod_id = seed_pod(&s, &alice, "pod").await;
    let block_id = seed_block(&s, &pod_id, &alice, BlockType::Calendar).await;

    let base = Utc::now();
    let later = s
        .create_event(&CreateEventParams {
            block_id: block_id.clone(),
            title: "retro".to_string(),
            date: base + Duration::days(14),
            time: None,
            description: None,
            created_by: alice.clone(),
        })
        .await
        .unwrap();
    let sooner = s
        .create_event(&CreateEventParams {
            block_id: block_id.clone(),
            title: "standup".to_string(),
            date: base + Duration::days(1),
            time: Some("09:30".to_string()),
            description: Some("daily".to_string()),
            created_by: alice.clone(),
        })
        .await
        .unwrap();

    let events = s.list_events(&block_id).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, sooner.id);
    assert_eq!(events[1].id, later.id);
    assert_eq!(events[0].time, Some("09:30".to_string()));

    s.delete_event(&later.id).await.unwrap();
    let events = s.list_events(&block_id).await.unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn goal_updates_apply_partial_fields() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let alice = seed_user(&s, "alice@example.com", "Alice").await;
    let pod_id = seed_pod(&s, &alice, "pod").await;
    let block_id = seed_block(&s, &pod_id, &alice, BlockType::Goals).await;

    let due = Utc::now() + Duration::days(30);
    let goal = s
        .create_goal(&CreateGoalParams {
            block_id: block_id.clone(),
            title: "ship v1".to_string(),
            status: GoalStatus::NotStarted,
            due_date: Some(due),
            created_by: alice.clone(),
        })
        .await
        .unwrap();
    assert_eq!(goal.status, GoalStatus::NotStarted);

    // status-only update leaves title and due date alone
    s.update_goal(
        &goal.id,
        &UpdateGoalParams {
            status: Some(GoalStatus::InProgress),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let fetched = s.get_goal(&goal.id).await.unwrap();
    assert_eq!(fetched.status, GoalStatus::InProgress);
    assert_eq!(fetched.title, "ship v1");
    assert!(fetched.due_date.is_some());

    // Some(None) clears the due date
    s.update_goal(
        &goal.id,
        &UpdateGoalParams {
            due_date: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let fetched = s.get_goal(&goal.id).await.unwrap();
    assert_eq!(fetched.due_date, None);

    let goals = s.list_goals(&block_id).await.unwrap();
    assert_eq!(goals.len(), 1);

    s.delete_goal(&goal.id).await.unwrap();
    let err = s.get_goal(&goal.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn block_delete_cascades_to_dependents() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let alice = seed_user(&s, "alice@example.com", "Alice").await;
    let bob = seed_user(&s, "bob@example.com", "Bob").await;
    let pod_id = seed_pod(&s, &alice, "pod").await;
    let block_id = seed_block(&s, &pod_id, &alice, BlockType::Chat).await;

    s.add_block_member(&block_id, &bob).await.unwrap();
    let msg = s.create_message(&block_id, &alice, "hi").await.unwrap();
    s.upsert_read_cursor(&bob, &block_id, msg.id, Utc::now())
        .await
        .unwrap();
    s.create_goal(&CreateGoalParams {
        block_id: block_id.clone(),
        title: "g".to_string(),
        status: GoalStatus::NotStarted,
        due_date: None,
        created_by: alice.clone(),
    })
    .await
    .unwrap();

    s.delete_block(&block_id).await.unwrap();

    let err = s.get_block(&block_id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
    assert!(s.list_messages(&block_id).await.unwrap().is_empty());
    assert!(s.list_goals(&block_id).await.unwrap().is_empty());
    assert!(s.list_block_members(&block_id).await.unwrap().is_empty());
    assert!(s.get_read_cursor(&bob, &block_id).await.unwrap().is_none());

    // pod is untouched
    let pod = s.get_pod(&pod_id).await.unwrap();
    assert_eq!(pod.id, pod_id);

    let fake = BlockId(uuid::Uuid::now_v7());
    let err = s.delete_block(&fake).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn pod_delete_cascades_through_blocks() {
    let s = SqliteStore::open_in_memory().await.unwrap();

    let alice = seed_user(&s, "alice@example.com", "Alice").await;
    let bob = seed_user(&s, "bob@example.com", "Bob").await;
    let pod_id = seed_pod(&s, &alice, "doomed").await;
    let other_pod = seed_pod(&s, &alice, "survivor").await;

    let chat = seed_block(&s, &pod_id, &alice, BlockType::Chat).await;
    let docs = seed_block(&s, &pod_id, &alice, BlockType::Docs).await;
    let kept = seed_block(&s, &other_pod, &alice, BlockType::Chat).await;

    s.add_pod_member(&pod_id, &bob, PodRole::Member)
        .await
        .unwrap();
    let msg = s.create_message(&chat, &bob, "bye").await.unwrap();
    s.upsert_read_cursor(&alice, &chat, msg.id, Utc::now())
        .await
        .unwrap();
    s.create_document(&CreateDocumentParams {
        block_id: docs.clone(),
        file_name: "f.txt".to_string(),
        file_type: "text/plain".to_string(),
        file_size: 1,
        uploaded_by: alice.clone(),
    })
    .await
    .unwrap();
    s.create_invitation(&CreateInvitationParams {
        pod_id: pod_id.clone(),
        email: "late@example.com".to_string(),
        token: "doomed-token".to_string(),
        invited_by: alice.clone(),
        expires_at: Utc::now() + Duration::days(7),
    })
    .await
    .unwrap();

    s.delete_pod(&pod_id).await.unwrap();

    // pod, its blocks, and every dependent row are gone
    assert!(matches!(
        s.get_pod(&pod_id).await.unwrap_err(),
        StoreError::NotFound
    ));
    assert!(matches!(
        s.get_block(&chat).await.unwrap_err(),
        StoreError::NotFound
    ));
    assert!(matches!(
        s.get_block(&docs).await.unwrap_err(),
        StoreError::NotFound
    ));
    assert!(s.list_messages(&chat).await.unwrap().is_empty());
    assert!(s.list_documents(&docs).await.unwrap().is_empty());
    assert!(s.get_read_cursor(&alice, &chat).await.unwrap().is_none());
    assert!(matches!(
        s.get_invitation_by_token("doomed-token").await.unwrap_err(),
        StoreError::NotFound
    ));
    assert_eq!(s.count_pod_members(&pod_id).await.unwrap(), 0);
    assert!(s.list_pods_for_user(&bob).await.unwrap().is_empty());

    // the other pod and its block survive
    let kept_block = s.get_block(&kept).await.unwrap();
    assert_eq!(kept_block.pod_id, other_pod);
    assert_eq!(s.list_pods_for_user(&alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn file_backed_store_persists_across_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("store.db").to_string_lossy()
    );

    let user_id = {
        let s = SqliteStore::open(&url).await.unwrap();
        seed_user(&s, "ada@example.com", "Ada").await
    };

    // Reopening runs migrations idempotently and sees the same rows.
    let s = SqliteStore::open(&url).await.unwrap();
    let user = s.get_user_by_id(&user_id).await.unwrap();
    assert_eq!(user.email, "ada@example.com");
}
