//! Shared test fixtures: an in-memory server plus user/pod/block helpers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::mailer::LogMailer;
use crate::server::PodspaceServer;
use podspace_storage::{Block, BlockType, Pod, PodId, User, UserId};
use podspace_store_sqlite::SqliteStore;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Create a PodspaceServer backed by in-memory SQLite.
pub async fn create_test_server() -> PodspaceServer {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    PodspaceServer::new(store, ServerConfig::default(), Arc::new(LogMailer))
}

/// Sign up a user with the shared test password; returns the user and a
/// session token.
pub async fn create_test_user(server: &PodspaceServer, email: &str, name: &str) -> (User, String) {
    server.signup(email, TEST_PASSWORD, name, None).await.unwrap()
}

pub async fn create_test_pod(server: &PodspaceServer, creator: &UserId, name: &str) -> Pod {
    server.create_pod(creator, name, None, None).await.unwrap()
}

pub async fn create_test_block(
    server: &PodspaceServer,
    creator: &UserId,
    pod_id: &PodId,
    block_type: BlockType,
    label: &str,
) -> Block {
    server
        .create_block(creator, pod_id, block_type, label, None, 0.0, 0.0)
        .await
        .unwrap()
}

pub async fn create_chat_block(
    server: &PodspaceServer,
    creator: &UserId,
    pod_id: &PodId,
    label: &str,
) -> Block {
    create_test_block(server, creator, pod_id, BlockType::Chat, label).await
}
