//! HTTP handlers, one module per domain. Handlers stay thin: decode the
//! request, call the matching `PodspaceServer` operation with the acting
//! user id, encode the response. Access rules live in the core, not here.

pub mod auth;
pub mod blocks;
pub mod chat;
pub mod content;
pub mod invitations;
pub mod notifications;
pub mod pods;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};

use crate::server::PodspaceServer;

pub fn router(server: Arc<PodspaceServer>, metrics_handle: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(healthz))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/pods", get(pods::list).post(pods::create))
        .route(
            "/pods/:id",
            get(pods::get).put(pods::update).delete(pods::remove),
        )
        .route("/pods/:id/members", get(pods::members))
        .route("/pods/:id/invite", post(pods::invite))
        .route("/invitations/accept/:token", get(invitations::accept))
        .route("/blocks", get(blocks::list).post(blocks::create))
        .route("/blocks/:id", delete(blocks::remove))
        .route(
            "/blocks/:id/members",
            get(blocks::members).post(blocks::add_member),
        )
        .route(
            "/blocks/:id/unread",
            get(blocks::unread_count).post(blocks::mark_read),
        )
        .route("/chat/:block_id/messages", get(chat::list).post(chat::send))
        .route("/chat/:block_id/messages/:message_id", delete(chat::remove))
        .route("/notifications/unread", get(notifications::unread))
        .route(
            "/documents",
            get(content::list_documents).post(content::create_document),
        )
        .route("/documents/:id", delete(content::remove_document))
        .route(
            "/calendar/events",
            get(content::list_events).post(content::create_event),
        )
        .route("/calendar/events/:id", delete(content::remove_event))
        .route(
            "/goals",
            get(content::list_goals).post(content::create_goal),
        )
        .route(
            "/goals/:id",
            put(content::update_goal).delete(content::remove_goal),
        );

    if let Some(handle) = metrics_handle {
        router = router.route("/metrics", get(move || async move { handle.render() }));
    }

    router.with_state(server)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
