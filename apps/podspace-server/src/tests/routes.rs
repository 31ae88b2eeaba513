//! Router-level tests: wiring, auth extraction, and the redirect-based
//! invitation redemption flow.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::handlers;

#[tokio::test]
async fn healthz_responds_ok() {
    let server = create_test_server().await;
    let router = handlers::router(Arc::new(server), None);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_bearer_token_is_unauthorized() {
    let server = create_test_server().await;
    let router = handlers::router(Arc::new(server), None);

    let response = router
        .oneshot(Request::builder().uri("/pods").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unauthenticated_redemption_redirects_to_signin_with_the_token() {
    let server = create_test_server().await;
    let router = handlers::router(Arc::new(server), None);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/invitations/accept/tok123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "http://localhost:8080/signin?invitation=tok123"
    );
}

#[tokio::test]
async fn successful_redemption_redirects_to_the_pod() {
    let server = create_test_server().await;
    let (creator, _) = create_test_user(&server, "creator@example.com", "Creator").await;
    let (_invitee, invitee_token) =
        create_test_user(&server, "invitee@example.com", "Invitee").await;
    let pod = create_test_pod(&server, &creator.id, "Team").await;
    let invitation = server
        .invite_member(&creator.id, &pod.id, "invitee@example.com")
        .await
        .unwrap();
    let pod_id = pod.id.0;
    let router = handlers::router(Arc::new(server), None);

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/invitations/accept/{}", invitation.token))
                .header(header::AUTHORIZATION, format!("Bearer {invitee_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("http://localhost:8080/pods/{pod_id}?success=true")
    );
}

#[tokio::test]
async fn failed_redemption_redirects_with_an_error_code_and_the_token() {
    let server = create_test_server().await;
    let (_user, token) = create_test_user(&server, "user@example.com", "User").await;
    let router = handlers::router(Arc::new(server), None);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/invitations/accept/bogus")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "http://localhost:8080/invitations?error=invalid_invitation&token=bogus"
    );
}
