//! Webhook deliveries through the HTTP router.

use super::helpers::{Wiring, issue_event, push_event, wiring};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rstest::rstest;
use serde_json::Value;
use tower::ServiceExt;
use tracksync::server::{AppState, WEBHOOK_PATH, build_router};
use tracksync::sync::signature::{WebhookSecret, sign_payload};
use tracksync::task::domain::Lane;

const SECRET: &str = "end-to-end-secret";

fn signed_request(event_type: &str, payload: &Value) -> eyre::Result<Request<Body>> {
    let body = serde_json::to_vec(payload)?;
    let signature = sign_payload(&WebhookSecret::new(SECRET), &body)?;
    Ok(Request::builder()
        .method("POST")
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json")
        .header("x-github-event", event_type)
        .header("x-hub-signature-256", signature)
        .body(Body::from(body))?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signed_deliveries_drive_task_state(#[future(awt)] wiring: Wiring) -> eyre::Result<()> {
    let router = build_router(AppState::new(
        wiring.dispatcher(),
        WebhookSecret::new(SECRET),
    ));

    let opened = router
        .clone()
        .oneshot(signed_request("issues", &issue_event("opened", 11, "Via HTTP"))?)
        .await?;
    assert_eq!(opened.status(), StatusCode::OK);
    let task = wiring
        .task_numbered(1)
        .await?
        .ok_or_else(|| eyre::eyre!("task missing"))?;

    let pushed = router
        .oneshot(signed_request("push", &push_event(&["close!1"]))?)
        .await?;
    assert_eq!(pushed.status(), StatusCode::OK);
    assert_eq!(wiring.lane_of(&task).await?, Lane::Done);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tampered_body_is_rejected(#[future(awt)] wiring: Wiring) -> eyre::Result<()> {
    let router = build_router(AppState::new(
        wiring.dispatcher(),
        WebhookSecret::new(SECRET),
    ));
    let signature = sign_payload(&WebhookSecret::new(SECRET), b"{}")?;
    let request = Request::builder()
        .method("POST")
        .uri(WEBHOOK_PATH)
        .header("x-github-event", "issues")
        .header("x-hub-signature-256", signature)
        .body(Body::from(serde_json::to_vec(&issue_event(
            "opened", 12, "Forged",
        ))?))?;

    let response = router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(wiring.tasks.is_empty()?);
    Ok(())
}
