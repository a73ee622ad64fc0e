use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::triage::router::{incoming_handler, IncomingMessagePayload};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("json body")))
        .expect("request builds")
}

#[tokio::test]
async fn incoming_handler_accepts_legacy_text_field() {
    let (service, _, _, _) = build_service();
    let payload = IncomingMessagePayload {
        meta: None,
        content: None,
        text: Some("Remote position available".to_string()),
    };

    let response = incoming_handler::<MemorySettings, MemoryProposals, MemoryDispatcher>(
        State(Arc::new(service)),
        Path("thread-9".to_string()),
        axum::Json(payload),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["proposal"]["rule"], "salaryInquiry");
    assert_eq!(body["auto_sent"], false);
}

#[tokio::test]
async fn incoming_handler_falls_back_to_text_when_content_is_empty() {
    let (service, _, _, _) = build_service();
    let payload = IncomingMessagePayload {
        meta: Some("Recruiter".to_string()),
        content: Some(String::new()),
        text: Some("Remote position available".to_string()),
    };

    let response = incoming_handler::<MemorySettings, MemoryProposals, MemoryDispatcher>(
        State(Arc::new(service)),
        Path("thread-10".to_string()),
        axum::Json(payload),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["proposal"]["rule"], "salaryInquiry");
}

#[test]
fn populated_content_wins_over_legacy_text() {
    let message = IncomingMessagePayload {
        meta: None,
        content: Some("NYC opportunity".to_string()),
        text: Some("Remote position available".to_string()),
    }
    .into_message();

    assert_eq!(message.content, "NYC opportunity");
}

#[tokio::test]
async fn incoming_route_then_proposal_route_round_trip() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/conversations/thread-1/messages",
            json!({ "meta": "Recruiter", "content": "NYC opportunity, let's connect" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::get("/api/v1/conversations/thread-1/proposal")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["conversation_id"], "thread-1");
    assert_eq!(body["proposal"]["rule"], "missingJobDesc");
    assert_eq!(body["message_meta"], "Recruiter");
}

#[tokio::test]
async fn proposal_route_returns_not_found_for_unknown_conversation() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/conversations/unknown/proposal")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn run_rules_route_returns_proposal() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/proposals",
            json!({ "text": "This remote role has a salary range of 150-180k" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["proposal"]["rule"], "fallback");
}

#[tokio::test]
async fn reply_route_validates_text() {
    let (service, _, _, dispatcher) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/conversations/thread-5/reply",
            json!({ "text": "   " }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/conversations/thread-5/reply",
            json!({ "text": "What is the salary range?" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(dispatcher.sent().len(), 1);
}

#[tokio::test]
async fn settings_routes_validate_and_reset() {
    let (service, settings, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/settings",
            json!({ "replies": { "fallback": "Thanks!" } }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(settings.stored().is_none());

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/settings",
            json!({ "autoSend": true, "salaryKeywords": ["Salary", "OTE"] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["autoSend"], true);
    assert_eq!(body["salaryKeywords"], json!(["salary", "ote"]));

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/settings/reset")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::get("/api/v1/settings")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    let body = read_json_body(response).await;
    assert_eq!(body["autoSend"], false);
    assert_eq!(body["replies"]["locationFilter"], "NYC or REMOTE only.");
}
