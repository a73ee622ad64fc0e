use crate::infra::{AppState, OutboxDispatcher};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use reply_triage::workflows::triage::{
    triage_router, ConversationId, ProposalStore, SettingsStore, TriageService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_triage_routes<S, P>(
    service: Arc<TriageService<S, P, OutboxDispatcher>>,
    outbox: OutboxDispatcher,
) -> axum::Router
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
{
    triage_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/conversations/:conversation_id/outbox",
            get(outbox_endpoint),
        )
        .layer(Extension(outbox))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Hand queued replies to the page agent; each reply is returned once.
pub(crate) async fn outbox_endpoint(
    Extension(outbox): Extension<OutboxDispatcher>,
    Path(conversation_id): Path<String>,
) -> impl IntoResponse {
    let conversation = ConversationId(conversation_id);
    let replies = outbox.drain(&conversation);
    Json(json!({ "conversation_id": conversation.0, "replies": replies }))
}
