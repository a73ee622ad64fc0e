use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

use super::domain::{ConversationId, IncomingMessage};
use super::repository::{ProposalStore, ReplyDispatcher, SettingsStore};
use super::service::TriageService;
use super::settings::RuleSettings;

/// Message pushed by the page-side agent. `text` is the older field name for `content`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessagePayload {
    #[serde(default)]
    pub meta: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl IncomingMessagePayload {
    pub fn into_message(self) -> IncomingMessage {
        let content = self
            .content
            .filter(|content| !content.is_empty())
            .or(self.text)
            .unwrap_or_default();
        IncomingMessage::new(self.meta.unwrap_or_default(), content)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunRulesPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendReplyPayload {
    #[serde(default)]
    pub text: String,
}

type SharedService<S, P, D> = Arc<TriageService<S, P, D>>;

/// Router builder exposing the relay endpoints for pages and reviewers.
pub fn triage_router<S, P, D>(service: SharedService<S, P, D>) -> Router
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
    D: ReplyDispatcher + 'static,
{
    Router::new()
        .route(
            "/api/v1/conversations/:conversation_id/messages",
            post(incoming_handler::<S, P, D>),
        )
        .route(
            "/api/v1/conversations/:conversation_id/proposal",
            get(last_proposal_handler::<S, P, D>),
        )
        .route(
            "/api/v1/conversations/:conversation_id/reply",
            post(send_reply_handler::<S, P, D>),
        )
        .route("/api/v1/proposals", post(run_rules_handler::<S, P, D>))
        .route(
            "/api/v1/settings",
            get(get_settings_handler::<S, P, D>).put(put_settings_handler::<S, P, D>),
        )
        .route(
            "/api/v1/settings/reset",
            post(reset_settings_handler::<S, P, D>),
        )
        .with_state(service)
}

pub(crate) async fn incoming_handler<S, P, D>(
    State(service): State<SharedService<S, P, D>>,
    Path(conversation_id): Path<String>,
    axum::Json(payload): axum::Json<IncomingMessagePayload>,
) -> Response
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
    D: ReplyDispatcher + 'static,
{
    let conversation = ConversationId(conversation_id);
    match service.handle_incoming(&conversation, payload.into_message()) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn last_proposal_handler<S, P, D>(
    State(service): State<SharedService<S, P, D>>,
    Path(conversation_id): Path<String>,
) -> Response
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
    D: ReplyDispatcher + 'static,
{
    match service.last_proposal(&ConversationId(conversation_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn send_reply_handler<S, P, D>(
    State(service): State<SharedService<S, P, D>>,
    Path(conversation_id): Path<String>,
    axum::Json(payload): axum::Json<SendReplyPayload>,
) -> Response
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
    D: ReplyDispatcher + 'static,
{
    let conversation = ConversationId(conversation_id);
    match service.send_reply(&conversation, &payload.text) {
        Ok(()) => (
            StatusCode::ACCEPTED,
            axum::Json(json!({ "conversation_id": conversation.0, "status": "sent" })),
        )
            .into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn run_rules_handler<S, P, D>(
    State(service): State<SharedService<S, P, D>>,
    axum::Json(payload): axum::Json<RunRulesPayload>,
) -> Response
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
    D: ReplyDispatcher + 'static,
{
    let conversation = payload.conversation_id.map(ConversationId);
    match service.run_rules(conversation.as_ref(), &payload.text) {
        Ok(proposal) => {
            (StatusCode::OK, axum::Json(json!({ "proposal": proposal }))).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn get_settings_handler<S, P, D>(
    State(service): State<SharedService<S, P, D>>,
) -> Response
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
    D: ReplyDispatcher + 'static,
{
    match service.settings() {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn put_settings_handler<S, P, D>(
    State(service): State<SharedService<S, P, D>>,
    axum::Json(document): axum::Json<RuleSettings>,
) -> Response
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
    D: ReplyDispatcher + 'static,
{
    match service.update_settings(document) {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn reset_settings_handler<S, P, D>(
    State(service): State<SharedService<S, P, D>>,
) -> Response
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
    D: ReplyDispatcher + 'static,
{
    match service.reset_settings() {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
