use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{ConversationId, IncomingMessage, Proposal, ProposalRecord};
use super::evaluation::evaluate;
use super::repository::{
    DispatchError, ProposalStore, ReplyDispatcher, SettingsStore, StoreError,
};
use super::settings::{resolve, RuleSettings, SettingsError, TriageSettings};

/// Service composing the settings store, last-proposal cache, and reply dispatcher
/// around the rule engine.
pub struct TriageService<S, P, D> {
    settings: Arc<S>,
    proposals: Arc<P>,
    dispatcher: Arc<D>,
    defaults: RuleSettings,
}

/// Result of handling a freshly observed incoming message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub proposal: Proposal,
    pub auto_sent: bool,
}

impl<S, P, D> TriageService<S, P, D>
where
    S: SettingsStore + 'static,
    P: ProposalStore + 'static,
    D: ReplyDispatcher + 'static,
{
    pub fn new(settings: Arc<S>, proposals: Arc<P>, dispatcher: Arc<D>) -> Self {
        Self::with_defaults(settings, proposals, dispatcher, RuleSettings::defaults())
    }

    pub fn with_defaults(
        settings: Arc<S>,
        proposals: Arc<P>,
        dispatcher: Arc<D>,
        defaults: RuleSettings,
    ) -> Self {
        Self {
            settings,
            proposals,
            dispatcher,
            defaults,
        }
    }

    /// Stored overrides layered over the defaults.
    pub fn settings(&self) -> Result<TriageSettings, TriageServiceError> {
        let stored = self.settings.load()?.unwrap_or_default();
        Ok(resolve(&stored, &self.defaults)?)
    }

    /// Validate and persist a settings document. Invalid documents are never stored.
    pub fn update_settings(
        &self,
        document: RuleSettings,
    ) -> Result<TriageSettings, TriageServiceError> {
        let resolved = resolve(&document, &self.defaults)?;
        self.settings.save(document)?;
        info!(auto_send = resolved.auto_send, "triage settings updated");
        resolved.log_warnings();
        Ok(resolved)
    }

    pub fn reset_settings(&self) -> Result<TriageSettings, TriageServiceError> {
        self.update_settings(self.defaults.clone())
    }

    /// Classify a newly observed message, remember the proposal, and send it
    /// straight away when auto-send is on.
    pub fn handle_incoming(
        &self,
        conversation: &ConversationId,
        message: IncomingMessage,
    ) -> Result<TriageOutcome, TriageServiceError> {
        let settings = self.settings()?;
        let proposal = evaluate(&message.content, &settings.rules);
        debug!(%conversation, rule = %proposal.rule, "incoming message classified");

        self.proposals.record(ProposalRecord {
            conversation_id: conversation.clone(),
            message_meta: message.meta,
            message_content: message.content,
            proposal: proposal.clone(),
            recorded_at: Utc::now(),
        })?;

        let auto_sent = settings.auto_send && self.auto_send(conversation, &proposal);

        Ok(TriageOutcome {
            proposal,
            auto_sent,
        })
    }

    /// Classify arbitrary text, recording the proposal when a conversation is given.
    pub fn run_rules(
        &self,
        conversation: Option<&ConversationId>,
        text: &str,
    ) -> Result<Proposal, TriageServiceError> {
        let settings = self.settings()?;
        let proposal = evaluate(text, &settings.rules);

        if let Some(conversation) = conversation {
            self.proposals.record(ProposalRecord {
                conversation_id: conversation.clone(),
                message_meta: String::new(),
                message_content: text.to_string(),
                proposal: proposal.clone(),
                recorded_at: Utc::now(),
            })?;
        }

        Ok(proposal)
    }

    pub fn last_proposal(
        &self,
        conversation: &ConversationId,
    ) -> Result<ProposalRecord, TriageServiceError> {
        self.proposals
            .latest(conversation)?
            .ok_or_else(|| TriageServiceError::NotFound(conversation.clone()))
    }

    /// Send reviewer-approved text to the conversation.
    pub fn send_reply(
        &self,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<(), TriageServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TriageServiceError::EmptyReply);
        }

        self.dispatcher.dispatch(conversation, text)?;
        info!(%conversation, "reply dispatched");
        Ok(())
    }

    /// Classify `message_text` and send the proposed reply without review.
    pub fn send_proposed(
        &self,
        conversation: &ConversationId,
        message_text: &str,
    ) -> Result<Proposal, TriageServiceError> {
        let message_text = message_text.trim();
        if message_text.is_empty() {
            return Err(TriageServiceError::EmptyMessage);
        }

        let proposal = self.run_rules(Some(conversation), message_text)?;
        self.send_reply(conversation, &proposal.reply)?;
        Ok(proposal)
    }

    fn auto_send(&self, conversation: &ConversationId, proposal: &Proposal) -> bool {
        match self.dispatcher.dispatch(conversation, &proposal.reply) {
            Ok(()) => {
                info!(%conversation, rule = %proposal.rule, "reply auto-sent");
                true
            }
            Err(err) => {
                warn!(%conversation, error = %err, "auto-send failed; proposal kept for review");
                false
            }
        }
    }
}

/// Error raised by the triage service.
#[derive(Debug, thiserror::Error)]
pub enum TriageServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("no proposal recorded for conversation `{0}`")]
    NotFound(ConversationId),
    #[error("reply is empty")]
    EmptyReply,
    #[error("no message content to process")]
    EmptyMessage,
}
