use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use reply_triage::error::AppError;
use reply_triage::workflows::triage::{
    ConversationId, DispatchError, ProposalRecord, ProposalStore, ReplyDispatcher, RuleSettings,
    SettingsStore, StoreError,
};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySettingsStore {
    document: Arc<Mutex<Option<RuleSettings>>>,
}

impl InMemorySettingsStore {
    pub(crate) fn seeded(document: Option<RuleSettings>) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> Result<Option<RuleSettings>, StoreError> {
        let guard = self.document.lock().expect("settings mutex poisoned");
        Ok(guard.clone())
    }

    fn save(&self, settings: RuleSettings) -> Result<(), StoreError> {
        let mut guard = self.document.lock().expect("settings mutex poisoned");
        *guard = Some(settings);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProposalStore {
    records: Arc<Mutex<HashMap<ConversationId, ProposalRecord>>>,
}

impl ProposalStore for InMemoryProposalStore {
    fn record(&self, record: ProposalRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("proposal mutex poisoned");
        guard.insert(record.conversation_id.clone(), record);
        Ok(())
    }

    fn latest(&self, conversation: &ConversationId) -> Result<Option<ProposalRecord>, StoreError> {
        let guard = self.records.lock().expect("proposal mutex poisoned");
        Ok(guard.get(conversation).cloned())
    }
}

/// Reply waiting for the page-side agent to type and send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct OutboundReply {
    pub(crate) text: String,
    pub(crate) queued_at: DateTime<Utc>,
}

/// Replies kept per conversation before the oldest is discarded.
pub(crate) const OUTBOX_CAPACITY: usize = 16;

/// Dispatcher that queues replies per conversation until the page agent drains them.
#[derive(Default, Clone)]
pub(crate) struct OutboxDispatcher {
    queues: Arc<Mutex<HashMap<ConversationId, VecDeque<OutboundReply>>>>,
}

impl ReplyDispatcher for OutboxDispatcher {
    fn dispatch(&self, conversation: &ConversationId, text: &str) -> Result<(), DispatchError> {
        let mut guard = self.queues.lock().expect("outbox mutex poisoned");
        let queue = guard.entry(conversation.clone()).or_default();
        if queue.len() >= OUTBOX_CAPACITY {
            queue.pop_front();
            warn!(%conversation, "outbox full; dropped oldest undelivered reply");
        }
        queue.push_back(OutboundReply {
            text: text.to_string(),
            queued_at: Utc::now(),
        });
        Ok(())
    }
}

impl OutboxDispatcher {
    pub(crate) fn drain(&self, conversation: &ConversationId) -> Vec<OutboundReply> {
        let mut guard = self.queues.lock().expect("outbox mutex poisoned");
        guard
            .remove(conversation)
            .map(Vec::from)
            .unwrap_or_default()
    }
}

/// Read a JSON settings document, if a path was configured.
pub(crate) fn load_settings_document(path: Option<&Path>) -> Result<Option<RuleSettings>, AppError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let raw = std::fs::read_to_string(path)?;
    let document = RuleSettings::from_json(&raw)?;
    Ok(Some(document))
}
