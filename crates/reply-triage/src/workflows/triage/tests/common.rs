use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::triage::domain::{ConversationId, ProposalRecord};
use crate::workflows::triage::repository::{
    DispatchError, ProposalStore, ReplyDispatcher, SettingsStore, StoreError,
};
use crate::workflows::triage::{
    resolve_defaults, triage_router, RuleConfig, RuleSettings, TriageService,
};

pub(super) fn rule_config() -> RuleConfig {
    resolve_defaults().expect("defaults resolve").rules
}

#[derive(Default, Clone)]
pub(super) struct MemorySettings {
    document: Arc<Mutex<Option<RuleSettings>>>,
}

impl MemorySettings {
    pub(super) fn seeded(document: RuleSettings) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(document))),
        }
    }

    pub(super) fn stored(&self) -> Option<RuleSettings> {
        self.document.lock().expect("settings mutex poisoned").clone()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Option<RuleSettings>, StoreError> {
        Ok(self.stored())
    }

    fn save(&self, settings: RuleSettings) -> Result<(), StoreError> {
        *self.document.lock().expect("settings mutex poisoned") = Some(settings);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProposals {
    records: Arc<Mutex<HashMap<ConversationId, ProposalRecord>>>,
}

impl ProposalStore for MemoryProposals {
    fn record(&self, record: ProposalRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("proposal mutex poisoned")
            .insert(record.conversation_id.clone(), record);
        Ok(())
    }

    fn latest(&self, conversation: &ConversationId) -> Result<Option<ProposalRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("proposal mutex poisoned")
            .get(conversation)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDispatcher {
    sent: Arc<Mutex<Vec<(ConversationId, String)>>>,
}

impl MemoryDispatcher {
    pub(super) fn sent(&self) -> Vec<(ConversationId, String)> {
        self.sent.lock().expect("dispatch mutex poisoned").clone()
    }
}

impl ReplyDispatcher for MemoryDispatcher {
    fn dispatch(&self, conversation: &ConversationId, text: &str) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .expect("dispatch mutex poisoned")
            .push((conversation.clone(), text.to_string()));
        Ok(())
    }
}

pub(super) struct ClosedTabDispatcher;

impl ReplyDispatcher for ClosedTabDispatcher {
    fn dispatch(&self, conversation: &ConversationId, _text: &str) -> Result<(), DispatchError> {
        Err(DispatchError::Unreachable(conversation.clone()))
    }
}

pub(super) struct OfflineSettings;

impl SettingsStore for OfflineSettings {
    fn load(&self) -> Result<Option<RuleSettings>, StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }

    fn save(&self, _settings: RuleSettings) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }
}

pub(super) type MemoryService = TriageService<MemorySettings, MemoryProposals, MemoryDispatcher>;

pub(super) fn build_service() -> (MemoryService, MemorySettings, MemoryProposals, MemoryDispatcher) {
    build_service_with(MemorySettings::default())
}

pub(super) fn build_service_with(
    settings: MemorySettings,
) -> (MemoryService, MemorySettings, MemoryProposals, MemoryDispatcher) {
    let proposals = MemoryProposals::default();
    let dispatcher = MemoryDispatcher::default();
    let service = TriageService::new(
        Arc::new(settings.clone()),
        Arc::new(proposals.clone()),
        Arc::new(dispatcher.clone()),
    );
    (service, settings, proposals, dispatcher)
}

pub(super) fn auto_send_settings() -> MemorySettings {
    MemorySettings::seeded(RuleSettings {
        auto_send: Some(true),
        ..RuleSettings::default()
    })
}

pub(super) fn conversation(id: &str) -> ConversationId {
    ConversationId(id.to_string())
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    triage_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
