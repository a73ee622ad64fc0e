use super::domain::{ConversationId, ProposalRecord};
use super::settings::RuleSettings;

/// Persisted settings document owned by whatever hosts the triage service.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Option<RuleSettings>, StoreError>;
    fn save(&self, settings: RuleSettings) -> Result<(), StoreError>;
}

/// Last proposal per conversation. Later records replace earlier ones.
pub trait ProposalStore: Send + Sync {
    fn record(&self, record: ProposalRecord) -> Result<(), StoreError>;
    fn latest(&self, conversation: &ConversationId) -> Result<Option<ProposalRecord>, StoreError>;
}

/// Capability to put text into a conversation's compose box and send it.
pub trait ReplyDispatcher: Send + Sync {
    fn dispatch(&self, conversation: &ConversationId, text: &str) -> Result<(), DispatchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("conversation `{0}` is not reachable")]
    Unreachable(ConversationId),
    #[error("dispatch transport unavailable: {0}")]
    Transport(String),
}
