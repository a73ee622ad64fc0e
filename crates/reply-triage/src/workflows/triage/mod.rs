//! Keyword triage of inbound recruiter messages.
//!
//! The rule engine in [`evaluation`] is a pure function of message text and
//! configuration. Everything around it (settings, the last-proposal cache,
//! reply dispatch) is reached through the traits in [`repository`] so hosts can
//! plug in their own storage and page adapters.

pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod router;
pub mod service;
pub mod settings;

#[cfg(test)]
mod tests;

pub use domain::{
    ConversationId, IncomingMessage, Proposal, ProposalRecord, ReplyTemplate, RuleId,
};
pub use evaluation::{evaluate, KeywordSet, Replies, RuleConfig, RuleEngine};
pub use repository::{DispatchError, ProposalStore, ReplyDispatcher, SettingsStore, StoreError};
pub use router::triage_router;
pub use service::{TriageOutcome, TriageService, TriageServiceError};
pub use settings::{resolve, resolve_defaults, RuleSettings, SettingsError, TriageSettings};
