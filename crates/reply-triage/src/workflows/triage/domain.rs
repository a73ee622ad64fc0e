use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for the conversation (thread or tab) a message arrived on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification outcome of evaluating a message. The declaration order is the
/// order in which the rules are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleId {
    LocationFilter,
    SalaryInquiry,
    MissingJobDesc,
    Fallback,
}

impl RuleId {
    pub const ALL: [RuleId; 4] = [
        RuleId::LocationFilter,
        RuleId::SalaryInquiry,
        RuleId::MissingJobDesc,
        RuleId::Fallback,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RuleId::LocationFilter => "locationFilter",
            RuleId::SalaryInquiry => "salaryInquiry",
            RuleId::MissingJobDesc => "missingJobDesc",
            RuleId::Fallback => "fallback",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule outcome paired with the reply configured for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub rule: RuleId,
    pub reply: String,
}

/// Message extracted from the conversation page, split into the sender/time
/// header and the body that gets classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub meta: String,
    pub content: String,
}

impl IncomingMessage {
    pub fn new(meta: impl AsRef<str>, content: impl AsRef<str>) -> Self {
        Self {
            meta: collapse_whitespace(meta.as_ref()),
            content: collapse_whitespace(content.as_ref()),
        }
    }
}

/// Cached "last proposal" for a conversation so a reviewer can recall it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub conversation_id: ConversationId,
    pub message_meta: String,
    pub message_content: String,
    pub proposal: Proposal,
    pub recorded_at: DateTime<Utc>,
}

/// Saved reply a reviewer can drop into the compose box instead of the proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

impl ReplyTemplate {
    /// Display label for the template at `index` in the configured list.
    pub fn label(&self, index: usize) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Template {}", index + 1),
        }
    }
}

pub(crate) fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
