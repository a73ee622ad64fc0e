use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{ReplyTemplate, RuleId};
use super::evaluation::{KeywordSet, Replies, RuleConfig};

/// Stored settings document. Every field is optional so a partial document can
/// be layered over the defaults; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_desc_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<BTreeMap<RuleId, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_send: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<ReplyTemplate>>,
}

impl RuleSettings {
    /// Out-of-the-box settings: NYC or remote leads only, manual approval.
    pub fn defaults() -> Self {
        let replies = BTreeMap::from([
            (RuleId::LocationFilter, "NYC or REMOTE only.".to_string()),
            (
                RuleId::SalaryInquiry,
                "What is the salary range?".to_string(),
            ),
            (
                RuleId::MissingJobDesc,
                "Please share the job description and salary range.".to_string(),
            ),
            (
                RuleId::Fallback,
                "Thanks for reaching out. Could you share the job description and salary range?"
                    .to_string(),
            ),
        ]);

        Self {
            location_keywords: Some(strings(&["new york", "nyc", "remote"])),
            job_desc_keywords: Some(strings(&[
                "position",
                "role",
                "responsibility",
                "requirement",
                "job",
            ])),
            salary_keywords: Some(strings(&["salary", "range", "compensation", "pay", "rate"])),
            replies: Some(replies),
            auto_send: Some(false),
            templates: Some(Vec::new()),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(raw).map_err(|err| SettingsError::Malformed(err.to_string()))
    }

    /// Shallow layering: a field present in `self` replaces the field in `base`.
    pub fn layered_over(&self, base: &RuleSettings) -> RuleSettings {
        RuleSettings {
            location_keywords: self
                .location_keywords
                .clone()
                .or_else(|| base.location_keywords.clone()),
            job_desc_keywords: self
                .job_desc_keywords
                .clone()
                .or_else(|| base.job_desc_keywords.clone()),
            salary_keywords: self
                .salary_keywords
                .clone()
                .or_else(|| base.salary_keywords.clone()),
            replies: self.replies.clone().or_else(|| base.replies.clone()),
            auto_send: self.auto_send.or(base.auto_send),
            templates: self.templates.clone().or_else(|| base.templates.clone()),
        }
    }
}

/// Fully resolved settings handed to the triage service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageSettings {
    #[serde(flatten)]
    pub rules: RuleConfig,
    pub auto_send: bool,
    pub templates: Vec<ReplyTemplate>,
}

impl TriageSettings {
    /// Report accepted-but-suspicious configuration. Call once per load, not per message.
    pub fn log_warnings(&self) {
        if self.rules.location_keywords.is_empty() {
            warn!("no location keywords configured; every message will hit the location filter");
        }
    }
}

/// Configuration problems caught while resolving a settings document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("no reply configured for rule `{0}`")]
    MissingReply(RuleId),
    #[error("reply for rule `{0}` is blank")]
    BlankReply(RuleId),
    #[error("settings document is malformed: {0}")]
    Malformed(String),
}

/// Layer `overrides` over `defaults` and validate the result.
pub fn resolve(
    overrides: &RuleSettings,
    defaults: &RuleSettings,
) -> Result<TriageSettings, SettingsError> {
    let merged = overrides.layered_over(defaults);

    let location_keywords = KeywordSet::new(merged.location_keywords.unwrap_or_default());
    let job_desc_keywords = KeywordSet::new(merged.job_desc_keywords.unwrap_or_default());
    let salary_keywords = KeywordSet::new(merged.salary_keywords.unwrap_or_default());

    let replies = resolve_replies(merged.replies.unwrap_or_default())?;

    let templates = merged
        .templates
        .unwrap_or_default()
        .into_iter()
        .filter(|template| !template.content.trim().is_empty())
        .collect();

    Ok(TriageSettings {
        rules: RuleConfig {
            location_keywords,
            job_desc_keywords,
            salary_keywords,
            replies,
        },
        auto_send: merged.auto_send.unwrap_or(false),
        templates,
    })
}

/// Resolve the built-in defaults on their own.
pub fn resolve_defaults() -> Result<TriageSettings, SettingsError> {
    let defaults = RuleSettings::defaults();
    resolve(&RuleSettings::default(), &defaults)
}

fn resolve_replies(mut entries: BTreeMap<RuleId, String>) -> Result<Replies, SettingsError> {
    let mut take = |rule: RuleId| -> Result<String, SettingsError> {
        let reply = entries
            .remove(&rule)
            .ok_or(SettingsError::MissingReply(rule))?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(SettingsError::BlankReply(rule));
        }
        Ok(reply.to_string())
    };

    Ok(Replies {
        location_filter: take(RuleId::LocationFilter)?,
        salary_inquiry: take(RuleId::SalaryInquiry)?,
        missing_job_desc: take(RuleId::MissingJobDesc)?,
        fallback: take(RuleId::Fallback)?,
    })
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
