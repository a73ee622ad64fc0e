use super::config::{KeywordSet, RuleConfig};

/// Keyword signals detected in a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MessageSignals {
    pub has_location: bool,
    pub has_job_desc: bool,
    pub has_salary: bool,
}

/// Case-insensitive literal substring test; no tokenization, so a phrase
/// embedded inside a longer word still counts.
pub(crate) fn contains_any(haystack: &str, phrases: &KeywordSet) -> bool {
    phrases.matches_lowercased(&haystack.to_lowercase())
}

pub(crate) fn detect_signals(text: &str, config: &RuleConfig) -> MessageSignals {
    MessageSignals {
        has_location: contains_any(text, &config.location_keywords),
        has_job_desc: contains_any(text, &config.job_desc_keywords),
        has_salary: contains_any(text, &config.salary_keywords),
    }
}
