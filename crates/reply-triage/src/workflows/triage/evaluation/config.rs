use serde::{Deserialize, Serialize};

use super::super::domain::RuleId;

/// Lowercase phrases tested as literal substrings of a message.
///
/// Construction trims and lowercases every phrase and drops blanks and
/// duplicates, so an empty string can never match every message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    phrases: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for phrase in phrases {
            let phrase = phrase.as_ref().trim().to_lowercase();
            if phrase.is_empty() || normalized.contains(&phrase) {
                continue;
            }
            normalized.push(phrase);
        }
        Self { phrases: normalized }
    }

    /// True when any phrase occurs inside `haystack`, which must already be lowercased.
    pub(crate) fn matches_lowercased(&self, haystack: &str) -> bool {
        self.phrases
            .iter()
            .any(|phrase| haystack.contains(phrase.as_str()))
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(value: KeywordSet) -> Self {
        value.phrases
    }
}

/// Reply text for each rule. Every rule has an entry, so lookups cannot miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replies {
    pub location_filter: String,
    pub salary_inquiry: String,
    pub missing_job_desc: String,
    pub fallback: String,
}

impl Replies {
    pub fn get(&self, rule: RuleId) -> &str {
        match rule {
            RuleId::LocationFilter => &self.location_filter,
            RuleId::SalaryInquiry => &self.salary_inquiry,
            RuleId::MissingJobDesc => &self.missing_job_desc,
            RuleId::Fallback => &self.fallback,
        }
    }
}

/// Validated keyword sets and replies driving the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    pub location_keywords: KeywordSet,
    pub job_desc_keywords: KeywordSet,
    pub salary_keywords: KeywordSet,
    pub replies: Replies,
}
