mod config;
mod policy;
mod rules;

pub use config::{KeywordSet, Replies, RuleConfig};

use super::domain::{Proposal, RuleId};
use policy::decide_rule;
use rules::detect_signals;

/// Classify `text` and pair the winning rule with its configured reply.
///
/// Pure and total: every string, including the empty one, yields a proposal.
pub fn evaluate(text: &str, config: &RuleConfig) -> Proposal {
    let rule = classify(text, config);

    Proposal {
        rule,
        reply: config.replies.get(rule).to_string(),
    }
}

pub(crate) fn classify(text: &str, config: &RuleConfig) -> RuleId {
    let signals = detect_signals(text, config);
    decide_rule(&signals)
}

/// Stateless evaluator bound to a single rule configuration.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, text: &str) -> Proposal {
        evaluate(text, &self.config)
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }
}
