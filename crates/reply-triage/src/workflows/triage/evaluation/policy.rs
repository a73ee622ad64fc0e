use super::super::domain::RuleId;
use super::rules::MessageSignals;

/// Picks the first rule whose predicate holds. The order matters because a
/// message can satisfy several predicates at once.
pub(crate) fn decide_rule(signals: &MessageSignals) -> RuleId {
    if !signals.has_location {
        return RuleId::LocationFilter;
    }

    if signals.has_job_desc && !signals.has_salary {
        return RuleId::SalaryInquiry;
    }

    if !signals.has_job_desc {
        return RuleId::MissingJobDesc;
    }

    RuleId::Fallback
}
