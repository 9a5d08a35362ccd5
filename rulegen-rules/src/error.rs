use thiserror::Error;

use crate::lint::LintWarning;

/// Errors raised at the edges of the rule model: parsing names from text
/// and the opt-in strict validation. Building and rendering never fail.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("unknown condition tag: {0}")]
    UnknownTag(String),
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("rule {rule_id} failed validation: {}", summarize(.findings))]
    Invalid {
        rule_id: i64,
        findings: Vec<LintWarning>,
    },
}

impl RuleError {
    pub fn invalid(rule_id: i64, findings: Vec<LintWarning>) -> Self {
        RuleError::Invalid { rule_id, findings }
    }
}

fn summarize(findings: &[LintWarning]) -> String {
    findings
        .iter()
        .map(|finding| finding.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
