use rulegen_core::RulegenError;
use rulegen_rules::RuleError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid condition '{input}': {reason}")]
    ConditionSyntax { input: String, reason: String },
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Core(#[from] RulegenError),
}
