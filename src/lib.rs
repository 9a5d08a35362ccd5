//! rulegen: assemble Wazuh-style detection rules and render them as XML.
//!
//! The workspace is split into:
//!
//! * `rulegen-core`: shared errors, configuration and logging setup
//! * `rulegen-rules`: condition model, XML serializer and lint layer
//! * `rulegen-cli`: the `rulegen` command-line front end
//!
//! This crate re-exports the rule model so callers only need one dependency.

pub use rulegen_rules::*;

/// Renders a rule in one call, for callers that already hold the conditions.
pub fn render(header: &RuleHeader, conditions: &ConditionModel) -> String {
    serialize(header, conditions.conditions())
}
