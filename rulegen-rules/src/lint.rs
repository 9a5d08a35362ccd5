//! Opt-in checks for a rule before it is handed to the engine.
//!
//! The serializer accepts anything; these findings report what the engine
//! would likely reject or misread. Nothing here changes rendered output.

use std::fmt;

use serde::Serialize;

use crate::condition::{Condition, ConditionId};
use crate::error::RuleError;
use crate::rule::{RuleHeader, MAX_LEVEL, MIN_LEVEL};
use crate::serializer::Escape;

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The engine is expected to reject or misinterpret the rule.
    Error,
    /// The rule loads but probably does not do what was intended.
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Identifies which lint rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintRule {
    // header
    LevelOutOfRange,
    NonPositiveId,
    NonPositiveFrequency,
    NonPositiveTimeframe,
    FrequencyWithoutTimeframe,
    TimeframeWithoutFrequency,
    NoConditions,

    // conditions
    AttributeNotAllowed,
    InvalidAttributeValue,
    UnescapedMarkup,
    EmptyValue,
}

impl fmt::Display for LintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LintRule::LevelOutOfRange => "level_out_of_range",
            LintRule::NonPositiveId => "non_positive_id",
            LintRule::NonPositiveFrequency => "non_positive_frequency",
            LintRule::NonPositiveTimeframe => "non_positive_timeframe",
            LintRule::FrequencyWithoutTimeframe => "frequency_without_timeframe",
            LintRule::TimeframeWithoutFrequency => "timeframe_without_frequency",
            LintRule::NoConditions => "no_conditions",
            LintRule::AttributeNotAllowed => "attribute_not_allowed",
            LintRule::InvalidAttributeValue => "invalid_attribute_value",
            LintRule::UnescapedMarkup => "unescaped_markup",
            LintRule::EmptyValue => "empty_value",
        };
        write!(f, "{s}")
    }
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintWarning {
    pub rule: LintRule,
    pub severity: Severity,
    pub message: String,
    /// JSON-pointer-style location, e.g. `"/header/level"`, `"/conditions/2/value"`.
    pub path: String,
    /// Condition the finding belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionId>,
}

impl LintWarning {
    fn header(rule: LintRule, severity: Severity, field: &str, message: String) -> Self {
        Self {
            rule,
            severity,
            message,
            path: format!("/header/{field}"),
            condition: None,
        }
    }

    fn condition(
        rule: LintRule,
        severity: Severity,
        index: usize,
        condition: &Condition,
        suffix: &str,
        message: String,
    ) -> Self {
        Self {
            rule,
            severity,
            message,
            path: format!("/conditions/{index}{suffix}"),
            condition: Some(condition.id),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {}\n    --> {}",
            self.severity, self.rule, self.message, self.path
        )
    }
}

/// Lints a rule assuming raw (unescaped) output.
pub fn lint(header: &RuleHeader, conditions: &[Condition]) -> Vec<LintWarning> {
    lint_with(header, conditions, Escape::None)
}

/// Lints a rule for the given output escaping mode.
pub fn lint_with(header: &RuleHeader, conditions: &[Condition], escape: Escape) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    lint_header(header, conditions.is_empty(), &mut warnings);
    for (index, condition) in conditions.iter().enumerate() {
        lint_condition(index, condition, escape, &mut warnings);
    }
    warnings
}

/// Fails with every error-severity finding. Warnings and infos never fail.
pub fn validate(header: &RuleHeader, conditions: &[Condition]) -> Result<(), RuleError> {
    let errors: Vec<_> = lint(header, conditions)
        .into_iter()
        .filter(LintWarning::is_error)
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(RuleError::invalid(header.id, errors))
    }
}

fn lint_header(header: &RuleHeader, no_conditions: bool, warnings: &mut Vec<LintWarning>) {
    if header.id <= 0 {
        warnings.push(LintWarning::header(
            LintRule::NonPositiveId,
            Severity::Error,
            "id",
            format!("rule id must be positive, got {}", header.id),
        ));
    }

    if !(MIN_LEVEL..=MAX_LEVEL).contains(&header.level) {
        warnings.push(LintWarning::header(
            LintRule::LevelOutOfRange,
            Severity::Error,
            "level",
            format!(
                "level {} is outside {}..={}",
                header.level, MIN_LEVEL, MAX_LEVEL
            ),
        ));
    }

    if header.frequency == Some(0) {
        warnings.push(LintWarning::header(
            LintRule::NonPositiveFrequency,
            Severity::Error,
            "frequency",
            "frequency must be at least 1".into(),
        ));
    }

    if header.timeframe == Some(0) {
        warnings.push(LintWarning::header(
            LintRule::NonPositiveTimeframe,
            Severity::Error,
            "timeframe",
            "timeframe must be at least 1 second".into(),
        ));
    }

    match (header.frequency, header.timeframe) {
        (Some(_), None) => warnings.push(LintWarning::header(
            LintRule::FrequencyWithoutTimeframe,
            Severity::Warning,
            "frequency",
            "frequency has no effect without a timeframe".into(),
        )),
        (None, Some(_)) => warnings.push(LintWarning::header(
            LintRule::TimeframeWithoutFrequency,
            Severity::Warning,
            "timeframe",
            "timeframe has no effect without a frequency".into(),
        )),
        _ => {}
    }

    if no_conditions {
        warnings.push(LintWarning {
            rule: LintRule::NoConditions,
            severity: Severity::Info,
            message: "rule has no conditions".into(),
            path: "/conditions".into(),
            condition: None,
        });
    }
}

fn lint_condition(
    index: usize,
    condition: &Condition,
    escape: Escape,
    warnings: &mut Vec<LintWarning>,
) {
    let tag = condition.tag;

    for key in condition.stray_attributes() {
        let fate = if tag.is_content_only() {
            "dropped"
        } else {
            "emitted anyway"
        };
        warnings.push(LintWarning::condition(
            LintRule::AttributeNotAllowed,
            Severity::Warning,
            index,
            condition,
            &format!("/attributes/{key}"),
            format!("<{tag}> does not take a '{key}' attribute; it will be {fate}"),
        ));
    }

    for (key, value) in condition.attributes.iter() {
        if !tag.allows(key) || key.accepts(value) {
            continue;
        }
        let allowed = key
            .allowed_values()
            .map(|values| values.join("|"))
            .unwrap_or_default();
        warnings.push(LintWarning::condition(
            LintRule::InvalidAttributeValue,
            Severity::Error,
            index,
            condition,
            &format!("/attributes/{key}"),
            format!("<{tag}> {key}=\"{value}\" is not one of {allowed}"),
        ));
    }

    if escape == Escape::None {
        if has_markup(&condition.value) {
            warnings.push(LintWarning::condition(
                LintRule::UnescapedMarkup,
                Severity::Warning,
                index,
                condition,
                "/value",
                format!("<{tag}> content contains markup characters that are written verbatim"),
            ));
        }
        let renders_attributes = !tag.is_content_only();
        for (key, value) in condition.attributes.iter() {
            if renders_attributes && has_markup(value) {
                warnings.push(LintWarning::condition(
                    LintRule::UnescapedMarkup,
                    Severity::Warning,
                    index,
                    condition,
                    &format!("/attributes/{key}"),
                    format!("<{tag}> {key} contains markup characters that are written verbatim"),
                ));
            }
        }
    }

    if condition.value.is_empty() {
        warnings.push(LintWarning::condition(
            LintRule::EmptyValue,
            Severity::Info,
            index,
            condition,
            "/value",
            format!("<{tag}> has no content"),
        ));
    }
}

fn has_markup(value: &str) -> bool {
    value.contains(['<', '>', '&', '"'])
}
