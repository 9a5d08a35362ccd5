use serde::Serialize;
use tracing::debug;

use crate::error::RuleError;
use crate::lint::{lint, validate, LintWarning};
use crate::model::ConditionModel;
use crate::serializer::{serialize_with, SerializeOptions};

/// Lowest documented rule level.
pub const MIN_LEVEL: i64 = 0;
/// Highest documented rule level.
pub const MAX_LEVEL: i64 = 16;

/// Attributes of the `<rule>` element.
///
/// Values are rendered verbatim; range checks live in [`crate::lint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHeader {
    /// Rule identifier, expected to be positive.
    pub id: i64,
    /// Severity, documented as 0-16.
    pub level: i64,
    /// Number of matching events required before the rule fires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u64>,
    /// Correlation window in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<u64>,
}

impl RuleHeader {
    pub fn new(id: i64, level: i64) -> Self {
        Self {
            id,
            level,
            frequency: None,
            timeframe: None,
        }
    }

    pub fn with_frequency(mut self, frequency: u64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn with_timeframe(mut self, timeframe: u64) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    pub fn default_id() -> i64 {
        100100
    }

    pub fn default_level() -> i64 {
        5
    }
}

impl Default for RuleHeader {
    fn default() -> Self {
        Self::new(Self::default_id(), Self::default_level())
    }
}

/// One editing session: a header plus the conditions being assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleDraft {
    pub header: RuleHeader,
    pub conditions: ConditionModel,
}

impl RuleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: RuleHeader) -> Self {
        Self {
            header,
            conditions: ConditionModel::new(),
        }
    }

    /// Renders the draft with default options (no escaping).
    pub fn generate(&self) -> String {
        self.generate_with(SerializeOptions::default())
    }

    pub fn generate_with(&self, options: SerializeOptions) -> String {
        debug!(
            rule_id = self.header.id,
            conditions = self.conditions.len(),
            escape = ?options.escape,
            "generating rule"
        );
        serialize_with(&self.header, self.conditions.conditions(), options)
    }

    pub fn lint(&self) -> Vec<LintWarning> {
        lint(&self.header, self.conditions.conditions())
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        validate(&self.header, self.conditions.conditions())
    }
}
